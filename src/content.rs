//! Content domain: briefs, outlines, and the draft artifact that flows through the
//! quality gate. Plain data with serde derives; behavior lives in validation and repair.

pub mod brief;
pub mod draft;
pub mod outline;

pub use brief::{Brief, BriefOutlineEntry, ExternalReference, SuggestedLink};
pub use draft::{
    DraftArtifact, DraftPatch, DraftStatus, EvidenceDetail, ExperienceEvidence, Faq,
    InternalLink, Section,
};
pub use outline::{
    ContentIdea, ExistingPost, Outline, OutlineFaq, OutlineOptions, OutlineReport,
    OutlineSection, SearchIntent, TopicDescriptor, TopicIntent,
};

use serde::{Deserialize, Serialize};

/// Heading level of an article section. Articles never carry more than one H1,
/// so sections start at H2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    #[default]
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    pub fn tag(self) -> &'static str {
        match self {
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
        }
    }
}
