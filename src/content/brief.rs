//! The content plan consumed by draft generation.

use super::HeadingLevel;
use serde::{Deserialize, Serialize};

/// A content plan. Immutable once resolved; only the draft generator and the repair
/// strategies read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Brief {
    pub suggested_title: String,
    pub suggested_slug: String,
    #[serde(default)]
    pub hero_answer_draft: String,
    #[serde(default)]
    pub outline: Vec<BriefOutlineEntry>,
    #[serde(default)]
    pub key_questions: Vec<String>,
    #[serde(default)]
    pub suggested_internal_links: Vec<SuggestedLink>,
    #[serde(default)]
    pub suggested_external_refs: Vec<ExternalReference>,
    #[serde(default)]
    pub faq_suggestions: Vec<String>,
    /// Placeholders a human (or a repair pass) is expected to fill with first-hand experience
    #[serde(default)]
    pub experience_prompts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefOutlineEntry {
    pub level: HeadingLevel,
    pub heading: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub estimated_words: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedLink {
    pub slug: String,
    pub anchor_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReference {
    pub url: String,
    pub title: String,
}

impl Brief {
    /// Outline entry planned for the section at `index`, if the plan reaches that far.
    pub fn outline_entry(&self, index: usize) -> Option<&BriefOutlineEntry> {
        self.outline.get(index)
    }

    pub fn total_estimated_words(&self) -> u32 {
        self.outline.iter().map(|entry| entry.estimated_words).sum()
    }
}
