//! The generated article record and the patch type used to produce repaired versions.

use super::HeadingLevel;
use crate::text;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    #[default]
    Draft,
    NeedsReview,
}

/// Generated article record.
///
/// Schema validity (field presence, types) is the draft generator's responsibility; the
/// validator only judges content quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DraftArtifact {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub primary_keyword: String,
    #[serde(default)]
    pub hero_answer: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    #[serde(default)]
    pub experience_evidence: ExperienceEvidence,
    #[serde(default)]
    pub internal_links: Vec<InternalLink>,
    /// Authoritative word count supplied by the generator. Takes precedence over the
    /// computed count while non-zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u32>,
    #[serde(default)]
    pub status: DraftStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub heading: String,
    #[serde(default)]
    pub level: HeadingLevel,
    pub body_html: String,
    #[serde(default)]
    pub word_count: u32,
}

impl Section {
    /// Build a section, counting words from the HTML-stripped body.
    pub fn new(heading: impl Into<String>, level: HeadingLevel, body_html: impl Into<String>) -> Self {
        let body_html = body_html.into();
        let word_count = text::count_words(&text::strip_html(&body_html)) as u32;
        Self {
            heading: heading.into(),
            level,
            body_html,
            word_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEvidence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<EvidenceDetail>,
    /// Unresolved markers left for a human to fill in
    #[serde(default)]
    pub placeholders: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceDetail {
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub observations: Vec<String>,
    #[serde(default)]
    pub outcome: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalLink {
    pub slug: String,
    pub anchor_text: String,
}

/// Field-keyed patch over a [`DraftArtifact`].
///
/// Only declared fields are written; everything else in the produced draft is a clone of
/// the base. Section replacements are keyed by index and ignored when the index is out of
/// range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftPatch {
    hero_answer: Option<String>,
    sections: BTreeMap<usize, Section>,
    faqs: Option<Vec<Faq>>,
    experience_evidence: Option<ExperienceEvidence>,
    status: Option<DraftStatus>,
}

impl DraftPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hero_answer(mut self, hero_answer: impl Into<String>) -> Self {
        self.set_hero_answer(hero_answer);
        self
    }

    pub fn section(mut self, index: usize, section: Section) -> Self {
        self.set_section(index, section);
        self
    }

    pub fn set_hero_answer(&mut self, hero_answer: impl Into<String>) {
        self.hero_answer = Some(hero_answer.into());
    }

    pub fn set_section(&mut self, index: usize, section: Section) {
        self.sections.insert(index, section);
    }

    pub fn set_faqs(&mut self, faqs: Vec<Faq>) {
        self.faqs = Some(faqs);
    }

    pub fn set_experience_evidence(&mut self, evidence: ExperienceEvidence) {
        self.experience_evidence = Some(evidence);
    }

    pub fn set_status(&mut self, status: DraftStatus) {
        self.status = Some(status);
    }

    pub fn is_empty(&self) -> bool {
        self.hero_answer.is_none()
            && self.sections.is_empty()
            && self.faqs.is_none()
            && self.experience_evidence.is_none()
            && self.status.is_none()
    }

    /// Field paths this patch writes, in a stable order.
    pub fn touched_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        if self.hero_answer.is_some() {
            fields.push("heroAnswer".to_string());
        }
        fields.extend(self.sections.keys().map(|index| format!("sections[{}]", index)));
        if self.faqs.is_some() {
            fields.push("faqs".to_string());
        }
        if self.experience_evidence.is_some() {
            fields.push("experienceEvidence".to_string());
        }
        if self.status.is_some() {
            fields.push("status".to_string());
        }
        fields
    }

    /// Produce the next draft version.
    ///
    /// Rewriting prose invalidates the generator's authoritative word count, so it is
    /// dropped whenever the hero answer or any section changes.
    pub fn apply(&self, base: &DraftArtifact) -> DraftArtifact {
        let mut next = base.clone();
        let mut prose_changed = false;

        if let Some(hero_answer) = &self.hero_answer {
            next.hero_answer = hero_answer.clone();
            prose_changed = true;
        }
        for (index, section) in &self.sections {
            if let Some(slot) = next.sections.get_mut(*index) {
                *slot = section.clone();
                prose_changed = true;
            }
        }
        if let Some(faqs) = &self.faqs {
            next.faqs = faqs.clone();
        }
        if let Some(evidence) = &self.experience_evidence {
            next.experience_evidence = evidence.clone();
        }
        if let Some(status) = self.status {
            next.status = status;
        }
        if prose_changed {
            next.word_count = None;
        }
        next
    }
}
