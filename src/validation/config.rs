//! Validation thresholds. Loaded from the `[validation]` table of the configuration.

use super::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Minimum total words (sections plus hero answer)
    #[serde(default = "default_min_word_count")]
    pub min_word_count: u32,

    /// Minimum words per section
    #[serde(default = "default_min_section_words")]
    pub min_section_words: u32,

    #[serde(default = "default_hero_min_sentences")]
    pub hero_min_sentences: usize,

    #[serde(default = "default_hero_max_sentences")]
    pub hero_max_sentences: usize,

    /// Hero answers shorter than this are treated as missing
    #[serde(default = "default_min_hero_chars")]
    pub min_hero_chars: usize,

    #[serde(default = "default_min_faqs")]
    pub min_faqs: usize,

    #[serde(default = "default_min_faq_answer_words")]
    pub min_faq_answer_words: usize,

    #[serde(default = "default_min_internal_links")]
    pub min_internal_links: usize,

    #[serde(default = "default_true")]
    pub require_end_cta: bool,

    /// Title, keyword or body matches make the topic hazardous
    #[serde(default = "default_hazardous_keywords")]
    pub hazardous_keywords: Vec<String>,

    /// Rule id to severity, e.g. `faq_count = "error"`
    #[serde(default)]
    pub severity_overrides: BTreeMap<String, Severity>,
}

fn default_min_word_count() -> u32 {
    1000
}

fn default_min_section_words() -> u32 {
    120
}

fn default_hero_min_sentences() -> usize {
    2
}

fn default_hero_max_sentences() -> usize {
    4
}

fn default_min_hero_chars() -> usize {
    50
}

fn default_min_faqs() -> usize {
    2
}

fn default_min_faq_answer_words() -> usize {
    20
}

fn default_min_internal_links() -> usize {
    2
}

fn default_true() -> bool {
    true
}

pub fn default_hazardous_keywords() -> Vec<String> {
    [
        "acid",
        "bleach",
        "ammonia",
        "lye",
        "sodium hydroxide",
        "caustic",
        "corrosive",
        "solvent",
        "toxic",
        "flammable",
        "pesticide",
        "chlorine",
        "hydrogen peroxide",
        "muriatic",
    ]
    .iter()
    .map(|keyword| keyword.to_string())
    .collect()
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_word_count: default_min_word_count(),
            min_section_words: default_min_section_words(),
            hero_min_sentences: default_hero_min_sentences(),
            hero_max_sentences: default_hero_max_sentences(),
            min_hero_chars: default_min_hero_chars(),
            min_faqs: default_min_faqs(),
            min_faq_answer_words: default_min_faq_answer_words(),
            min_internal_links: default_min_internal_links(),
            require_end_cta: default_true(),
            hazardous_keywords: default_hazardous_keywords(),
            severity_overrides: BTreeMap::new(),
        }
    }
}

impl ValidationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.hero_min_sentences > self.hero_max_sentences {
            return Err(format!(
                "hero_min_sentences ({}) exceeds hero_max_sentences ({})",
                self.hero_min_sentences, self.hero_max_sentences
            ));
        }
        if self
            .hazardous_keywords
            .iter()
            .any(|keyword| keyword.trim().is_empty())
        {
            return Err("hazardous_keywords cannot contain empty entries".to_string());
        }
        let known = super::rules::RULE_IDS;
        if let Some(unknown) = self
            .severity_overrides
            .keys()
            .find(|rule| !known.contains(&rule.as_str()))
        {
            return Err(format!("severity override for unknown rule '{}'", unknown));
        }
        Ok(())
    }

    pub fn severity_override(&self, rule: &str) -> Option<Severity> {
        self.severity_overrides.get(rule).copied()
    }
}
