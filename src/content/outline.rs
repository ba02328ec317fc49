//! Inputs and outputs of the outline collaborator.

use super::brief::{Brief, ExternalReference, SuggestedLink};
use super::HeadingLevel;
use serde::{Deserialize, Serialize};

/// Search intent as recorded on a content idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchIntent {
    #[default]
    Informational,
    Commercial,
    Transactional,
    Navigational,
}

/// Intent understood by the outline collaborator's angle taxonomy, which has no
/// navigational angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TopicIntent {
    #[default]
    Informational,
    Commercial,
    Transactional,
}

impl From<SearchIntent> for TopicIntent {
    fn from(intent: SearchIntent) -> Self {
        match intent {
            SearchIntent::Informational | SearchIntent::Navigational => {
                TopicIntent::Informational
            }
            SearchIntent::Commercial => TopicIntent::Commercial,
            SearchIntent::Transactional => TopicIntent::Transactional,
        }
    }
}

impl From<TopicIntent> for SearchIntent {
    fn from(intent: TopicIntent) -> Self {
        match intent {
            TopicIntent::Informational => SearchIntent::Informational,
            TopicIntent::Commercial => SearchIntent::Commercial,
            TopicIntent::Transactional => SearchIntent::Transactional,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicDescriptor {
    pub title: String,
    pub primary_keyword: String,
    #[serde(default)]
    pub intent: TopicIntent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(default)]
    pub secondary_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentIdea {
    pub title: String,
    pub primary_keyword: String,
    #[serde(default)]
    pub intent: SearchIntent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(default)]
    pub secondary_keywords: Vec<String>,
    /// A brief already attached to the idea short-circuits outline generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brief: Option<Brief>,
}

impl ContentIdea {
    /// Minimal topic descriptor handed to the outline collaborator.
    pub fn to_topic(&self) -> TopicDescriptor {
        TopicDescriptor {
            title: self.title.clone(),
            primary_keyword: self.primary_keyword.clone(),
            intent: self.intent.into(),
            cluster: self.cluster.clone(),
            secondary_keywords: self.secondary_keywords.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingPost {
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineOptions {
    #[serde(default)]
    pub target_word_count: Option<u32>,
    #[serde(default)]
    pub faq_count: Option<usize>,
    #[serde(default)]
    pub existing_posts: Vec<ExistingPost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Outline {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub hero_answer: String,
    #[serde(default)]
    pub sections: Vec<OutlineSection>,
    #[serde(default)]
    pub faqs: Vec<OutlineFaq>,
    #[serde(default)]
    pub experience_prompts: Vec<String>,
    #[serde(default)]
    pub external_refs: Vec<ExternalReference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineSection {
    pub level: HeadingLevel,
    pub heading: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub estimated_words: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_link: Option<SuggestedLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineFaq {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_hint: Option<String>,
}

/// Outline collaborator's own structural verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineReport {
    pub valid: bool,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}
