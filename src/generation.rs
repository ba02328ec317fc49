//! Generative collaborators.
//!
//! The pipeline never produces prose itself. Outlines, drafts and field repairs come from
//! the implementations of these traits; the orchestrator sequences them and the validator
//! judges what they return.

use crate::content::{
    Brief, DraftArtifact, Outline, OutlineOptions, OutlineReport, SearchIntent, Section,
    TopicDescriptor,
};
use crate::error::PipelineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Who the article is written as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
}

/// A previously published artifact used as a tone and structure reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exemplar {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
}

/// Everything the draft generator receives for one article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftGenerationInput {
    pub brief: Brief,
    pub author: AuthorProfile,
    #[serde(default)]
    pub exemplars: Vec<Exemplar>,
    pub primary_keyword: String,
    pub search_intent: SearchIntent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_hint: Option<String>,
}

#[async_trait]
pub trait OutlineGenerator: Send + Sync {
    async fn generate(
        &self,
        topic: &TopicDescriptor,
        options: &OutlineOptions,
    ) -> Result<Outline, PipelineError>;

    /// Structural check of an outline. Does not call out to a model.
    fn validate(&self, outline: &Outline) -> OutlineReport;
}

#[async_trait]
pub trait DraftGenerator: Send + Sync {
    async fn generate(&self, input: &DraftGenerationInput) -> Result<DraftArtifact, PipelineError>;
}

/// Field-level regeneration used by the repair strategies.
///
/// Each call sees the whole current draft for context but returns only the replacement
/// value; applying it is the dispatcher's job.
#[async_trait]
pub trait FieldRepairer: Send + Sync {
    async fn regenerate_hero_answer(
        &self,
        draft: &DraftArtifact,
        brief: &Brief,
        prompt: &str,
    ) -> Result<String, PipelineError>;

    async fn regenerate_section(
        &self,
        draft: &DraftArtifact,
        index: usize,
        brief: &Brief,
        prompt: &str,
    ) -> Result<Section, PipelineError>;

    async fn answer_faq(
        &self,
        draft: &DraftArtifact,
        brief: &Brief,
        question: &str,
    ) -> Result<String, PipelineError>;
}
