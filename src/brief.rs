//! Brief Resolution
//!
//! Normalizes the three accepted input shapes into a canonical [`Brief`]. Explicit briefs
//! (and ideas that already carry one) pass through untouched; ideas and raw topics go
//! through the outline collaborator and the outline is converted into a brief.

use crate::cancel::CallGuard;
use crate::content::{
    Brief, BriefOutlineEntry, ContentIdea, Outline, OutlineOptions, SearchIntent,
    TopicDescriptor,
};
use crate::error::PipelineError;
use crate::generation::OutlineGenerator;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One of the three ways a run can be started.
#[derive(Debug, Clone, PartialEq)]
pub enum BriefInput {
    Explicit(Brief),
    Idea(ContentIdea),
    Topic(TopicDescriptor),
}

impl BriefInput {
    pub fn kind(&self) -> &'static str {
        match self {
            BriefInput::Explicit(_) => "brief",
            BriefInput::Idea(_) => "idea",
            BriefInput::Topic(_) => "topic",
        }
    }

    /// Keyword and intent hints carried by the input, used for draft generation.
    pub fn primary_keyword(&self) -> Option<&str> {
        match self {
            BriefInput::Explicit(_) => None,
            BriefInput::Idea(idea) => Some(&idea.primary_keyword),
            BriefInput::Topic(topic) => Some(&topic.primary_keyword),
        }
    }

    pub fn search_intent(&self) -> SearchIntent {
        match self {
            BriefInput::Explicit(_) => SearchIntent::default(),
            BriefInput::Idea(idea) => idea.intent,
            BriefInput::Topic(topic) => topic.intent.into(),
        }
    }

    pub fn cluster(&self) -> Option<&str> {
        match self {
            BriefInput::Explicit(_) => None,
            BriefInput::Idea(idea) => idea.cluster.as_deref(),
            BriefInput::Topic(topic) => topic.cluster.as_deref(),
        }
    }
}

/// Wire shape of a brief input: three optional slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefInputRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brief: Option<Brief>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idea: Option<ContentIdea>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<TopicDescriptor>,
}

impl TryFrom<BriefInputRecord> for BriefInput {
    type Error = PipelineError;

    /// Precedence: brief, then idea, then topic.
    fn try_from(record: BriefInputRecord) -> Result<Self, Self::Error> {
        if let Some(brief) = record.brief {
            return Ok(BriefInput::Explicit(brief));
        }
        if let Some(idea) = record.idea {
            return Ok(BriefInput::Idea(idea));
        }
        if let Some(topic) = record.topic {
            return Ok(BriefInput::Topic(topic));
        }
        Err(PipelineError::BriefResolution)
    }
}

impl From<Brief> for BriefInput {
    fn from(brief: Brief) -> Self {
        BriefInput::Explicit(brief)
    }
}

impl From<ContentIdea> for BriefInput {
    fn from(idea: ContentIdea) -> Self {
        BriefInput::Idea(idea)
    }
}

impl From<TopicDescriptor> for BriefInput {
    fn from(topic: TopicDescriptor) -> Self {
        BriefInput::Topic(topic)
    }
}

/// Resolution output. `outline` is set only for raw-topic input.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBrief {
    pub brief: Brief,
    pub outline: Option<Outline>,
}

pub struct BriefResolver<'a> {
    outlines: &'a dyn OutlineGenerator,
}

impl<'a> BriefResolver<'a> {
    pub fn new(outlines: &'a dyn OutlineGenerator) -> Self {
        Self { outlines }
    }

    pub async fn resolve(
        &self,
        input: &BriefInput,
        options: &OutlineOptions,
        guard: &CallGuard,
    ) -> Result<ResolvedBrief, PipelineError> {
        let resolved = match input {
            BriefInput::Explicit(brief) => ResolvedBrief {
                brief: brief.clone(),
                outline: None,
            },
            BriefInput::Idea(idea) => match &idea.brief {
                Some(brief) => ResolvedBrief {
                    brief: brief.clone(),
                    outline: None,
                },
                None => {
                    let outline = self.outline(&idea.to_topic(), options, guard).await?;
                    ResolvedBrief {
                        brief: brief_from_outline(&outline),
                        outline: None,
                    }
                }
            },
            BriefInput::Topic(topic) => {
                let outline = self.outline(topic, options, guard).await?;
                ResolvedBrief {
                    brief: brief_from_outline(&outline),
                    outline: Some(outline),
                }
            }
        };

        info!(
            input = input.kind(),
            title = %resolved.brief.suggested_title,
            outline_entries = resolved.brief.outline.len(),
            "Brief resolved"
        );
        Ok(resolved)
    }

    async fn outline(
        &self,
        topic: &TopicDescriptor,
        options: &OutlineOptions,
        guard: &CallGuard,
    ) -> Result<Outline, PipelineError> {
        debug!(title = %topic.title, keyword = %topic.primary_keyword, "Generating outline");
        guard
            .run("outline generation", self.outlines.generate(topic, options))
            .await
    }
}

/// Converts an outline into a brief.
///
/// FAQ questions seed both the key questions and the FAQ suggestions; sections that carry
/// an internal link contribute it to the suggested links.
pub fn brief_from_outline(outline: &Outline) -> Brief {
    let questions: Vec<String> = outline.faqs.iter().map(|faq| faq.question.clone()).collect();
    Brief {
        suggested_title: outline.title.clone(),
        suggested_slug: outline.slug.clone(),
        hero_answer_draft: outline.hero_answer.clone(),
        outline: outline
            .sections
            .iter()
            .map(|section| BriefOutlineEntry {
                level: section.level,
                heading: section.heading.clone(),
                key_points: section.key_points.clone(),
                estimated_words: section.estimated_words,
            })
            .collect(),
        key_questions: questions.clone(),
        suggested_internal_links: outline
            .sections
            .iter()
            .filter_map(|section| section.internal_link.clone())
            .collect(),
        suggested_external_refs: outline.external_refs.clone(),
        faq_suggestions: questions,
        experience_prompts: outline.experience_prompts.clone(),
    }
}
