use crate::brief::{BriefInput, BriefInputRecord};
use crate::content::{Brief, OutlineOptions};
use crate::error::PipelineError;
use crate::generation::{AuthorProfile, DraftGenerationInput, Exemplar};
use serde::{Deserialize, Serialize};

/// Per-run knobs. Anything left unset falls back to the pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    #[serde(default)]
    pub author: AuthorProfile,
    #[serde(default)]
    pub exemplars: Vec<Exemplar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_hint: Option<String>,
    /// Overrides `pipeline.auto_repair_attempts`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_repair_attempts: Option<u32>,
    #[serde(default)]
    pub skip_validation: bool,
    #[serde(default)]
    pub outline: OutlineOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub input: BriefInput,
    pub options: GenerationOptions,
}

impl GenerationRequest {
    pub fn new(input: impl Into<BriefInput>) -> Self {
        Self {
            input: input.into(),
            options: GenerationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Build from the wire shape; fails when no input slot is populated.
    pub fn from_record(
        record: BriefInputRecord,
        options: GenerationOptions,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            input: BriefInput::try_from(record)?,
            options,
        })
    }

    /// Draft generation input for the resolved brief.
    ///
    /// Keyword, intent and cluster come from the idea or topic that started the run; an
    /// explicit brief has no such hints and falls back to its suggested title.
    pub fn generation_input(&self, brief: &Brief) -> DraftGenerationInput {
        let primary_keyword = self
            .input
            .primary_keyword()
            .filter(|keyword| !keyword.trim().is_empty())
            .unwrap_or(brief.suggested_title.as_str())
            .to_string();

        DraftGenerationInput {
            brief: brief.clone(),
            author: self.options.author.clone(),
            exemplars: self.options.exemplars.clone(),
            primary_keyword,
            search_intent: self.input.search_intent(),
            cluster: self.input.cluster().map(str::to_string),
            style: self.options.style.clone(),
            hook: self.options.hook.clone(),
            product_hint: self.options.product_hint.clone(),
        }
    }
}
