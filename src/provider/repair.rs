//! Provider-backed field repair.
//!
//! Renders a prompt per repair kind, sends it through a [`ModelProviderClient`], and cleans
//! the completion into the replacement value. Token usage is accumulated across calls.

use super::{ChatMessage, CompletionOptions, ModelProviderClient, TokenUsage};
use crate::content::{Brief, DraftArtifact, Section};
use crate::error::PipelineError;
use crate::generation::FieldRepairer;
use crate::text;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Prompt templates. `{title}`, `{keyword}`, `{instructions}`, `{heading}`, `{key_points}`,
/// `{current}` and `{question}` are substituted where present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairPrompts {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_hero_template")]
    pub hero_template: String,
    #[serde(default = "default_section_template")]
    pub section_template: String,
    #[serde(default = "default_faq_template")]
    pub faq_template: String,
}

fn default_system_prompt() -> String {
    "You are an experienced editor repairing one part of a long-form article. Return only the requested content, without commentary.".to_string()
}

fn default_hero_template() -> String {
    "Article: {title}\nPrimary keyword: {keyword}\n\nRewrite the opening answer. Answer the reader's question directly in two to four sentences of plain text.\n\nInstructions:\n{instructions}\n\nCurrent answer:\n{current}".to_string()
}

fn default_section_template() -> String {
    "Article: {title}\nPrimary keyword: {keyword}\nSection heading: {heading}\nKey points:\n{key_points}\n\nRewrite this section as HTML paragraphs (no heading tag).\n\nInstructions:\n{instructions}\n\nCurrent section:\n{current}".to_string()
}

fn default_faq_template() -> String {
    "Article: {title}\nPrimary keyword: {keyword}\n\nAnswer this reader question in 40 to 80 words of plain text:\n{question}".to_string()
}

impl Default for RepairPrompts {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            hero_template: default_hero_template(),
            section_template: default_section_template(),
            faq_template: default_faq_template(),
        }
    }
}

/// Settings for provider-backed repair. Loaded from the `[repair]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepairConfig {
    /// Name of the `[providers.<name>]` entry to use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Overrides the provider's default completion options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<CompletionOptions>,
    #[serde(default)]
    pub prompts: RepairPrompts,
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "- (none)".to_string();
    }
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Removes a surrounding Markdown code fence, if any.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

static TEMPLATE_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").expect("static regex"));

/// Substitutes `{name}` placeholders in one pass; substituted text is never re-expanded.
/// Unknown names are left as written.
fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    TEMPLATE_VAR
        .replace_all(template, |caps: &Captures<'_>| {
            vars.iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub struct ProviderFieldRepairer {
    client: Arc<dyn ModelProviderClient>,
    options: CompletionOptions,
    prompts: RepairPrompts,
    usage: Mutex<TokenUsage>,
}

impl ProviderFieldRepairer {
    pub fn new(client: Arc<dyn ModelProviderClient>, options: CompletionOptions) -> Self {
        Self {
            client,
            options,
            prompts: RepairPrompts::default(),
            usage: Mutex::new(TokenUsage::default()),
        }
    }

    pub fn with_prompts(mut self, prompts: RepairPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Total usage across every completion made so far.
    pub fn usage(&self) -> TokenUsage {
        *self.usage.lock()
    }

    fn render(template: &str, draft: &DraftArtifact, vars: &[(&str, &str)]) -> String {
        let mut all = vec![
            ("title", draft.title.as_str()),
            ("keyword", draft.primary_keyword.as_str()),
        ];
        all.extend_from_slice(vars);
        fill_template(template, &all)
    }

    async fn complete(&self, user_prompt: String) -> Result<String, PipelineError> {
        let messages = vec![
            ChatMessage::system(self.prompts.system_prompt.clone()),
            ChatMessage::user(user_prompt),
        ];
        let response = self.client.complete(messages, self.options.clone()).await?;
        self.usage.lock().add(response.usage);
        debug!(
            provider = self.client.provider_name(),
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            "Repair completion received"
        );
        Ok(strip_code_fence(&response.content).to_string())
    }
}

#[async_trait]
impl FieldRepairer for ProviderFieldRepairer {
    async fn regenerate_hero_answer(
        &self,
        draft: &DraftArtifact,
        _brief: &Brief,
        prompt: &str,
    ) -> Result<String, PipelineError> {
        let user_prompt = Self::render(
            &self.prompts.hero_template,
            draft,
            &[("instructions", prompt), ("current", draft.hero_answer.as_str())],
        );
        let content = self.complete(user_prompt).await?;
        Ok(text::strip_html(&content))
    }

    async fn regenerate_section(
        &self,
        draft: &DraftArtifact,
        index: usize,
        brief: &Brief,
        prompt: &str,
    ) -> Result<Section, PipelineError> {
        let current = draft.sections.get(index).ok_or_else(|| {
            PipelineError::repair(
                format!("sections[{}]", index),
                format!("draft has only {} sections", draft.sections.len()),
            )
        })?;
        let key_points = brief
            .outline_entry(index)
            .map(|entry| bullet_list(&entry.key_points))
            .unwrap_or_else(|| bullet_list(&[]));

        let user_prompt = Self::render(
            &self.prompts.section_template,
            draft,
            &[
                ("heading", current.heading.as_str()),
                ("key_points", key_points.as_str()),
                ("instructions", prompt),
                ("current", current.body_html.as_str()),
            ],
        );
        let body = self.complete(user_prompt).await?;
        if body.is_empty() {
            return Err(PipelineError::ProviderError(
                "Provider returned an empty section".to_string(),
            ));
        }
        Ok(Section::new(current.heading.clone(), current.level, body))
    }

    async fn answer_faq(
        &self,
        draft: &DraftArtifact,
        _brief: &Brief,
        question: &str,
    ) -> Result<String, PipelineError> {
        let user_prompt =
            Self::render(&self.prompts.faq_template, draft, &[("question", question)]);
        let content = self.complete(user_prompt).await?;
        Ok(text::strip_html(&content))
    }
}
