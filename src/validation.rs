//! Draft Validation
//!
//! Deterministic quality gate for draft artifacts. Metrics are extracted from the draft,
//! every rule in the battery runs against them, and the resulting issues are scored.
//! Validation is a pure function of (draft, config): the same input always yields the
//! same [`ValidationResult`], and nothing is cached between calls.

pub mod classify;
pub mod config;
pub mod metrics;
pub mod rules;
pub mod scorer;
pub mod types;

pub use classify::{ContentTags, KeywordClassifier, TextClassifier};
pub use config::ValidationConfig;
pub use metrics::{extract_metrics, ContentMetrics};
pub use rules::{default_rules, ContentRule, Findings, RuleContext, RULE_IDS};
pub use scorer::PASSING_SCORE;
pub use types::{
    FieldPath, Issue, RepairAction, RepairSuggestion, Severity, ValidationResult,
};

use crate::content::DraftArtifact;
use std::sync::Arc;
use tracing::debug;

/// Runs the rule battery over drafts.
pub struct Validator {
    config: ValidationConfig,
    classifier: Arc<dyn TextClassifier>,
    rules: Vec<Box<dyn ContentRule>>,
}

impl Validator {
    /// Validator with the keyword classifier built from `config.hazardous_keywords`.
    pub fn new(config: ValidationConfig) -> Self {
        let classifier = Arc::new(KeywordClassifier::new(&config.hazardous_keywords));
        Self {
            config,
            classifier,
            rules: default_rules(),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn TextClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn validate(&self, draft: &DraftArtifact) -> ValidationResult {
        let metrics = extract_metrics(draft, self.classifier.as_ref());
        let ctx = RuleContext {
            draft,
            metrics: &metrics,
            config: &self.config,
            classifier: self.classifier.as_ref(),
        };

        let mut issues = Vec::new();
        let mut repair_suggestions = Vec::new();
        for rule in &self.rules {
            let mut findings = Findings::default();
            rule.check(&ctx, &mut findings);
            let findings = findings.finish(rule.id(), self.config.severity_override(rule.id()));
            issues.extend(findings.issues);
            repair_suggestions.extend(findings.suggestions);
        }

        let score = scorer::score(&issues, &metrics, &self.config);
        let valid = scorer::is_valid(score, &issues);

        debug!(
            slug = %draft.slug,
            score,
            valid,
            issues = issues.len(),
            suggestions = repair_suggestions.len(),
            "Draft validated"
        );

        ValidationResult {
            valid,
            score,
            issues,
            metrics,
            repair_suggestions,
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

/// One-shot validation with the default classifier.
pub fn validate_draft(draft: &DraftArtifact, config: &ValidationConfig) -> ValidationResult {
    Validator::new(config.clone()).validate(draft)
}
