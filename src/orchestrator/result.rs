use crate::content::{DraftArtifact, Outline};
use crate::repair::{RepairIteration, TerminationReason};
use crate::validation::ValidationResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Final validation passed
    Valid,
    /// Draft produced but still invalid after repair
    NeedsReview,
    /// Draft produced with validation skipped
    Unvalidated,
    Failed,
    Cancelled,
}

/// The only externally observable output of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub run_id: String,
    pub success: bool,
    pub outcome: RunOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<DraftArtifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
    pub repair_attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination: Option<TerminationReason>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub duration_ms: u64,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub repair_log: Vec<RepairIteration>,
}

impl GenerationResult {
    pub fn score(&self) -> Option<u32> {
        self.validation.as_ref().map(|validation| validation.score)
    }
}

/// Outcome counts across a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub valid: usize,
    pub needs_review: usize,
    pub unvalidated: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[GenerationResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Default::default()
        };
        for result in results {
            match result.outcome {
                RunOutcome::Valid => summary.valid += 1,
                RunOutcome::NeedsReview => summary.needs_review += 1,
                RunOutcome::Unvalidated => summary.unvalidated += 1,
                RunOutcome::Failed => summary.failed += 1,
                RunOutcome::Cancelled => summary.cancelled += 1,
            }
        }
        summary
    }
}
