//! The bounded repair loop.

use super::plan::{FieldGroup, RepairPlan};
use super::strategies::{self, StrategyContext};
use crate::cancel::CallGuard;
use crate::content::{Brief, DraftArtifact, DraftPatch, DraftStatus};
use crate::error::PipelineError;
use crate::generation::FieldRepairer;
use crate::validation::{ValidationResult, Validator};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use tracing::{info, warn};

/// Hard ceiling on repair iterations regardless of what the caller asks for.
pub const MAX_REPAIR_ATTEMPTS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairState {
    Validated,
    Repairing { attempt: u32 },
    Terminated(TerminationReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Draft is valid
    Success,
    /// Attempt budget spent while still invalid
    Exhausted,
    /// An iteration changed nothing
    NonProductive,
    Cancelled,
}

/// What a single field strategy did in one iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FieldRepairOutcome {
    Changed,
    NoChange,
    Failed(String),
    /// No strategy exists for the field
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRepairRecord {
    pub field: String,
    pub outcome: FieldRepairOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairIteration {
    pub attempt: u32,
    pub fields: Vec<FieldRepairRecord>,
    /// Field paths written by this iteration's patch
    pub touched: Vec<String>,
    pub score_before: u32,
    pub score_after: u32,
    pub valid_after: bool,
}

/// Final state of a repair loop.
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    pub draft: DraftArtifact,
    pub validation: ValidationResult,
    pub attempts: u32,
    pub termination: TerminationReason,
    pub iterations: Vec<RepairIteration>,
    pub warnings: Vec<String>,
}

impl RepairOutcome {
    pub fn success(&self) -> bool {
        self.validation.valid
    }
}

enum IterationEnd {
    Applied,
    NonProductive,
    Cancelled,
}

pub struct RepairDispatcher<'a> {
    validator: &'a Validator,
    repairer: &'a dyn FieldRepairer,
    guard: &'a CallGuard,
}

impl<'a> RepairDispatcher<'a> {
    pub fn new(validator: &'a Validator, repairer: &'a dyn FieldRepairer, guard: &'a CallGuard) -> Self {
        Self {
            validator,
            repairer,
            guard,
        }
    }

    /// Effective iteration limit for a requested attempt count.
    pub fn attempt_limit(requested: u32) -> u32 {
        requested.min(MAX_REPAIR_ATTEMPTS)
    }

    pub async fn run(
        &self,
        draft: DraftArtifact,
        brief: &Brief,
        validation: ValidationResult,
        requested_attempts: u32,
    ) -> RepairOutcome {
        let limit = Self::attempt_limit(requested_attempts);
        let mut outcome = RepairOutcome {
            draft,
            validation,
            attempts: 0,
            termination: TerminationReason::Success,
            iterations: Vec::new(),
            warnings: Vec::new(),
        };

        let mut state = RepairState::Validated;
        let termination = loop {
            state = match state {
                RepairState::Validated if outcome.validation.valid => {
                    RepairState::Terminated(TerminationReason::Success)
                }
                RepairState::Validated if outcome.attempts >= limit => {
                    RepairState::Terminated(TerminationReason::Exhausted)
                }
                RepairState::Validated => RepairState::Repairing {
                    attempt: outcome.attempts + 1,
                },
                RepairState::Repairing { attempt } => {
                    outcome.attempts = attempt;
                    match self.iterate(attempt, brief, &mut outcome).await {
                        IterationEnd::Applied => RepairState::Validated,
                        IterationEnd::NonProductive => {
                            RepairState::Terminated(TerminationReason::NonProductive)
                        }
                        IterationEnd::Cancelled => {
                            RepairState::Terminated(TerminationReason::Cancelled)
                        }
                    }
                }
                RepairState::Terminated(reason) => break reason,
            };
        };
        outcome.termination = termination;

        if !outcome.validation.valid {
            let remaining = outcome.validation.error_count();
            outcome.warnings.push(format!(
                "{} error-severity issue(s) remain after {} repair attempt(s); manual review required",
                remaining, outcome.attempts
            ));
            let mut patch = DraftPatch::new();
            patch.set_status(DraftStatus::NeedsReview);
            outcome.draft = patch.apply(&outcome.draft);
        }

        info!(
            attempts = outcome.attempts,
            termination = ?outcome.termination,
            valid = outcome.validation.valid,
            score = outcome.validation.score,
            "Repair loop finished"
        );
        outcome
    }

    async fn iterate(&self, attempt: u32, brief: &Brief, outcome: &mut RepairOutcome) -> IterationEnd {
        let plan = RepairPlan::from_validation(&outcome.validation);
        let score_before = outcome.validation.score;
        let mut patch = DraftPatch::new();
        let mut records = Vec::new();
        let mut cancelled = false;

        {
            let ctx = StrategyContext {
                draft: &outcome.draft,
                brief,
                repairer: self.repairer,
                guard: self.guard,
                min_faqs: self.validator.config().min_faqs,
            };

            for group in plan.groups() {
                let result = self.dispatch(&ctx, group, &mut patch).await;
                let field_outcome = match result {
                    Some(Ok(true)) => FieldRepairOutcome::Changed,
                    Some(Ok(false)) => FieldRepairOutcome::NoChange,
                    Some(Err(err)) if err.is_cancelled() => {
                        warn!(field = %group.field, attempt, "Repair cancelled");
                        cancelled = true;
                        FieldRepairOutcome::Failed(err.to_string())
                    }
                    Some(Err(err)) => {
                        warn!(field = %group.field, attempt, error = %err, "Field repair failed");
                        outcome.warnings.push(format!(
                            "Repair of {} failed on attempt {}: {}",
                            group.field, attempt, err
                        ));
                        FieldRepairOutcome::Failed(err.to_string())
                    }
                    None => {
                        info!(field = %group.field, attempt, "No repair strategy for field; skipping");
                        outcome.warnings.push(format!(
                            "No repair strategy for {}; skipped on attempt {}",
                            group.field, attempt
                        ));
                        FieldRepairOutcome::Skipped
                    }
                };
                records.push(FieldRepairRecord {
                    field: group.field.clone(),
                    outcome: field_outcome,
                });
                if cancelled {
                    break;
                }
            }
        }

        let productive = !patch.is_empty();
        if productive {
            outcome.draft = patch.apply(&outcome.draft);
            outcome.validation = self.validator.validate(&outcome.draft);
        } else if !cancelled {
            outcome
                .warnings
                .push(format!("Repair attempt {} produced no changes", attempt));
        }

        info!(
            attempt,
            fields = records.len(),
            touched = ?patch.touched_fields(),
            score_before,
            score_after = outcome.validation.score,
            "Repair iteration complete"
        );
        outcome.iterations.push(RepairIteration {
            attempt,
            fields: records,
            touched: patch.touched_fields(),
            score_before,
            score_after: outcome.validation.score,
            valid_after: outcome.validation.valid,
        });

        if cancelled {
            outcome
                .warnings
                .push(format!("Repair cancelled during attempt {}", attempt));
            IterationEnd::Cancelled
        } else if productive {
            IterationEnd::Applied
        } else {
            IterationEnd::NonProductive
        }
    }

    /// `None` when no strategy handles the field. A panicking strategy is reported as a
    /// failure of that field only.
    async fn dispatch(
        &self,
        ctx: &StrategyContext<'_>,
        group: &FieldGroup,
        patch: &mut DraftPatch,
    ) -> Option<Result<bool, PipelineError>> {
        let strategy = async {
            match group.field.as_str() {
                "heroAnswer" => Some(strategies::repair_hero_answer(ctx, group, patch).await),
                "sections" => Some(strategies::repair_sections(ctx, group, patch).await),
                "faqs" | "faq" => Some(strategies::repair_faqs(ctx, patch).await),
                "experienceEvidence" => {
                    Some(Ok(strategies::repair_experience_evidence(ctx, patch)))
                }
                _ => None,
            }
        };
        match AssertUnwindSafe(strategy).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => Some(Err(PipelineError::panicked("field repairer", &*payload))),
        }
    }
}
