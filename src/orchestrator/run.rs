//! Single-run entry point: resolve, generate, validate, repair.

use super::request::{GenerationOptions, GenerationRequest};
use super::result::{GenerationResult, RunOutcome};
use super::Orchestrator;
use crate::brief::{BriefInputRecord, BriefResolver};
use crate::cancel::CallGuard;
use crate::content::{DraftArtifact, Outline, OutlineReport};
use crate::error::PipelineError;
use crate::repair::{RepairDispatcher, RepairIteration, RepairOutcome, TerminationReason};
use crate::validation::{Severity, ValidationResult};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::{error, info, warn};

/// Partial results accumulated while a run progresses. Whatever is here when a stage
/// fails ends up in the result.
#[derive(Default)]
struct RunState {
    draft: Option<DraftArtifact>,
    outline: Option<Outline>,
    validation: Option<ValidationResult>,
    repair_attempts: u32,
    termination: Option<TerminationReason>,
    repair_log: Vec<RepairIteration>,
    errors: Vec<String>,
    warnings: Vec<String>,
    outcome: Option<RunOutcome>,
}

impl RunState {
    fn fold_outline_report(&mut self, report: OutlineReport) {
        if !report.valid {
            warn!(issues = report.issues.len(), "Outline failed its own validation");
        }
        self.errors
            .extend(report.issues.into_iter().map(|issue| format!("[outline] {}", issue)));
        self.warnings.extend(report.warnings);
    }

    fn absorb_repair(&mut self, repair: RepairOutcome) {
        self.repair_attempts = repair.attempts;
        self.termination = Some(repair.termination);
        self.repair_log = repair.iterations;
        self.warnings.extend(repair.warnings);
        self.outcome = Some(if repair.validation.valid {
            RunOutcome::Valid
        } else if repair.termination == TerminationReason::Cancelled {
            RunOutcome::Cancelled
        } else {
            RunOutcome::NeedsReview
        });
        self.draft = Some(repair.draft);
        self.validation = Some(repair.validation);
    }

    fn fail(&mut self, err: PipelineError) {
        let message = match &err {
            PipelineError::BriefResolution => err.to_string(),
            other => format!("Generation failed: {}", other),
        };
        error!(error = %err, "Generation run failed");
        self.errors.push(message);
        self.outcome = Some(if err.is_cancelled() {
            RunOutcome::Cancelled
        } else {
            RunOutcome::Failed
        });
    }

    fn into_result(mut self, run_id: String, started_at: DateTime<Utc>, clock: Instant) -> GenerationResult {
        // Issues of the final validation come after any fatal or outline messages.
        if let Some(validation) = &self.validation {
            for issue in &validation.issues {
                match issue.severity {
                    Severity::Error => self.errors.push(issue.describe()),
                    Severity::Warning | Severity::Info => self.warnings.push(issue.describe()),
                }
            }
        }

        let outcome = self.outcome.unwrap_or(RunOutcome::Failed);
        let success = matches!(outcome, RunOutcome::Valid | RunOutcome::Unvalidated);

        GenerationResult {
            run_id,
            success,
            outcome,
            draft: self.draft,
            outline: self.outline,
            validation: self.validation,
            repair_attempts: self.repair_attempts,
            termination: self.termination,
            errors: self.errors,
            warnings: self.warnings,
            duration_ms: clock.elapsed().as_millis() as u64,
            started_at,
            repair_log: self.repair_log,
        }
    }
}

impl Orchestrator {
    /// Run ids are unique per orchestrator: start time plus a per-instance sequence.
    fn next_run_id(&self, started_at: &DateTime<Utc>) -> String {
        let sequence = self.run_sequence.fetch_add(1, Ordering::Relaxed);
        format!("run-{}-{:04}", started_at.format("%Y%m%dT%H%M%S%3f"), sequence)
    }

    /// Run one request to completion. Never returns an error: failures, panics and
    /// cancellation are all reported through the result.
    pub async fn generate(&self, request: GenerationRequest) -> GenerationResult {
        let started_at = Utc::now();
        let clock = Instant::now();
        let run_id = self.next_run_id(&started_at);
        let guard = self.call_guard();
        let mut state = RunState::default();

        info!(run_id = %run_id, input = request.input.kind(), "Generation run started");
        let stages = AssertUnwindSafe(self.run_stages(&request, &guard, &mut state)).catch_unwind();
        match stages.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => state.fail(err),
            Err(payload) => state.fail(PipelineError::panicked("pipeline", &*payload)),
        }

        let result = state.into_result(run_id, started_at, clock);
        info!(
            run_id = %result.run_id,
            outcome = ?result.outcome,
            success = result.success,
            score = ?result.score(),
            repair_attempts = result.repair_attempts,
            duration_ms = result.duration_ms,
            "Generation run finished"
        );
        result
    }

    /// Wire-shaped entry point. An empty record fails before any collaborator is called.
    pub async fn generate_from_record(
        &self,
        record: BriefInputRecord,
        options: GenerationOptions,
    ) -> GenerationResult {
        match GenerationRequest::from_record(record, options) {
            Ok(request) => self.generate(request).await,
            Err(err) => {
                let started_at = Utc::now();
                let clock = Instant::now();
                let mut state = RunState::default();
                state.fail(err);
                state.into_result(self.next_run_id(&started_at), started_at, clock)
            }
        }
    }

    async fn run_stages(
        &self,
        request: &GenerationRequest,
        guard: &CallGuard,
        state: &mut RunState,
    ) -> Result<(), PipelineError> {
        let resolver = BriefResolver::new(self.outlines.as_ref());
        let resolved = resolver
            .resolve(&request.input, &request.options.outline, guard)
            .await?;

        if let Some(outline) = resolved.outline {
            let report = self.outlines.validate(&outline);
            state.fold_outline_report(report);
            state.outline = Some(outline);
        }

        let input = request.generation_input(&resolved.brief);
        let draft = guard
            .run("draft generation", self.drafts.generate(&input))
            .await?;
        info!(
            slug = %draft.slug,
            sections = draft.sections.len(),
            faqs = draft.faqs.len(),
            "Draft generated"
        );
        state.draft = Some(draft.clone());

        if request.options.skip_validation {
            state.outcome = Some(RunOutcome::Unvalidated);
            return Ok(());
        }

        let validation = self.validator.validate(&draft);
        info!(score = validation.score, valid = validation.valid, issues = validation.issues.len(), "Draft scored");
        state.validation = Some(validation.clone());

        let attempts = request
            .options
            .auto_repair_attempts
            .unwrap_or(self.settings.auto_repair_attempts);
        let repair = RepairDispatcher::new(&self.validator, self.repairer.as_ref(), guard)
            .run(draft, &resolved.brief, validation, attempts)
            .await;
        state.absorb_repair(repair);
        Ok(())
    }
}
