//! Generation Orchestrator
//!
//! Sequences brief resolution, draft generation, validation and the bounded repair loop,
//! and folds every outcome (including failures and panics inside collaborators) into a
//! [`GenerationResult`]. Runs hold no shared mutable state and can execute concurrently;
//! see [`Orchestrator::generate_batch`].

mod batch;
mod request;
mod result;
mod run;

pub use request::{GenerationOptions, GenerationRequest};
pub use result::{BatchSummary, GenerationResult, RunOutcome};

use crate::cancel::{CallGuard, CancellationSignal};
use crate::generation::{DraftGenerator, FieldRepairer, OutlineGenerator};
use crate::validation::Validator;
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Duration;

/// Pipeline limits. Loaded from the `[pipeline]` table of the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Requested repair iterations; the dispatcher caps this at its own ceiling
    #[serde(default = "default_auto_repair_attempts")]
    pub auto_repair_attempts: u32,

    /// Deadline for each collaborator call, in seconds. 0 disables the deadline.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
}

fn default_auto_repair_attempts() -> u32 {
    2
}

fn default_call_timeout_secs() -> u64 {
    120
}

fn default_batch_concurrency() -> usize {
    4
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            auto_repair_attempts: default_auto_repair_attempts(),
            call_timeout_secs: default_call_timeout_secs(),
            batch_concurrency: default_batch_concurrency(),
        }
    }
}

impl PipelineConfig {
    pub fn call_timeout(&self) -> Option<Duration> {
        (self.call_timeout_secs > 0).then(|| Duration::from_secs(self.call_timeout_secs))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.batch_concurrency == 0 {
            return Err("batch_concurrency must be at least 1".to_string());
        }
        Ok(())
    }
}

pub struct Orchestrator {
    outlines: Arc<dyn OutlineGenerator>,
    drafts: Arc<dyn DraftGenerator>,
    repairer: Arc<dyn FieldRepairer>,
    validator: Validator,
    settings: PipelineConfig,
    cancellation: CancellationSignal,
    run_sequence: AtomicU64,
}

impl Orchestrator {
    pub fn new(
        outlines: Arc<dyn OutlineGenerator>,
        drafts: Arc<dyn DraftGenerator>,
        repairer: Arc<dyn FieldRepairer>,
        validator: Validator,
    ) -> Self {
        Self {
            outlines,
            drafts,
            repairer,
            validator,
            settings: PipelineConfig::default(),
            cancellation: CancellationSignal::never(),
            run_sequence: AtomicU64::new(0),
        }
    }

    pub fn with_settings(mut self, settings: PipelineConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Runs started after the signal fires end as [`RunOutcome::Cancelled`]; runs in
    /// flight stop at their next collaborator call.
    pub fn with_cancellation(mut self, signal: CancellationSignal) -> Self {
        self.cancellation = signal;
        self
    }

    pub fn settings(&self) -> &PipelineConfig {
        &self.settings
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    fn call_guard(&self) -> CallGuard {
        CallGuard::new(self.settings.call_timeout(), self.cancellation.clone())
    }
}
