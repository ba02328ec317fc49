//! Error types for the draftsmith generation pipeline.
//!
//! Validation findings are data (see [`crate::validation::Issue`]) and never appear here.
//! These errors cover the failures that can end a stage early: an unusable input, a
//! collaborator call that failed or ran out of time, provider plumbing, and configuration.

use std::any::Any;
use thiserror::Error;

/// Message reported when no brief input variant was populated.
pub const BRIEF_RESOLUTION_MESSAGE: &str = "Could not resolve or generate brief from input";

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{}", BRIEF_RESOLUTION_MESSAGE)]
    BriefResolution,

    #[error("{collaborator} failed: {message}")]
    Collaborator {
        collaborator: &'static str,
        message: String,
    },

    #[error("{operation} exceeded its deadline of {timeout_ms} ms")]
    DeadlineExceeded {
        operation: String,
        timeout_ms: u64,
    },

    #[error("Cancelled during {0}")]
    Cancelled(String),

    #[error("Repair failed for {field}: {message}")]
    Repair { field: String, message: String },

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Provider request failed: {0}")]
    ProviderRequestFailed(String),

    #[error("Provider authentication failed: {0}")]
    ProviderAuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    ProviderRateLimit(String),

    #[error("Provider model not found: {0}")]
    ProviderModelNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid draft: {0}")]
    InvalidDraft(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn collaborator(collaborator: &'static str, message: impl Into<String>) -> Self {
        PipelineError::Collaborator {
            collaborator,
            message: message.into(),
        }
    }

    pub fn repair(field: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::Repair {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Collaborator failure carrying the message of a caught panic.
    pub fn panicked(collaborator: &'static str, payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            message.to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::collaborator(collaborator, format!("panicked: {}", message))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PipelineError::Cancelled(_))
    }
}

impl From<config::ConfigError> for PipelineError {
    fn from(err: config::ConfigError) -> Self {
        PipelineError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::InvalidDraft(err.to_string())
    }
}
