//! Configuration System
//!
//! Layered configuration for validation thresholds, pipeline limits, provider-backed repair
//! and logging. Sources are merged in order: built-in defaults, the global file, workspace
//! files, then `DRAFTSMITH__SECTION__KEY` environment variables. Tests included.

use crate::error::PipelineError;
use crate::logging::LoggingConfig;
use crate::provider::ProviderFactory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub use crate::orchestrator::PipelineConfig;
pub use crate::provider::{ProviderConfig, ProviderFieldRepairer, ProviderType, RepairConfig};
pub use crate::validation::ValidationConfig;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftsmithConfig {
    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Provider-backed field repair
    #[serde(default)]
    pub repair: RepairConfig,

    /// Model provider configurations, keyed by name
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Validation(String),
    Pipeline(String),
    Provider(String, String),
    Repair(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Validation(msg) => write!(f, "Validation: {}", msg),
            ValidationError::Pipeline(msg) => write!(f, "Pipeline: {}", msg),
            ValidationError::Provider(name, msg) => write!(f, "Provider '{}': {}", name, msg),
            ValidationError::Repair(msg) => write!(f, "Repair: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl DraftsmithConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.validation.validate() {
            errors.push(ValidationError::Validation(e));
        }
        if let Err(e) = self.pipeline.validate() {
            errors.push(ValidationError::Pipeline(e));
        }

        let mut names: Vec<&String> = self.providers.keys().collect();
        names.sort();
        for name in names {
            if let Err(e) = self.providers[name].validate() {
                errors.push(ValidationError::Provider(name.clone(), e));
            }
        }

        if let Some(provider) = &self.repair.provider {
            if !self.providers.contains_key(provider) {
                errors.push(ValidationError::Repair(format!(
                    "provider '{}' is not defined under [providers]",
                    provider
                )));
            }
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Provider named by `[repair].provider`, with its name filled in.
    pub fn repair_provider(&self) -> Option<ProviderConfig> {
        let name = self.repair.provider.as_ref()?;
        self.providers.get(name).map(|provider| {
            let mut provider = provider.clone();
            provider.provider_name.get_or_insert_with(|| name.clone());
            provider
        })
    }

    /// Builds the provider-backed repairer, if `[repair].provider` is set.
    pub fn field_repairer(&self) -> Result<Option<ProviderFieldRepairer>, PipelineError> {
        let Some(provider) = self.repair_provider() else {
            if let Some(name) = &self.repair.provider {
                return Err(PipelineError::ProviderNotConfigured(format!(
                    "Repair provider '{}' is not defined",
                    name
                )));
            }
            return Ok(None);
        };

        let client = ProviderFactory::create_client(&provider)?;
        let options = self
            .repair
            .options
            .clone()
            .unwrap_or_else(|| provider.default_options.clone());
        Ok(Some(
            ProviderFieldRepairer::new(Arc::from(client), options)
                .with_prompts(self.repair.prompts.clone()),
        ))
    }
}
