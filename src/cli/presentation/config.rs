//! Config command presentation.

use crate::config::{DraftsmithConfig, ValidationError};
use crate::error::PipelineError;
use super::Style;

pub fn format_config_toml(config: &DraftsmithConfig) -> Result<String, PipelineError> {
    toml::to_string_pretty(config)
        .map_err(|e| PipelineError::ConfigError(format!("Failed to render configuration: {}", e)))
}

pub fn format_config_validation(
    result: &Result<(), Vec<ValidationError>>,
    style: Style,
) -> String {
    match result {
        Ok(()) => format!("{} Configuration is valid", style.green("✓")),
        Err(errors) => {
            let mut output = format!(
                "{} Configuration has {} problem(s):",
                style.red("✗"),
                errors.len()
            );
            for error in errors {
                output.push_str(&format!("\n  - {}", error));
            }
            output
        }
    }
}
