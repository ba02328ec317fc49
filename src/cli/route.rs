//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::cli::parse::{Commands, ConfigCommands, OutputFormat};
use crate::cli::presentation::{
    format_config_toml, format_config_validation, format_repair_plan_json,
    format_repair_plan_text, format_validation_json, format_validation_text, Style,
};
use crate::config::{ConfigLoader, DraftsmithConfig};
use crate::content::DraftArtifact;
use crate::error::PipelineError;
use crate::repair::RepairPlan;
use crate::validation::{ValidationResult, Validator};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Exit status when a draft or the configuration fails its check.
pub const EXIT_CHECK_FAILED: i32 = 2;

/// Rendered command output plus the process exit code it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub body: String,
    pub exit_code: i32,
}

impl CommandOutput {
    fn new(body: String, passed: bool) -> Self {
        Self {
            body,
            exit_code: if passed { 0 } else { EXIT_CHECK_FAILED },
        }
    }
}

/// Command name for logs (e.g. "validate", "config.show").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Validate { .. } => "validate",
        Commands::RepairPlan { .. } => "repair_plan",
        Commands::Config { command } => match command {
            ConfigCommands::Show => "config.show",
            ConfigCommands::Validate => "config.validate",
        },
    }
}

/// Runtime context for CLI execution: workspace, config path and the loaded configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config_path: Option<PathBuf>,
    config: DraftsmithConfig,
    style: Style,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, PipelineError> {
        let config = ConfigLoader::load_with_override(&workspace_root, config_path.as_deref())?;
        Ok(Self::with_config(workspace_root, config_path, config))
    }

    pub fn with_config(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        config: DraftsmithConfig,
    ) -> Self {
        let style = Style::detect(config.logging.color);
        Self {
            workspace_root,
            config_path,
            config,
            style,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn config(&self) -> &DraftsmithConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, PipelineError> {
        let started = Instant::now();
        let result = self.execute_inner(command);
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            exit_code = result.as_ref().map(|out| out.exit_code).unwrap_or(1),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<CommandOutput, PipelineError> {
        match command {
            Commands::Validate { draft, format } => {
                let result = self.validate_file(draft)?;
                let body = match format {
                    OutputFormat::Json => format_validation_json(&result)?,
                    OutputFormat::Text => {
                        format_validation_text(&draft.display().to_string(), &result, self.style)
                    }
                };
                Ok(CommandOutput::new(body, result.valid))
            }
            Commands::RepairPlan { draft, format } => {
                let result = self.validate_file(draft)?;
                let plan = RepairPlan::from_validation(&result);
                let body = match format {
                    OutputFormat::Json => format_repair_plan_json(&plan, &result)?,
                    OutputFormat::Text => format_repair_plan_text(&plan, &result, self.style),
                };
                Ok(CommandOutput::new(body, result.valid))
            }
            Commands::Config { command } => match command {
                ConfigCommands::Show => {
                    let mut body = format_config_toml(&self.config)?;
                    if let Some(path) = &self.config_path {
                        body.insert_str(0, &format!("# loaded from {}\n", path.display()));
                    }
                    Ok(CommandOutput::new(body, true))
                }
                ConfigCommands::Validate => {
                    let checked = self.config.validate();
                    Ok(CommandOutput::new(
                        format_config_validation(&checked, self.style),
                        checked.is_ok(),
                    ))
                }
            },
        }
    }

    fn validate_file(&self, path: &Path) -> Result<ValidationResult, PipelineError> {
        let draft = self.load_draft(path)?;
        self.config
            .validation
            .validate()
            .map_err(PipelineError::ConfigError)?;
        let validator = Validator::new(self.config.validation.clone());
        Ok(validator.validate(&draft))
    }

    /// Relative paths resolve against the workspace root.
    fn load_draft(&self, path: &Path) -> Result<DraftArtifact, PipelineError> {
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        };
        debug!(path = %resolved.display(), "Reading draft");
        let raw = std::fs::read_to_string(&resolved)?;
        serde_json::from_str(&raw).map_err(|e| {
            PipelineError::InvalidDraft(format!("{}: {}", resolved.display(), e))
        })
    }
}
