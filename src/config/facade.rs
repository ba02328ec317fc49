//! Loader facade: assembles the layered sources and deserializes the result.

use super::merge::merge_policy;
use super::sources::{global_file, workspace_file};
use super::DraftsmithConfig;
use config::{ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment override prefix, e.g. `DRAFTSMITH__VALIDATION__MIN_WORD_COUNT=800`.
pub const ENV_PREFIX: &str = "DRAFTSMITH";
pub const ENV_SEPARATOR: &str = "__";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, global file, `config/config.toml`,
    /// `config/{DRAFTSMITH_ENV}.toml`, environment variables.
    pub fn load(workspace_root: &Path) -> Result<DraftsmithConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        );

        let config: DraftsmithConfig = builder.build()?.try_deserialize()?;
        debug!(
            workspace = %workspace_root.display(),
            providers = config.providers.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load a single file on top of the defaults. No other source is consulted.
    pub fn load_from_file(path: &Path) -> Result<DraftsmithConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()
    }

    /// Explicit file when given, otherwise the workspace layering.
    pub fn load_with_override(
        workspace_root: &Path,
        explicit: Option<&Path>,
    ) -> Result<DraftsmithConfig, ConfigError> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => Self::load(workspace_root),
        }
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
