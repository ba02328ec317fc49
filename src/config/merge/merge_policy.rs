//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources replace scalar values and merge tables key by key, so a workspace file
//! can override one threshold without restating the rest.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("pipeline.auto_repair_attempts", 2_i64)?
        .set_default("pipeline.call_timeout_secs", 120_i64)?
        .set_default("pipeline.batch_concurrency", 4_i64)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
