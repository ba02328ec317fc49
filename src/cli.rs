//! CLI domain: parse, route and presentation only.
//! No domain orchestration; single route table dispatches to the validator and config.

mod parse;
mod presentation;
mod route;

pub use parse::{Cli, Commands, ConfigCommands, OutputFormat};
pub use presentation::{
    format_config_toml, format_config_validation, format_repair_plan_json,
    format_repair_plan_text, format_validation_json, format_validation_text, Style,
};
pub use route::{command_name, CommandOutput, RunContext, EXIT_CHECK_FAILED};
