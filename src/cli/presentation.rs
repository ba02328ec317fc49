//! CLI presentation: text and json formatters per command family.

mod config;
mod validation;

use owo_colors::OwoColorize;
use std::io::IsTerminal;

pub use config::{format_config_toml, format_config_validation};
pub use validation::{
    format_repair_plan_json, format_repair_plan_text, format_validation_json,
    format_validation_text,
};

/// Whether formatters may emit ANSI colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    color: bool,
}

impl Style {
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn colored() -> Self {
        Self { color: true }
    }

    /// Colour only when allowed by configuration, stdout is a terminal and `NO_COLOR`
    /// is unset.
    pub fn detect(allow: bool) -> Self {
        Self {
            color: allow
                && std::env::var_os("NO_COLOR").is_none()
                && std::io::stdout().is_terminal(),
        }
    }

    pub fn is_colored(&self) -> bool {
        self.color
    }

    pub(crate) fn bold(&self, text: &str) -> String {
        self.paint(text, |t| t.bold().to_string())
    }

    pub(crate) fn green(&self, text: &str) -> String {
        self.paint(text, |t| t.green().to_string())
    }

    pub(crate) fn red(&self, text: &str) -> String {
        self.paint(text, |t| t.red().to_string())
    }

    pub(crate) fn yellow(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow().to_string())
    }

    pub(crate) fn dimmed(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed().to_string())
    }

    fn paint(&self, text: &str, colorize: impl Fn(&str) -> String) -> String {
        if self.color {
            colorize(text)
        } else {
            text.to_string()
        }
    }
}
