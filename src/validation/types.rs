use super::metrics::ContentMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// Path to a draft field, optionally indexed into an array field (`sections[2]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn indexed(base: &str, index: usize) -> Self {
        Self(format!("{}[{}]", base, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Field name with any trailing index removed.
    pub fn base(&self) -> &str {
        match self.split_index() {
            Some((base, _)) => base,
            None => &self.0,
        }
    }

    pub fn index(&self) -> Option<usize> {
        self.split_index().map(|(_, index)| index)
    }

    fn split_index(&self) -> Option<(&str, usize)> {
        let inner = self.0.strip_suffix(']')?;
        let open = inner.rfind('[')?;
        let index = inner[open + 1..].parse().ok()?;
        Some((&inner[..open], index))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// A single detected defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub field: FieldPath,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Id of the rule that emitted the issue
    #[serde(default)]
    pub rule: String,
}

impl Issue {
    pub fn new(field: impl Into<FieldPath>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            severity,
            message: message.into(),
            current: None,
            expected: None,
            rule: String::new(),
        }
    }

    pub fn with_values(mut self, current: impl ToString, expected: impl ToString) -> Self {
        self.current = Some(current.to_string());
        self.expected = Some(expected.to_string());
        self
    }

    /// `[field] message`, the form used in run reports.
    pub fn describe(&self) -> String {
        format!("[{}] {}", self.field, self.message)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepairAction {
    Extend,
    Add,
    Fix,
    Remove,
}

impl fmt::Display for RepairAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RepairAction::Extend => "extend",
            RepairAction::Add => "add",
            RepairAction::Fix => "fix",
            RepairAction::Remove => "remove",
        };
        f.write_str(label)
    }
}

/// Advisory instruction for a regeneration strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairSuggestion {
    pub field: FieldPath,
    pub action: RepairAction,
    pub instruction: String,
    /// Severity of the issue this suggestion was emitted with
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub score: u32,
    pub issues: Vec<Issue>,
    pub metrics: ContentMetrics,
    pub repair_suggestions: Vec<RepairSuggestion>,
}

impl ValidationResult {
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues_with(Severity::Error)
    }

    pub fn issues_with(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |issue| issue.severity == severity)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}
