//! Repair planning: which suggestions are actionable and how they group by field.

use crate::validation::{RepairSuggestion, Severity, ValidationResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

static SECTION_INDEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^sections\[(\d+)\]$").expect("static regex"));

/// A suggestion is actionable when it was emitted alongside an error, or when its field
/// carries an error-severity issue.
pub fn is_actionable(suggestion: &RepairSuggestion, result: &ValidationResult) -> bool {
    suggestion.severity == Severity::Error
        || result.errors().any(|issue| issue.field == suggestion.field)
}

/// Section index referenced by a field path such as `sections[3]`.
pub fn section_index(field: &str) -> Option<usize> {
    SECTION_INDEX
        .captures(field)
        .and_then(|captures| captures.get(1))
        .and_then(|index| index.as_str().parse().ok())
}

/// Actionable prompts for one base field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldGroup {
    pub field: String,
    /// Prompts addressed to the field as a whole
    pub prompts: Vec<String>,
    /// Prompts addressed to individual sections, keyed by index
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub section_prompts: BTreeMap<usize, Vec<String>>,
}

impl FieldGroup {
    fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            ..Default::default()
        }
    }

    /// Every prompt in the group, field-wide first.
    pub fn all_prompts(&self) -> Vec<&str> {
        self.prompts
            .iter()
            .chain(self.section_prompts.values().flatten())
            .map(String::as_str)
            .collect()
    }

    pub fn section_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.section_prompts.keys().copied()
    }
}

/// Actionable repairs grouped by base field, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairPlan {
    groups: Vec<FieldGroup>,
}

impl RepairPlan {
    pub fn from_validation(result: &ValidationResult) -> Self {
        let mut plan = Self::default();
        for suggestion in result
            .repair_suggestions
            .iter()
            .filter(|suggestion| is_actionable(suggestion, result))
        {
            let group = plan.group_mut(suggestion.field.base());
            match section_index(suggestion.field.as_str()) {
                Some(index) => {
                    let prompts = group.section_prompts.entry(index).or_default();
                    if !prompts.contains(&suggestion.instruction) {
                        prompts.push(suggestion.instruction.clone());
                    }
                }
                None => {
                    if !group.prompts.contains(&suggestion.instruction) {
                        group.prompts.push(suggestion.instruction.clone());
                    }
                }
            }
        }
        plan
    }

    fn group_mut(&mut self, field: &str) -> &mut FieldGroup {
        let position = match self.groups.iter().position(|group| group.field == field) {
            Some(position) => position,
            None => {
                self.groups.push(FieldGroup::new(field));
                self.groups.len() - 1
            }
        };
        &mut self.groups[position]
    }

    pub fn groups(&self) -> &[FieldGroup] {
        &self.groups
    }

    pub fn group(&self, field: &str) -> Option<&FieldGroup> {
        self.groups.iter().find(|group| group.field == field)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
