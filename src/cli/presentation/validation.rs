//! Validation report and repair plan formatters.

use crate::error::PipelineError;
use crate::repair::RepairPlan;
use crate::validation::{Severity, ValidationResult};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use super::Style;
use serde_json::json;

fn verdict(result: &ValidationResult, style: Style) -> String {
    if result.valid {
        style.bold(&style.green("PASS"))
    } else {
        style.bold(&style.red("FAIL"))
    }
}

fn severity_label(severity: Severity, style: Style) -> String {
    match severity {
        Severity::Error => style.red("error"),
        Severity::Warning => style.yellow("warning"),
        Severity::Info => style.dimmed("info"),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub fn format_validation_text(source: &str, result: &ValidationResult, style: Style) -> String {
    let mut output = format!(
        "{} {}\nScore: {}/100\n",
        verdict(result, style),
        style.bold(source),
        result.score
    );

    let metrics = &result.metrics;
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Words".to_string(), metrics.word_count.to_string()]);
    table.add_row(vec!["Sections".to_string(), metrics.section_count.to_string()]);
    table.add_row(vec![
        "Section words (min/max)".to_string(),
        format!("{}/{}", metrics.min_section_words, metrics.max_section_words),
    ]);
    table.add_row(vec!["FAQs".to_string(), metrics.faq_count.to_string()]);
    table.add_row(vec![
        "Internal links".to_string(),
        metrics.internal_link_count.to_string(),
    ]);
    table.add_row(vec!["CTAs".to_string(), metrics.cta_count.to_string()]);
    table.add_row(vec![
        "Hero sentences".to_string(),
        metrics.hero_sentence_count.to_string(),
    ]);
    table.add_row(vec![
        "Experience evidence".to_string(),
        yes_no(metrics.has_experience_evidence).to_string(),
    ]);
    table.add_row(vec![
        "Safety callouts".to_string(),
        metrics.safety_callout_count.to_string(),
    ]);
    output.push('\n');
    output.push_str(&table.to_string());
    output.push('\n');

    if result.issues.is_empty() {
        output.push_str("\nNo issues found.");
        return output;
    }

    let mut issues = Table::new();
    issues.load_preset(UTF8_BORDERS_ONLY);
    issues.set_header(vec!["Severity", "Field", "Rule", "Message"]);
    // Errors first; order within a severity follows the rule order.
    let mut ordered: Vec<_> = result.issues.iter().collect();
    ordered.sort_by(|a, b| b.severity.cmp(&a.severity));
    for issue in ordered {
        issues.add_row(vec![
            severity_label(issue.severity, style),
            issue.field.to_string(),
            issue.rule.clone(),
            issue.message.clone(),
        ]);
    }
    output.push_str(&format!(
        "\nIssues ({} error(s), {} total):\n",
        result.error_count(),
        result.issues.len()
    ));
    output.push_str(&issues.to_string());
    output
}

pub fn format_validation_json(result: &ValidationResult) -> Result<String, PipelineError> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn format_repair_plan_text(
    plan: &RepairPlan,
    result: &ValidationResult,
    style: Style,
) -> String {
    if plan.is_empty() {
        return if result.valid {
            format!("{} Nothing to repair (score {}/100).", verdict(result, style), result.score)
        } else {
            format!(
                "{} No automatic repair applies; {} error(s) need manual review.",
                verdict(result, style),
                result.error_count()
            )
        };
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Field", "Target", "Instruction"]);
    for group in plan.groups() {
        for prompt in &group.prompts {
            table.add_row(vec![group.field.clone(), "-".to_string(), prompt.clone()]);
        }
        for (index, prompts) in &group.section_prompts {
            for prompt in prompts {
                table.add_row(vec![
                    group.field.clone(),
                    format!("#{}", index),
                    prompt.clone(),
                ]);
            }
        }
    }

    format!(
        "{} Score {}/100, {} field group(s) to repair:\n{}",
        verdict(result, style),
        result.score,
        plan.groups().len(),
        table
    )
}

pub fn format_repair_plan_json(
    plan: &RepairPlan,
    result: &ValidationResult,
) -> Result<String, PipelineError> {
    let out = json!({
        "valid": result.valid,
        "score": result.score,
        "groups": plan.groups(),
    });
    Ok(serde_json::to_string_pretty(&out)?)
}
