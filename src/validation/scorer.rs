//! Issue list plus metrics to a 0-100 score.

use super::config::ValidationConfig;
use super::metrics::ContentMetrics;
use super::types::{Issue, Severity};

/// Minimum score for a valid draft.
pub const PASSING_SCORE: u32 = 70;

const ERROR_PENALTY: i64 = 15;
const WARNING_PENALTY: i64 = 5;
const INFO_PENALTY: i64 = 1;

const WORD_COUNT_BONUS: i64 = 5;
const FAQ_BONUS: i64 = 3;
const LINK_BONUS: i64 = 3;
const EVIDENCE_BONUS: i64 = 5;

pub fn score(issues: &[Issue], metrics: &ContentMetrics, config: &ValidationConfig) -> u32 {
    let penalty: i64 = issues
        .iter()
        .map(|issue| match issue.severity {
            Severity::Error => ERROR_PENALTY,
            Severity::Warning => WARNING_PENALTY,
            Severity::Info => INFO_PENALTY,
        })
        .sum();

    let mut bonus = 0;
    // 1.2x the minimum, kept in integer arithmetic
    if metrics.word_count as u64 * 5 >= config.min_word_count as u64 * 6 {
        bonus += WORD_COUNT_BONUS;
    }
    if metrics.faq_count >= config.min_faqs + 2 {
        bonus += FAQ_BONUS;
    }
    if metrics.internal_link_count >= config.min_internal_links + 2 {
        bonus += LINK_BONUS;
    }
    if metrics.has_experience_evidence {
        bonus += EVIDENCE_BONUS;
    }

    (100 - penalty + bonus).clamp(0, 100) as u32
}

pub fn is_valid(score: u32, issues: &[Issue]) -> bool {
    score >= PASSING_SCORE && !issues.iter().any(|issue| issue.severity == Severity::Error)
}
