//! Measured facts about a draft. Always recomputed from the draft itself.

use super::classify::TextClassifier;
use crate::content::DraftArtifact;
use crate::text;
use serde::{Deserialize, Serialize};

/// Summary text shorter than this does not count as experience evidence.
const MIN_EVIDENCE_SUMMARY_CHARS: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetrics {
    pub word_count: usize,
    pub section_count: usize,
    pub section_word_counts: Vec<usize>,
    pub min_section_words: usize,
    pub max_section_words: usize,
    pub faq_count: usize,
    pub internal_link_count: usize,
    pub cta_count: usize,
    pub hero_sentence_count: usize,
    pub has_experience_evidence: bool,
    pub placeholder_count: usize,
    pub callout_count: usize,
    pub safety_callout_count: usize,
}

pub fn extract_metrics(draft: &DraftArtifact, classifier: &dyn TextClassifier) -> ContentMetrics {
    let section_word_counts: Vec<usize> = draft
        .sections
        .iter()
        .map(|section| text::count_words(&text::strip_html(&section.body_html)))
        .collect();

    let computed_words =
        section_word_counts.iter().sum::<usize>() + text::count_words(&draft.hero_answer);
    let word_count = draft
        .word_count
        .filter(|count| *count > 0)
        .map(|count| count as usize)
        .unwrap_or(computed_words);

    let mut cta_count = 0;
    let mut callout_count = 0;
    let mut safety_callout_count = 0;
    for section in &draft.sections {
        let tags = classifier.classify(&section.body_html);
        if tags.call_to_action {
            cta_count += 1;
        }
        if tags.callout {
            callout_count += 1;
            if tags.safety_signal {
                safety_callout_count += 1;
            }
        }
    }

    let has_experience_evidence = draft
        .experience_evidence
        .summary
        .as_deref()
        .is_some_and(|summary| summary.chars().count() > MIN_EVIDENCE_SUMMARY_CHARS);

    ContentMetrics {
        word_count,
        section_count: draft.sections.len(),
        min_section_words: section_word_counts.iter().copied().min().unwrap_or(0),
        max_section_words: section_word_counts.iter().copied().max().unwrap_or(0),
        section_word_counts,
        faq_count: draft.faqs.len(),
        internal_link_count: draft.internal_links.len(),
        cta_count,
        hero_sentence_count: text::count_sentences(&draft.hero_answer),
        has_experience_evidence,
        placeholder_count: draft.experience_evidence.placeholders.len(),
        callout_count,
        safety_callout_count,
    }
}
