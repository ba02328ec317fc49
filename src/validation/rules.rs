//! The rule battery.
//!
//! Every rule is independent: it reads the draft, the metrics and the config, and appends
//! findings. Rules never see each other's output and all of them run on every validation.

use super::classify::TextClassifier;
use super::config::ValidationConfig;
use super::metrics::ContentMetrics;
use super::types::{FieldPath, Issue, RepairAction, RepairSuggestion, Severity};
use crate::content::DraftArtifact;
use crate::text;

/// Sections targeted when the article as a whole is too short.
const MAX_SECTIONS_TO_EXTEND: usize = 3;

pub const RULE_IDS: &[&str] = &[
    "word_count",
    "sections_present",
    "section_length",
    "hero_presence",
    "hero_length",
    "faq_count",
    "faq_answer_quality",
    "internal_links",
    "cta_presence",
    "safety_callouts",
    "experience_evidence",
    "placeholders",
];

pub struct RuleContext<'a> {
    pub draft: &'a DraftArtifact,
    pub metrics: &'a ContentMetrics,
    pub config: &'a ValidationConfig,
    pub classifier: &'a dyn TextClassifier,
}

/// Issues and suggestions collected from one rule.
#[derive(Debug, Default)]
pub struct Findings {
    pub issues: Vec<Issue>,
    pub suggestions: Vec<RepairSuggestion>,
}

impl Findings {
    pub fn issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn suggest(
        &mut self,
        field: FieldPath,
        action: RepairAction,
        instruction: impl Into<String>,
        severity: Severity,
    ) {
        self.suggestions.push(RepairSuggestion {
            field,
            action,
            instruction: instruction.into(),
            severity,
        });
    }

    /// Stamp the rule id and apply a configured severity override.
    pub fn finish(mut self, rule: &str, severity_override: Option<Severity>) -> Self {
        for issue in &mut self.issues {
            issue.rule = rule.to_string();
            if let Some(severity) = severity_override {
                issue.severity = severity;
            }
        }
        if let Some(severity) = severity_override {
            for suggestion in &mut self.suggestions {
                suggestion.severity = severity;
            }
        }
        self
    }
}

pub trait ContentRule: Send + Sync {
    fn id(&self) -> &'static str;
    fn check(&self, ctx: &RuleContext<'_>, findings: &mut Findings);
}

pub fn default_rules() -> Vec<Box<dyn ContentRule>> {
    vec![
        Box::new(WordCountRule),
        Box::new(SectionsPresentRule),
        Box::new(SectionLengthRule),
        Box::new(HeroPresenceRule),
        Box::new(HeroLengthRule),
        Box::new(FaqCountRule),
        Box::new(FaqAnswerQualityRule),
        Box::new(InternalLinksRule),
        Box::new(CtaPresenceRule),
        Box::new(SafetyCalloutRule),
        Box::new(ExperienceEvidenceRule),
        Box::new(PlaceholderRule),
    ]
}

pub struct WordCountRule;

impl ContentRule for WordCountRule {
    fn id(&self) -> &'static str {
        "word_count"
    }

    fn check(&self, ctx: &RuleContext<'_>, findings: &mut Findings) {
        let minimum = ctx.config.min_word_count as usize;
        let actual = ctx.metrics.word_count;
        if actual >= minimum {
            return;
        }
        findings.issue(
            Issue::new(
                "wordCount",
                Severity::Error,
                format!("Word count {} is below the minimum of {}", actual, minimum),
            )
            .with_values(actual, format!(">= {}", minimum)),
        );

        let deficit = minimum - actual;
        let mut shortest: Vec<(usize, usize)> = ctx
            .metrics
            .section_word_counts
            .iter()
            .copied()
            .enumerate()
            .collect();
        shortest.sort_by_key(|(index, words)| (*words, *index));
        for (index, _) in shortest.into_iter().take(MAX_SECTIONS_TO_EXTEND) {
            findings.suggest(
                FieldPath::indexed("sections", index),
                RepairAction::Extend,
                format!(
                    "Expand this section with concrete, specific detail; the article needs about {} more words overall.",
                    deficit
                ),
                Severity::Error,
            );
        }
    }
}

pub struct SectionsPresentRule;

impl ContentRule for SectionsPresentRule {
    fn id(&self) -> &'static str {
        "sections_present"
    }

    fn check(&self, ctx: &RuleContext<'_>, findings: &mut Findings) {
        if ctx.metrics.section_count == 0 {
            findings.issue(Issue::new(
                "sections",
                Severity::Error,
                "Draft has no sections",
            ));
        }
    }
}

pub struct SectionLengthRule;

impl ContentRule for SectionLengthRule {
    fn id(&self) -> &'static str {
        "section_length"
    }

    fn check(&self, ctx: &RuleContext<'_>, findings: &mut Findings) {
        let minimum = ctx.config.min_section_words as usize;
        for (index, words) in ctx.metrics.section_word_counts.iter().enumerate() {
            if *words >= minimum {
                continue;
            }
            let heading = ctx
                .draft
                .sections
                .get(index)
                .map(|section| section.heading.as_str())
                .unwrap_or_default();
            let field = FieldPath::indexed("sections", index);
            findings.issue(
                Issue::new(
                    field.clone(),
                    Severity::Warning,
                    format!(
                        "Section '{}' has {} words; minimum is {}",
                        heading, words, minimum
                    ),
                )
                .with_values(words, format!(">= {}", minimum)),
            );
            findings.suggest(
                field,
                RepairAction::Extend,
                format!(
                    "Extend the '{}' section to at least {} words without repeating other sections.",
                    heading, minimum
                ),
                Severity::Warning,
            );
        }
    }
}

pub struct HeroPresenceRule;

impl ContentRule for HeroPresenceRule {
    fn id(&self) -> &'static str {
        "hero_presence"
    }

    fn check(&self, ctx: &RuleContext<'_>, findings: &mut Findings) {
        let length = ctx.draft.hero_answer.trim().chars().count();
        if length >= ctx.config.min_hero_chars {
            return;
        }
        let message = if length == 0 {
            "Hero answer is missing".to_string()
        } else {
            format!(
                "Hero answer is too short ({} characters; minimum {})",
                length, ctx.config.min_hero_chars
            )
        };
        findings.issue(
            Issue::new("heroAnswer", Severity::Error, message)
                .with_values(length, format!(">= {} characters", ctx.config.min_hero_chars)),
        );
        findings.suggest(
            FieldPath::new("heroAnswer"),
            RepairAction::Add,
            format!(
                "Write a direct answer to the question implied by the title in {} to {} sentences.",
                ctx.config.hero_min_sentences, ctx.config.hero_max_sentences
            ),
            Severity::Error,
        );
    }
}

pub struct HeroLengthRule;

impl ContentRule for HeroLengthRule {
    fn id(&self) -> &'static str {
        "hero_length"
    }

    fn check(&self, ctx: &RuleContext<'_>, findings: &mut Findings) {
        if ctx.draft.hero_answer.trim().is_empty() {
            return;
        }
        let sentences = ctx.metrics.hero_sentence_count;
        let (min, max) = (ctx.config.hero_min_sentences, ctx.config.hero_max_sentences);
        let expected = format!("{}-{} sentences", min, max);

        if sentences < min {
            findings.issue(
                Issue::new(
                    "heroAnswer",
                    Severity::Warning,
                    format!("Hero answer has {} sentence(s); expected at least {}", sentences, min),
                )
                .with_values(sentences, &expected),
            );
            findings.suggest(
                FieldPath::new("heroAnswer"),
                RepairAction::Extend,
                format!("Extend the hero answer to {} complete sentences.", expected),
                Severity::Warning,
            );
        } else if sentences > max {
            findings.issue(
                Issue::new(
                    "heroAnswer",
                    Severity::Warning,
                    format!("Hero answer has {} sentences; expected at most {}", sentences, max),
                )
                .with_values(sentences, &expected),
            );
            findings.suggest(
                FieldPath::new("heroAnswer"),
                RepairAction::Fix,
                format!("Tighten the hero answer to at most {} sentences.", max),
                Severity::Warning,
            );
        }
    }
}

pub struct FaqCountRule;

impl ContentRule for FaqCountRule {
    fn id(&self) -> &'static str {
        "faq_count"
    }

    fn check(&self, ctx: &RuleContext<'_>, findings: &mut Findings) {
        let (actual, minimum) = (ctx.metrics.faq_count, ctx.config.min_faqs);
        if actual >= minimum {
            return;
        }
        findings.issue(
            Issue::new(
                "faqs",
                Severity::Warning,
                format!("Only {} FAQ(s); at least {} expected", actual, minimum),
            )
            .with_values(actual, format!(">= {}", minimum)),
        );
        findings.suggest(
            FieldPath::new("faqs"),
            RepairAction::Add,
            format!("Add FAQs until there are at least {}.", minimum),
            Severity::Warning,
        );
    }
}

pub struct FaqAnswerQualityRule;

impl ContentRule for FaqAnswerQualityRule {
    fn id(&self) -> &'static str {
        "faq_answer_quality"
    }

    fn check(&self, ctx: &RuleContext<'_>, findings: &mut Findings) {
        for (index, faq) in ctx.draft.faqs.iter().enumerate() {
            let words = text::count_words(&text::strip_html(&faq.answer));
            if words < ctx.config.min_faq_answer_words {
                findings.issue(
                    Issue::new(
                        FieldPath::indexed("faqs", index),
                        Severity::Info,
                        format!("Answer to '{}' is only {} words", faq.question, words),
                    )
                    .with_values(words, format!(">= {}", ctx.config.min_faq_answer_words)),
                );
            }
        }
    }
}

pub struct InternalLinksRule;

impl ContentRule for InternalLinksRule {
    fn id(&self) -> &'static str {
        "internal_links"
    }

    fn check(&self, ctx: &RuleContext<'_>, findings: &mut Findings) {
        let (actual, minimum) = (ctx.metrics.internal_link_count, ctx.config.min_internal_links);
        if actual >= minimum {
            return;
        }
        findings.issue(
            Issue::new(
                "internalLinks",
                Severity::Warning,
                format!("Only {} internal link(s); at least {} expected", actual, minimum),
            )
            .with_values(actual, format!(">= {}", minimum)),
        );
        findings.suggest(
            FieldPath::new("internalLinks"),
            RepairAction::Add,
            format!("Link to at least {} related articles.", minimum),
            Severity::Warning,
        );
    }
}

pub struct CtaPresenceRule;

impl ContentRule for CtaPresenceRule {
    fn id(&self) -> &'static str {
        "cta_presence"
    }

    fn check(&self, ctx: &RuleContext<'_>, findings: &mut Findings) {
        if !ctx.config.require_end_cta || ctx.metrics.cta_count > 0 {
            return;
        }
        findings.issue(
            Issue::new("sections", Severity::Warning, "No call to action found")
                .with_values(0, ">= 1"),
        );
        if let Some(last) = ctx.metrics.section_count.checked_sub(1) {
            findings.suggest(
                FieldPath::indexed("sections", last),
                RepairAction::Add,
                "Close the section with a clear call to action for the reader.",
                Severity::Warning,
            );
        }
    }
}

pub struct SafetyCalloutRule;

impl SafetyCalloutRule {
    fn is_hazardous(ctx: &RuleContext<'_>) -> bool {
        let classifier = ctx.classifier;
        classifier.classify(&ctx.draft.title).hazardous
            || classifier.classify(&ctx.draft.primary_keyword).hazardous
            || ctx
                .draft
                .sections
                .iter()
                .any(|section| classifier.classify(&text::strip_html(&section.body_html)).hazardous)
    }
}

impl ContentRule for SafetyCalloutRule {
    fn id(&self) -> &'static str {
        "safety_callouts"
    }

    fn check(&self, ctx: &RuleContext<'_>, findings: &mut Findings) {
        if ctx.metrics.safety_callout_count > 0 || !Self::is_hazardous(ctx) {
            return;
        }
        findings.issue(
            Issue::new(
                "sections",
                Severity::Error,
                "Topic involves hazardous materials but the draft has no safety callouts",
            )
            .with_values(0, ">= 1 safety callout"),
        );

        // Prefer the first section that actually discusses the hazard.
        let target = ctx
            .draft
            .sections
            .iter()
            .position(|section| {
                ctx.classifier
                    .classify(&text::strip_html(&section.body_html))
                    .hazardous
            })
            .or_else(|| (!ctx.draft.sections.is_empty()).then_some(0));
        if let Some(index) = target {
            findings.suggest(
                FieldPath::indexed("sections", index),
                RepairAction::Add,
                "Add a safety callout (<div class=\"callout callout--warning\">) covering protective equipment, ventilation and what to do after exposure.",
                Severity::Error,
            );
        }
    }
}

pub struct ExperienceEvidenceRule;

impl ContentRule for ExperienceEvidenceRule {
    fn id(&self) -> &'static str {
        "experience_evidence"
    }

    fn check(&self, ctx: &RuleContext<'_>, findings: &mut Findings) {
        if ctx.metrics.has_experience_evidence {
            return;
        }
        findings.issue(Issue::new(
            "experienceEvidence",
            Severity::Warning,
            "No first-hand experience evidence",
        ));
        findings.suggest(
            FieldPath::new("experienceEvidence"),
            RepairAction::Add,
            "Describe first-hand experience with the topic: what was tried, observed and concluded.",
            Severity::Warning,
        );
    }
}

pub struct PlaceholderRule;

impl ContentRule for PlaceholderRule {
    fn id(&self) -> &'static str {
        "placeholders"
    }

    fn check(&self, ctx: &RuleContext<'_>, findings: &mut Findings) {
        for (index, section) in ctx.draft.sections.iter().enumerate() {
            if ctx.classifier.classify(&section.body_html).placeholder {
                findings.issue(Issue::new(
                    FieldPath::indexed("sections", index),
                    Severity::Warning,
                    format!("Section '{}' contains unresolved placeholder text", section.heading),
                ));
            }
        }
    }
}
