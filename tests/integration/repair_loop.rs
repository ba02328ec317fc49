use super::support::{brief, passing_draft, words, CrashingHeroRepairer, MockRepairer};
use draftsmith::cancel::{cancellation_pair, CallGuard};
use draftsmith::content::{DraftArtifact, DraftStatus};
use draftsmith::repair::{
    FieldRepairOutcome, RepairDispatcher, RepairIteration, TerminationReason,
};
use draftsmith::validation::{Severity, Validator};

const GOOD_HERO: &str = "Descaling takes twenty minutes with diluted white vinegar. \
                         Boil, soak for an hour, then rinse twice before using it again.";

/// Five sections that are individually long enough but add up to far too few words.
fn short_article() -> DraftArtifact {
    let mut draft = passing_draft();
    for section in draft.sections.iter_mut().take(4) {
        section.body_html = words(130);
    }
    draft.sections[4].body_html =
        format!("{}<p>Sign up for our monthly maintenance newsletter.</p>", words(125));
    draft
}

#[tokio::test]
async fn test_missing_hero_is_repaired_in_one_iteration() {
    let mut draft = passing_draft();
    draft.hero_answer.clear();
    let original = draft.clone();

    let validator = Validator::default();
    let repairer = MockRepairer {
        hero: Some(GOOD_HERO.to_string()),
        ..Default::default()
    };
    let guard = CallGuard::unbounded();
    let validation = validator.validate(&draft);
    assert!(!validation.valid);

    let outcome = RepairDispatcher::new(&validator, &repairer, &guard)
        .run(draft, &brief(), validation, 2)
        .await;

    assert!(outcome.success());
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.termination, TerminationReason::Success);
    assert_eq!(outcome.draft.hero_answer, GOOD_HERO);
    assert_eq!(outcome.iterations[0].fields[0].outcome, FieldRepairOutcome::Changed);
    assert_eq!(outcome.iterations[0].touched, vec!["heroAnswer".to_string()]);

    // Nothing else moved
    assert_eq!(outcome.draft.sections, original.sections);
    assert_eq!(outcome.draft.faqs, original.faqs);
    assert_eq!(outcome.draft.internal_links, original.internal_links);
    assert_eq!(outcome.draft.experience_evidence, original.experience_evidence);
}

#[tokio::test]
async fn test_requested_attempts_are_capped_at_two() {
    let draft = short_article();
    let validator = Validator::default();
    let repairer = MockRepairer {
        section_suffix: Some("<p>more detail here</p>".to_string()),
        ..Default::default()
    };
    let guard = CallGuard::unbounded();
    let validation = validator.validate(&draft);
    assert!(validation.errors().any(|issue| issue.field.as_str() == "wordCount"));

    let outcome = RepairDispatcher::new(&validator, &repairer, &guard)
        .run(draft, &brief(), validation, 5)
        .await;

    assert_eq!(outcome.attempts, 2);
    assert_eq!(outcome.iterations.len(), 2);
    assert_eq!(outcome.termination, TerminationReason::Exhausted);
    assert!(!outcome.success());
    assert_eq!(outcome.draft.status, DraftStatus::NeedsReview);
    assert!(outcome
        .warnings
        .iter()
        .any(|w| w.contains("manual review required")));

    // Three shortest sections per iteration, in index order on the first pass
    let calls = repairer.section_calls.lock().clone();
    assert_eq!(calls.len(), 6);
    assert_eq!(&calls[..3], &[0, 1, 2]);
    assert!(outcome.iterations[1].score_after <= 100);
}

#[tokio::test]
async fn test_failed_strategy_ends_loop_as_non_productive() {
    let mut draft = passing_draft();
    draft.hero_answer.clear();
    let validator = Validator::default();
    let repairer = MockRepairer::default();
    let guard = CallGuard::unbounded();
    let validation = validator.validate(&draft);

    let outcome = RepairDispatcher::new(&validator, &repairer, &guard)
        .run(draft, &brief(), validation, 2)
        .await;

    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.termination, TerminationReason::NonProductive);
    assert!(matches!(
        outcome.iterations[0].fields[0].outcome,
        FieldRepairOutcome::Failed(_)
    ));
    assert!(outcome
        .warnings
        .iter()
        .any(|w| w.starts_with("Repair of heroAnswer failed on attempt 1")));
    assert!(outcome
        .warnings
        .iter()
        .any(|w| w == "Repair attempt 1 produced no changes"));
    assert_eq!(*repairer.hero_calls.lock(), vec![
        "Write a direct answer to the question implied by the title in 2 to 4 sentences.".to_string()
    ]);
}

#[tokio::test]
async fn test_valid_draft_is_never_repaired() {
    let draft = passing_draft();
    let validator = Validator::default();
    let repairer = MockRepairer::default();
    let guard = CallGuard::unbounded();
    let validation = validator.validate(&draft);

    let outcome = RepairDispatcher::new(&validator, &repairer, &guard)
        .run(draft.clone(), &brief(), validation, 2)
        .await;

    assert_eq!(outcome.attempts, 0);
    assert_eq!(outcome.termination, TerminationReason::Success);
    assert_eq!(outcome.draft, draft);
    assert_eq!(repairer.total_calls(), 0);
}

#[tokio::test]
async fn test_cancelled_guard_stops_before_any_call() {
    let mut draft = passing_draft();
    draft.hero_answer.clear();
    let validator = Validator::default();
    let repairer = MockRepairer {
        hero: Some(GOOD_HERO.to_string()),
        ..Default::default()
    };
    let (handle, signal) = cancellation_pair();
    handle.cancel();
    let guard = CallGuard::new(None, signal);
    let validation = validator.validate(&draft);

    let outcome = RepairDispatcher::new(&validator, &repairer, &guard)
        .run(draft, &brief(), validation, 2)
        .await;

    assert_eq!(outcome.termination, TerminationReason::Cancelled);
    assert_eq!(repairer.total_calls(), 0);
    assert!(outcome
        .warnings
        .iter()
        .any(|w| w == "Repair cancelled during attempt 1"));
}

const SAFETY_CALLOUT: &str =
    "<div class=\"callout callout--warning\"><p>Warning: wear gloves and keep the room ventilated.</p></div>";

fn field_outcome<'a>(iteration: &'a RepairIteration, field: &str) -> &'a FieldRepairOutcome {
    &iteration
        .fields
        .iter()
        .find(|record| record.field == field)
        .unwrap_or_else(|| panic!("no record for {}", field))
        .outcome
}

#[tokio::test]
async fn test_hazardous_draft_gets_callout_in_targeted_section() {
    let mut draft = passing_draft();
    draft.title = "Descaling a Kettle with Citric Acid".to_string();
    let original = draft.clone();

    let validator = Validator::default();
    let validation = validator.validate(&draft);
    assert!(validation
        .errors()
        .any(|issue| issue.rule == "safety_callouts" && issue.field.as_str() == "sections"));

    let repairer = MockRepairer {
        section_suffix: Some(SAFETY_CALLOUT.to_string()),
        ..Default::default()
    };
    let guard = CallGuard::unbounded();
    let outcome = RepairDispatcher::new(&validator, &repairer, &guard)
        .run(draft, &brief(), validation, 2)
        .await;

    assert!(outcome.success());
    assert_eq!(outcome.attempts, 1);
    assert_eq!(*repairer.section_calls.lock(), vec![0]);
    assert!(outcome.draft.sections[0].body_html.ends_with(SAFETY_CALLOUT));
    assert_eq!(outcome.draft.sections[1..], original.sections[1..]);
    assert!(!outcome
        .validation
        .issues
        .iter()
        .any(|issue| issue.rule == "safety_callouts"));
    assert_eq!(outcome.validation.metrics.safety_callout_count, 1);
}

#[tokio::test]
async fn test_failed_strategy_does_not_stop_its_siblings() {
    let mut draft = short_article();
    draft.hero_answer.clear();
    let validator = Validator::default();
    // No section content available: section repair fails, hero repair succeeds
    let repairer = MockRepairer {
        hero: Some(GOOD_HERO.to_string()),
        ..Default::default()
    };
    let guard = CallGuard::unbounded();
    let validation = validator.validate(&draft);

    let outcome = RepairDispatcher::new(&validator, &repairer, &guard)
        .run(draft, &brief(), validation, 2)
        .await;

    let first = &outcome.iterations[0];
    assert_eq!(first.fields[0].field, "sections");
    assert!(matches!(field_outcome(first, "sections"), FieldRepairOutcome::Failed(_)));
    assert_eq!(field_outcome(first, "heroAnswer"), &FieldRepairOutcome::Changed);
    assert_eq!(first.touched, vec!["heroAnswer".to_string()]);
    assert_eq!(outcome.draft.hero_answer, GOOD_HERO);
    assert!(outcome
        .warnings
        .iter()
        .any(|w| w.starts_with("Repair of sections failed on attempt 1")));
    // Word count is still short, so the second pass has nothing productive to do
    assert_eq!(outcome.termination, TerminationReason::NonProductive);
}

#[tokio::test]
async fn test_panicking_strategy_is_reported_as_field_failure() {
    let mut draft = short_article();
    draft.hero_answer.clear();
    let validator = Validator::default();
    let guard = CallGuard::unbounded();
    let validation = validator.validate(&draft);

    let outcome = RepairDispatcher::new(&validator, &CrashingHeroRepairer, &guard)
        .run(draft, &brief(), validation, 1)
        .await;

    let first = &outcome.iterations[0];
    assert_eq!(field_outcome(first, "sections"), &FieldRepairOutcome::Changed);
    match field_outcome(first, "heroAnswer") {
        FieldRepairOutcome::Failed(message) => {
            assert!(message.contains("panicked: hero model crashed"), "{}", message)
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(outcome.warnings.iter().any(|w| w
        == "Repair of heroAnswer failed on attempt 1: field repairer failed: panicked: hero model crashed"));
    assert!(outcome.draft.hero_answer.is_empty());
    assert!(outcome
        .validation
        .issues
        .iter()
        .any(|issue| issue.field.as_str() == "heroAnswer" && issue.severity == Severity::Error));
    assert_eq!(outcome.draft.status, DraftStatus::NeedsReview);
}
