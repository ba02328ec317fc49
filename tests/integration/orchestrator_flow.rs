use super::support::{
    brief, orchestrator, passing_draft, thin_draft, topic, CrashingHeroRepairer, DraftBehavior,
    MockDrafts, MockOutlines, MockRepairer,
};
use draftsmith::brief::BriefInputRecord;
use draftsmith::cancel::cancellation_pair;
use draftsmith::content::{DraftStatus, OutlineReport};
use draftsmith::orchestrator::{
    BatchSummary, GenerationOptions, GenerationRequest, Orchestrator, PipelineConfig, RunOutcome,
};
use draftsmith::repair::TerminationReason;
use draftsmith::validation::Validator;
use std::collections::HashSet;
use std::sync::Arc;

const GOOD_HERO: &str = "Descaling takes twenty minutes with diluted white vinegar. \
                         Boil, soak for an hour, then rinse twice before using it again.";

fn mocks(behavior: DraftBehavior) -> (Arc<MockOutlines>, Arc<MockDrafts>, Arc<MockRepairer>) {
    (
        Arc::new(MockOutlines::new()),
        Arc::new(MockDrafts::new(behavior)),
        Arc::new(MockRepairer::default()),
    )
}

#[tokio::test]
async fn test_empty_input_fails_without_collaborator_calls() {
    let (outlines, drafts, repairer) = mocks(DraftBehavior::Return(passing_draft()));
    let orch = orchestrator(outlines.clone(), drafts.clone(), repairer.clone());

    let result = orch
        .generate_from_record(BriefInputRecord::default(), GenerationOptions::default())
        .await;

    assert!(!result.success);
    assert_eq!(result.outcome, RunOutcome::Failed);
    assert_eq!(
        result.errors,
        vec!["Could not resolve or generate brief from input".to_string()]
    );
    assert!(result.draft.is_none());
    assert_eq!(outlines.call_count(), 0);
    assert_eq!(drafts.call_count(), 0);
    assert_eq!(repairer.total_calls(), 0);
}

#[tokio::test]
async fn test_explicit_brief_with_passing_draft() {
    let (outlines, drafts, repairer) = mocks(DraftBehavior::Return(passing_draft()));
    let orch = orchestrator(outlines.clone(), drafts.clone(), repairer);

    let result = orch.generate(GenerationRequest::new(brief())).await;

    assert!(result.success);
    assert_eq!(result.outcome, RunOutcome::Valid);
    assert_eq!(result.score(), Some(100));
    assert_eq!(result.repair_attempts, 0);
    assert!(result.errors.is_empty());
    assert!(result.outline.is_none());
    assert_eq!(outlines.call_count(), 0);
    let inputs = drafts.inputs.lock();
    assert_eq!(inputs[0].primary_keyword, "How to Descale a Kettle");
    assert!(result.run_id.starts_with("run-"));
}

#[tokio::test]
async fn test_topic_input_carries_outline_and_its_report() {
    let outlines = Arc::new(MockOutlines::with_report(OutlineReport {
        valid: false,
        issues: vec!["Outline has only one section".to_string()],
        warnings: vec!["No internal link targets".to_string()],
    }));
    let drafts = Arc::new(MockDrafts::returning(passing_draft()));
    let orch = orchestrator(outlines.clone(), drafts.clone(), Arc::new(MockRepairer::default()));

    let result = orch.generate(GenerationRequest::new(topic())).await;

    assert_eq!(outlines.call_count(), 1);
    assert!(result.outline.is_some());
    assert_eq!(result.outcome, RunOutcome::Valid);
    assert_eq!(
        result.errors,
        vec!["[outline] Outline has only one section".to_string()]
    );
    assert!(result.warnings.contains(&"No internal link targets".to_string()));
    let inputs = drafts.inputs.lock();
    assert_eq!(inputs[0].primary_keyword, "descale kettle");
    assert_eq!(inputs[0].cluster.as_deref(), Some("kitchen"));
    assert_eq!(inputs[0].brief.suggested_title, "How to Descale a Kettle");
}

#[tokio::test]
async fn test_repair_brings_draft_to_valid() {
    let mut draft = passing_draft();
    draft.hero_answer.clear();
    let outlines = Arc::new(MockOutlines::new());
    let drafts = Arc::new(MockDrafts::returning(draft));
    let repairer = Arc::new(MockRepairer {
        hero: Some(GOOD_HERO.to_string()),
        ..Default::default()
    });
    let orch = orchestrator(outlines, drafts, repairer.clone());

    let result = orch.generate(GenerationRequest::new(brief())).await;

    assert!(result.success);
    assert_eq!(result.outcome, RunOutcome::Valid);
    assert_eq!(result.repair_attempts, 1);
    assert_eq!(result.termination, Some(TerminationReason::Success));
    assert_eq!(result.repair_log.len(), 1);
    assert_eq!(repairer.hero_calls.lock().len(), 1);
    assert_eq!(result.draft.unwrap().hero_answer, GOOD_HERO);
}

#[tokio::test]
async fn test_requested_repair_attempts_are_capped() {
    let outlines = Arc::new(MockOutlines::new());
    let drafts = Arc::new(MockDrafts::returning(thin_draft()));
    let repairer = Arc::new(MockRepairer {
        hero: Some(GOOD_HERO.to_string()),
        section_suffix: Some("<p>a few more words</p>".to_string()),
        ..Default::default()
    });
    let orch = orchestrator(outlines, drafts, repairer);

    let options = GenerationOptions {
        auto_repair_attempts: Some(5),
        ..Default::default()
    };
    let result = orch
        .generate(GenerationRequest::new(brief()).with_options(options))
        .await;

    assert!(result.repair_attempts <= 2);
    assert!(!result.success);
    assert_eq!(result.outcome, RunOutcome::NeedsReview);
    assert_eq!(result.draft.as_ref().unwrap().status, DraftStatus::NeedsReview);
    assert!(result
        .errors
        .iter()
        .any(|e| e.starts_with("[wordCount] Word count")));
    assert!(result
        .warnings
        .iter()
        .any(|w| w.contains("manual review required")));
}

#[tokio::test]
async fn test_collaborator_failure_is_reported_not_raised() {
    let (outlines, drafts, repairer) = mocks(DraftBehavior::Fail("backend down".to_string()));
    let orch = orchestrator(outlines, drafts, repairer);

    let result = orch.generate(GenerationRequest::new(brief())).await;

    assert!(!result.success);
    assert_eq!(result.outcome, RunOutcome::Failed);
    assert_eq!(
        result.errors,
        vec!["Generation failed: draft generator failed: backend down".to_string()]
    );
    assert!(result.validation.is_none());
}

#[tokio::test]
async fn test_collaborator_panic_is_captured() {
    let (outlines, drafts, repairer) = mocks(DraftBehavior::Panic("boom".to_string()));
    let orch = orchestrator(outlines, drafts, repairer);

    let result = orch.generate(GenerationRequest::new(brief())).await;

    assert!(!result.success);
    assert_eq!(result.outcome, RunOutcome::Failed);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("panicked: boom"));
}

#[tokio::test(start_paused = true)]
async fn test_hanging_collaborator_hits_deadline() {
    let (outlines, drafts, repairer) = mocks(DraftBehavior::Hang);
    let orch = orchestrator(outlines, drafts, repairer).with_settings(PipelineConfig {
        call_timeout_secs: 1,
        ..Default::default()
    });

    let result = orch.generate(GenerationRequest::new(brief())).await;

    assert_eq!(result.outcome, RunOutcome::Failed);
    assert_eq!(
        result.errors,
        vec!["Generation failed: draft generation exceeded its deadline of 1000 ms".to_string()]
    );
}

#[tokio::test]
async fn test_cancelled_run_never_reaches_draft_generation() {
    let (outlines, drafts, repairer) = mocks(DraftBehavior::Return(passing_draft()));
    let (handle, signal) = cancellation_pair();
    let orch = orchestrator(outlines, drafts.clone(), repairer).with_cancellation(signal);
    handle.cancel();

    let result = orch.generate(GenerationRequest::new(brief())).await;

    assert!(!result.success);
    assert_eq!(result.outcome, RunOutcome::Cancelled);
    assert_eq!(drafts.call_count(), 0);
}

#[tokio::test]
async fn test_skip_validation_returns_unvalidated_draft() {
    let (outlines, drafts, repairer) = mocks(DraftBehavior::Return(thin_draft()));
    let orch = orchestrator(outlines, drafts, repairer.clone());

    let options = GenerationOptions {
        skip_validation: true,
        ..Default::default()
    };
    let result = orch
        .generate(GenerationRequest::new(brief()).with_options(options))
        .await;

    assert!(result.success);
    assert_eq!(result.outcome, RunOutcome::Unvalidated);
    assert!(result.validation.is_none());
    assert_eq!(result.draft, Some(thin_draft()));
    assert_eq!(repairer.total_calls(), 0);
}

#[tokio::test]
async fn test_batch_preserves_request_order() {
    let (outlines, drafts, repairer) = mocks(DraftBehavior::Return(passing_draft()));
    let orch = orchestrator(outlines.clone(), drafts.clone(), repairer).with_settings(PipelineConfig {
        batch_concurrency: 2,
        ..Default::default()
    });

    let skipped = GenerationOptions {
        skip_validation: true,
        ..Default::default()
    };
    let requests = vec![
        GenerationRequest::new(brief()).with_options(skipped.clone()),
        GenerationRequest::new(brief()),
        GenerationRequest::new(topic()).with_options(skipped),
    ];

    let results = orch.generate_batch(requests).await;

    let outcomes: Vec<RunOutcome> = results.iter().map(|r| r.outcome).collect();
    assert_eq!(
        outcomes,
        vec![RunOutcome::Unvalidated, RunOutcome::Valid, RunOutcome::Unvalidated]
    );
    assert!(results[2].outline.is_some());
    let ids: HashSet<&str> = results.iter().map(|r| r.run_id.as_str()).collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(drafts.call_count(), 3);
    assert_eq!(outlines.call_count(), 1);

    let summary = BatchSummary::from_results(&results);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.valid, 1);
    assert_eq!(summary.unvalidated, 2);
}

#[tokio::test]
async fn test_run_ids_are_sequenced_per_orchestrator() {
    let make = || {
        let (outlines, drafts, repairer) = mocks(DraftBehavior::Return(passing_draft()));
        orchestrator(outlines, drafts, repairer)
    };
    let first = make();
    let second = make();

    let a = first.generate(GenerationRequest::new(brief())).await;
    let b = first.generate(GenerationRequest::new(brief())).await;
    let c = second.generate(GenerationRequest::new(brief())).await;

    assert!(a.run_id.ends_with("-0000"), "{}", a.run_id);
    assert!(b.run_id.ends_with("-0001"), "{}", b.run_id);
    // A fresh orchestrator starts its own sequence
    assert!(c.run_id.ends_with("-0000"), "{}", c.run_id);
}

#[tokio::test]
async fn test_repair_panic_does_not_fail_the_run() {
    let mut draft = passing_draft();
    draft.hero_answer.clear();
    let orch = Orchestrator::new(
        Arc::new(MockOutlines::new()),
        Arc::new(MockDrafts::returning(draft)),
        Arc::new(CrashingHeroRepairer),
        Validator::default(),
    );

    let result = orch.generate(GenerationRequest::new(brief())).await;

    assert_eq!(result.outcome, RunOutcome::NeedsReview);
    assert_eq!(result.termination, Some(TerminationReason::NonProductive));
    assert!(result.draft.is_some());
    assert!(!result.errors.iter().any(|e| e.starts_with("Generation failed")));
    assert!(result
        .warnings
        .iter()
        .any(|w| w.starts_with("Repair of heroAnswer failed on attempt 1")));
}
