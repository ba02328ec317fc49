//! Field-specific repair strategies.
//!
//! Each strategy reads the current draft, may call the field repairer through the call
//! guard, and records replacements on the shared [`DraftPatch`]. `Ok(true)` means the
//! patch gained a change for the field, `Ok(false)` that the strategy ran but had nothing
//! to change.

use super::plan::FieldGroup;
use crate::cancel::CallGuard;
use crate::content::{Brief, DraftArtifact, DraftPatch, ExperienceEvidence, Faq, Section};
use crate::error::PipelineError;
use crate::generation::FieldRepairer;
use tracing::{debug, warn};

/// FAQ lists are grown to at least this many entries when seeds allow.
const MIN_FAQ_CAP: usize = 5;

/// Characters of a seed question compared against existing questions.
const FAQ_MATCH_PREFIX_CHARS: usize = 20;

const DEFAULT_EXPERIENCE_PROMPT: &str = "Describe first-hand experience with this topic";

/// Shared inputs for one repair iteration.
pub struct StrategyContext<'a> {
    pub draft: &'a DraftArtifact,
    pub brief: &'a Brief,
    pub repairer: &'a dyn FieldRepairer,
    pub guard: &'a CallGuard,
    pub min_faqs: usize,
}

pub async fn repair_hero_answer(
    ctx: &StrategyContext<'_>,
    group: &FieldGroup,
    patch: &mut DraftPatch,
) -> Result<bool, PipelineError> {
    let prompt = group.all_prompts().join("\n");
    let regenerated = ctx
        .guard
        .run(
            "hero answer repair",
            ctx.repairer
                .regenerate_hero_answer(ctx.draft, ctx.brief, &prompt),
        )
        .await?;

    let mut hero = regenerated.trim().to_string();
    if hero.is_empty() {
        debug!("Regenerated hero answer was empty, falling back to brief draft");
        hero = ctx.brief.hero_answer_draft.trim().to_string();
    }
    if hero.is_empty() {
        return Err(PipelineError::repair(
            "heroAnswer",
            "regenerated hero answer was empty and the brief has no hero draft",
        ));
    }
    if hero == ctx.draft.hero_answer {
        return Ok(false);
    }
    patch.set_hero_answer(hero);
    Ok(true)
}

/// Regenerates referenced sections one at a time in index order. Sections that are not
/// referenced are never touched. Stops at the first failure; sections already
/// regenerated stay on the patch.
pub async fn repair_sections(
    ctx: &StrategyContext<'_>,
    group: &FieldGroup,
    patch: &mut DraftPatch,
) -> Result<bool, PipelineError> {
    let mut changed = false;
    for (index, prompts) in &group.section_prompts {
        let Some(current) = ctx.draft.sections.get(*index) else {
            warn!(index, sections = ctx.draft.sections.len(), "Section index out of range; skipping");
            continue;
        };
        let prompt = prompts.join("\n");
        let regenerated = ctx
            .guard
            .run(
                "section repair",
                ctx.repairer
                    .regenerate_section(ctx.draft, *index, ctx.brief, &prompt),
            )
            .await
            .map_err(|err| match err {
                PipelineError::Cancelled(_) | PipelineError::Repair { .. } => err,
                other => PipelineError::repair(format!("sections[{}]", index), other.to_string()),
            })?;

        let heading = if regenerated.heading.trim().is_empty() {
            current.heading.clone()
        } else {
            regenerated.heading
        };
        let section = Section::new(heading, regenerated.level, regenerated.body_html);
        if section.body_html.trim().is_empty() {
            return Err(PipelineError::repair(
                format!("sections[{}]", index),
                "regenerated section body was empty",
            ));
        }
        if &section == current {
            continue;
        }
        patch.set_section(*index, section);
        changed = true;
    }
    Ok(changed)
}

/// Appends brief FAQ seeds not already covered. Never removes or reorders existing FAQs.
pub async fn repair_faqs(
    ctx: &StrategyContext<'_>,
    patch: &mut DraftPatch,
) -> Result<bool, PipelineError> {
    let cap = ctx.min_faqs.max(MIN_FAQ_CAP);
    let mut faqs = ctx.draft.faqs.clone();
    let mut added = 0;

    for seed in &ctx.brief.faq_suggestions {
        if faqs.len() >= cap {
            break;
        }
        if seed.trim().is_empty() || is_covered(seed, &faqs) {
            continue;
        }
        let answer = match ctx
            .guard
            .run(
                "faq answer",
                ctx.repairer.answer_faq(ctx.draft, ctx.brief, seed),
            )
            .await
        {
            Ok(answer) if !answer.trim().is_empty() => answer,
            Ok(_) => {
                warn!(question = %seed, "Empty FAQ answer; skipping seed");
                continue;
            }
            Err(err) if err.is_cancelled() => return Err(err),
            Err(err) => {
                warn!(question = %seed, error = %err, "FAQ answer failed; skipping seed");
                continue;
            }
        };
        faqs.push(Faq {
            question: seed.trim().to_string(),
            answer,
        });
        added += 1;
    }

    if added == 0 {
        return Ok(false);
    }
    patch.set_faqs(faqs);
    Ok(true)
}

fn is_covered(seed: &str, faqs: &[Faq]) -> bool {
    let prefix: String = seed
        .trim()
        .chars()
        .take(FAQ_MATCH_PREFIX_CHARS)
        .collect::<String>()
        .to_lowercase();
    faqs.iter()
        .any(|faq| faq.question.to_lowercase().contains(&prefix))
}

/// Replaces the evidence block with placeholders derived from the brief's prompts.
pub fn repair_experience_evidence(ctx: &StrategyContext<'_>, patch: &mut DraftPatch) -> bool {
    let mut placeholders: Vec<String> = ctx
        .brief
        .experience_prompts
        .iter()
        .map(|prompt| prompt.trim())
        .filter(|prompt| !prompt.is_empty())
        .map(|prompt| format!("[EXPERIENCE: {}]", prompt))
        .collect();
    if placeholders.is_empty() {
        placeholders.push(format!("[EXPERIENCE: {}]", DEFAULT_EXPERIENCE_PROMPT));
    }

    let evidence = ExperienceEvidence {
        summary: None,
        detail: None,
        placeholders,
    };
    if evidence == ctx.draft.experience_evidence {
        return false;
    }
    patch.set_experience_evidence(evidence);
    true
}
