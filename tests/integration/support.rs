//! Shared fixtures: drafts and hand-written collaborator mocks.

use async_trait::async_trait;
use draftsmith::content::{
    Brief, DraftArtifact, ExperienceEvidence, Faq, HeadingLevel, InternalLink, Outline,
    OutlineFaq, OutlineOptions, OutlineReport, OutlineSection, Section, TopicDescriptor,
    TopicIntent,
};
use draftsmith::error::PipelineError;
use draftsmith::generation::{DraftGenerationInput, DraftGenerator, FieldRepairer, OutlineGenerator};
use draftsmith::orchestrator::Orchestrator;
use draftsmith::validation::Validator;
use parking_lot::Mutex;
use std::sync::Arc;

pub fn words(n: usize) -> String {
    format!("<p>{}</p>", vec!["word"; n].join(" "))
}

/// A draft that clears every default rule with no issues at all.
pub fn passing_draft() -> DraftArtifact {
    let mut sections: Vec<Section> = ["Why scale builds up", "What you need", "Step by step", "Aftercare"]
        .iter()
        .map(|heading| Section::new(*heading, HeadingLevel::H2, words(220)))
        .collect();
    sections.push(Section::new(
        "Keep it clean",
        HeadingLevel::H2,
        format!("{}<p>Sign up for our monthly maintenance newsletter.</p>", words(200)),
    ));

    DraftArtifact {
        title: "How to Descale a Kettle".to_string(),
        slug: "descale-kettle".to_string(),
        primary_keyword: "descale kettle".to_string(),
        hero_answer: "Descaling a kettle takes about twenty minutes with white vinegar. \
                      Fill it halfway, boil it, and let it soak for an hour. \
                      Rinse twice before the next brew."
            .to_string(),
        sections,
        faqs: vec![
            Faq {
                question: "How often should I descale?".to_string(),
                answer: "Once a month in hard water areas is usually enough to keep the element clear and the water tasting clean, and every three months elsewhere.".to_string(),
            },
            Faq {
                question: "Is vinegar safe for stainless kettles?".to_string(),
                answer: "Diluted white vinegar is fine for stainless steel kettles as long as you rinse thoroughly afterwards and never leave the solution sitting overnight.".to_string(),
            },
        ],
        experience_evidence: ExperienceEvidence {
            summary: Some("We descaled three kettles weekly for a month in a hard water area.".to_string()),
            ..Default::default()
        },
        internal_links: vec![
            InternalLink {
                slug: "hard-water".to_string(),
                anchor_text: "hard water explained".to_string(),
            },
            InternalLink {
                slug: "kettle-buying-guide".to_string(),
                anchor_text: "choosing a kettle".to_string(),
            },
        ],
        ..Default::default()
    }
}

/// One 50-word section, no hero answer, no FAQs.
pub fn thin_draft() -> DraftArtifact {
    DraftArtifact {
        title: "How to Descale a Kettle".to_string(),
        sections: vec![Section::new("Steps", HeadingLevel::H2, words(50))],
        ..Default::default()
    }
}

pub fn topic() -> TopicDescriptor {
    TopicDescriptor {
        title: "Descaling kettles".to_string(),
        primary_keyword: "descale kettle".to_string(),
        intent: TopicIntent::Informational,
        cluster: Some("kitchen".to_string()),
        secondary_keywords: vec![],
    }
}

pub fn brief() -> Brief {
    Brief {
        suggested_title: "How to Descale a Kettle".to_string(),
        suggested_slug: "descale-kettle".to_string(),
        hero_answer_draft: "Use diluted vinegar, boil, soak and rinse. It takes twenty minutes of work.".to_string(),
        faq_suggestions: vec![
            "Can I use lemon juice instead of vinegar?".to_string(),
            "Why does my kettle smell after descaling?".to_string(),
        ],
        ..Default::default()
    }
}

pub fn outline() -> Outline {
    Outline {
        title: "How to Descale a Kettle".to_string(),
        slug: "descale-kettle".to_string(),
        hero_answer: "Boil diluted vinegar and rinse.".to_string(),
        sections: vec![OutlineSection {
            level: HeadingLevel::H2,
            heading: "Step by step".to_string(),
            key_points: vec!["vinegar ratio".to_string()],
            estimated_words: 300,
            internal_link: None,
        }],
        faqs: vec![OutlineFaq {
            question: "How often should I descale?".to_string(),
            answer_hint: None,
        }],
        ..Default::default()
    }
}

pub struct MockOutlines {
    outline: Outline,
    report: OutlineReport,
    pub calls: Mutex<Vec<String>>,
}

impl MockOutlines {
    pub fn new() -> Self {
        Self::with_report(OutlineReport {
            valid: true,
            ..Default::default()
        })
    }

    pub fn with_report(report: OutlineReport) -> Self {
        Self {
            outline: outline(),
            report,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl OutlineGenerator for MockOutlines {
    async fn generate(
        &self,
        topic: &TopicDescriptor,
        _options: &OutlineOptions,
    ) -> Result<Outline, PipelineError> {
        self.calls.lock().push(topic.title.clone());
        Ok(self.outline.clone())
    }

    fn validate(&self, _outline: &Outline) -> OutlineReport {
        self.report.clone()
    }
}

pub enum DraftBehavior {
    Return(DraftArtifact),
    Fail(String),
    Panic(String),
    Hang,
}

pub struct MockDrafts {
    behavior: DraftBehavior,
    pub inputs: Mutex<Vec<DraftGenerationInput>>,
}

impl MockDrafts {
    pub fn new(behavior: DraftBehavior) -> Self {
        Self {
            behavior,
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(draft: DraftArtifact) -> Self {
        Self::new(DraftBehavior::Return(draft))
    }

    pub fn call_count(&self) -> usize {
        self.inputs.lock().len()
    }
}

#[async_trait]
impl DraftGenerator for MockDrafts {
    async fn generate(&self, input: &DraftGenerationInput) -> Result<DraftArtifact, PipelineError> {
        self.inputs.lock().push(input.clone());
        match &self.behavior {
            DraftBehavior::Return(draft) => Ok(draft.clone()),
            DraftBehavior::Fail(message) => {
                Err(PipelineError::collaborator("draft generator", message.clone()))
            }
            DraftBehavior::Panic(message) => panic!("{}", message),
            DraftBehavior::Hang => futures::future::pending().await,
        }
    }
}

/// Repairer with fixed replies. Sections are regenerated by appending `section_suffix`
/// to the current body, so every call produces a change.
#[derive(Default)]
pub struct MockRepairer {
    pub hero: Option<String>,
    pub section_suffix: Option<String>,
    pub faq_answer: Option<String>,
    pub hero_calls: Mutex<Vec<String>>,
    pub section_calls: Mutex<Vec<usize>>,
    pub faq_calls: Mutex<Vec<String>>,
}

impl MockRepairer {
    pub fn total_calls(&self) -> usize {
        self.hero_calls.lock().len() + self.section_calls.lock().len() + self.faq_calls.lock().len()
    }
}

#[async_trait]
impl FieldRepairer for MockRepairer {
    async fn regenerate_hero_answer(
        &self,
        _draft: &DraftArtifact,
        _brief: &Brief,
        prompt: &str,
    ) -> Result<String, PipelineError> {
        self.hero_calls.lock().push(prompt.to_string());
        self.hero
            .clone()
            .ok_or_else(|| PipelineError::collaborator("field repairer", "no hero available"))
    }

    async fn regenerate_section(
        &self,
        draft: &DraftArtifact,
        index: usize,
        _brief: &Brief,
        _prompt: &str,
    ) -> Result<Section, PipelineError> {
        self.section_calls.lock().push(index);
        let suffix = self
            .section_suffix
            .as_ref()
            .ok_or_else(|| PipelineError::collaborator("field repairer", "no section available"))?;
        let current = &draft.sections[index];
        Ok(Section::new(
            current.heading.clone(),
            current.level,
            format!("{}{}", current.body_html, suffix),
        ))
    }

    async fn answer_faq(
        &self,
        _draft: &DraftArtifact,
        _brief: &Brief,
        question: &str,
    ) -> Result<String, PipelineError> {
        self.faq_calls.lock().push(question.to_string());
        self.faq_answer
            .clone()
            .ok_or_else(|| PipelineError::collaborator("field repairer", "no answer available"))
    }
}

/// Panics on hero repair; extends sections normally.
pub struct CrashingHeroRepairer;

#[async_trait]
impl FieldRepairer for CrashingHeroRepairer {
    async fn regenerate_hero_answer(
        &self,
        _draft: &DraftArtifact,
        _brief: &Brief,
        _prompt: &str,
    ) -> Result<String, PipelineError> {
        panic!("hero model crashed");
    }

    async fn regenerate_section(
        &self,
        draft: &DraftArtifact,
        index: usize,
        _brief: &Brief,
        _prompt: &str,
    ) -> Result<Section, PipelineError> {
        let current = &draft.sections[index];
        Ok(Section::new(
            current.heading.clone(),
            current.level,
            format!("{}{}", current.body_html, words(200)),
        ))
    }

    async fn answer_faq(
        &self,
        _draft: &DraftArtifact,
        _brief: &Brief,
        _question: &str,
    ) -> Result<String, PipelineError> {
        Ok("Not needed here.".to_string())
    }
}

pub fn orchestrator(
    outlines: Arc<MockOutlines>,
    drafts: Arc<MockDrafts>,
    repairer: Arc<MockRepairer>,
) -> Orchestrator {
    Orchestrator::new(outlines, drafts, repairer, Validator::default())
}
