
use draftsmith::content::{
    DraftArtifact, ExperienceEvidence, Faq, HeadingLevel, InternalLink, Section,
};
use proptest::prelude::*;

/// Shape of a generated draft; kept separate so failures shrink to readable cases.
#[derive(Debug, Clone)]
pub struct DraftShape {
    pub section_words: Vec<usize>,
    pub hero_sentences: usize,
    pub faqs: usize,
    pub faq_answer_words: usize,
    pub links: usize,
    pub evidence: bool,
    pub cta: bool,
    pub hazardous: bool,
}

pub fn draft_shape() -> impl Strategy<Value = DraftShape> {
    (
        prop::collection::vec(0usize..400, 0..7),
        0usize..7,
        0usize..6,
        0usize..40,
        0usize..6,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(section_words, hero_sentences, faqs, faq_answer_words, links, evidence, cta, hazardous)| {
                DraftShape {
                    section_words,
                    hero_sentences,
                    faqs,
                    faq_answer_words,
                    links,
                    evidence,
                    cta,
                    hazardous,
                }
            },
        )
}

fn words(n: usize) -> String {
    vec!["word"; n].join(" ")
}

pub fn build_draft(shape: &DraftShape) -> DraftArtifact {
    let last = shape.section_words.len().saturating_sub(1);
    let sections = shape
        .section_words
        .iter()
        .enumerate()
        .map(|(index, count)| {
            let mut body = format!("<p>{}</p>", words(*count));
            if shape.cta && index == last {
                body.push_str("<p>Sign up for our newsletter to get the next guide.</p>");
            }
            Section::new(format!("Part {}", index + 1), HeadingLevel::H2, body)
        })
        .collect();

    DraftArtifact {
        title: if shape.hazardous {
            "Cleaning drains with caustic soda".to_string()
        } else {
            "Cleaning drains with hot water".to_string()
        },
        slug: "cleaning-drains".to_string(),
        primary_keyword: "clean drains".to_string(),
        hero_answer: (0..shape.hero_sentences)
            .map(|i| format!("This is sentence number {} of the answer.", i + 1))
            .collect::<Vec<_>>()
            .join(" "),
        sections,
        faqs: (0..shape.faqs)
            .map(|i| Faq {
                question: format!("Question number {}?", i + 1),
                answer: words(shape.faq_answer_words),
            })
            .collect(),
        experience_evidence: ExperienceEvidence {
            summary: shape
                .evidence
                .then(|| "We cleared three blocked drains in our own kitchen.".to_string()),
            ..Default::default()
        },
        internal_links: (0..shape.links)
            .map(|i| InternalLink {
                slug: format!("related-{}", i),
                anchor_text: format!("related guide {}", i),
            })
            .collect(),
        ..Default::default()
    }
}
