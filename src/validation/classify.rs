//! Heuristic text classification.
//!
//! The rule checker only sees [`ContentTags`]; how they are derived is up to the
//! [`TextClassifier`] in use. [`KeywordClassifier`] is the substring-based default.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tags attached to a piece of draft text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentTags {
    pub call_to_action: bool,
    pub callout: bool,
    /// Warning, danger or safety wording
    pub safety_signal: bool,
    pub hazardous: bool,
    pub placeholder: bool,
}

impl ContentTags {
    pub fn is_safety_callout(&self) -> bool {
        self.callout && self.safety_signal
    }
}

pub trait TextClassifier: Send + Sync {
    fn classify(&self, text: &str) -> ContentTags;
}

const CTA_SIGNALS: &[&str] = &[
    "class=\"cta",
    "class='cta",
    "data-cta",
    "btn-cta",
    "get started",
    "sign up",
    "contact us",
    "shop now",
    "buy now",
    "learn more",
    "try it free",
    "request a quote",
    "book a ",
    "subscribe",
    "call us",
];

const CALLOUT_MARKUP: &[&str] = &["callout", "<aside", "class=\"alert", "role=\"note\""];

const SAFETY_SIGNALS: &[&str] = &["warning", "danger", "caution", "safety"];

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\[[A-Z][A-Z0-9 _:\-]{2,}\]|\{\{\s*[A-Za-z_][A-Za-z0-9_.]*\s*\}\}|\{[A-Za-z_][A-Za-z0-9_.]*\}|\b(?:TODO|PLACEHOLDER|TBD)\b",
    )
    .expect("static regex")
});

/// Case-insensitive substring classifier.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    hazardous_keywords: Vec<String>,
}

impl KeywordClassifier {
    pub fn new<I, S>(hazardous_keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hazardous_keywords: hazardous_keywords
                .into_iter()
                .map(|keyword| keyword.as_ref().trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect(),
        }
    }
}

impl TextClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> ContentTags {
        let lowered = text.to_lowercase();
        let contains_any = |needles: &[&str]| needles.iter().any(|needle| lowered.contains(needle));

        ContentTags {
            call_to_action: contains_any(CTA_SIGNALS),
            callout: contains_any(CALLOUT_MARKUP),
            safety_signal: contains_any(SAFETY_SIGNALS),
            hazardous: self
                .hazardous_keywords
                .iter()
                .any(|keyword| lowered.contains(keyword.as_str())),
            // Markers are matched on the original casing: `[PHOTO]` is a marker, `[1]` is not.
            placeholder: PLACEHOLDER.is_match(text),
        }
    }
}
