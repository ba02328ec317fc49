//! Text measurement helpers shared by the metrics extractor and draft construction.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_OR_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("static regex")
});
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("static regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Minimum trimmed length for a fragment to count as a sentence.
const MIN_SENTENCE_CHARS: usize = 10;

/// Remove markup and decode the handful of entities generators actually emit.
pub fn strip_html(html: &str) -> String {
    let without_code = SCRIPT_OR_STYLE.replace_all(html, " ");
    let without_tags = TAG.replace_all(&without_code, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    WHITESPACE.replace_all(decoded.trim(), " ").into_owned()
}

/// Whitespace-delimited tokens containing at least one letter or digit.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .count()
}

/// Fragments between `.`, `!` and `?` whose trimmed length exceeds ten characters.
pub fn count_sentences(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|fragment| fragment.trim().chars().count() > MIN_SENTENCE_CHARS)
        .count()
}
