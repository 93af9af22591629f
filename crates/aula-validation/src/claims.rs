//! Claim segmentation and citation marker handling.

use std::sync::LazyLock;

use aula_core::text;
use regex::Regex;

/// `[n]` or `[chunk-id]` markers, no nesting.
static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]+)\]").expect("valid marker regex"));

/// Space left before punctuation once a marker is removed.
static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,;:!?])").expect("valid punctuation regex"));

/// One verifiable sentence of a draft.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    /// The sentence as drafted, markers included.
    pub sentence: String,
    /// The sentence without markers.
    pub text: String,
    /// Marker contents in order of appearance.
    pub markers: Vec<String>,
}

/// Remove citation markers and tidy the whitespace they leave behind.
pub fn strip_markers(s: &str) -> String {
    let without = MARKER.replace_all(s, " ");
    let collapsed = text::normalize_whitespace(&without);
    SPACE_BEFORE_PUNCT.replace_all(&collapsed, "$1").into_owned()
}

/// Marker contents of `s`, trimmed.
pub fn markers(s: &str) -> Vec<String> {
    MARKER
        .captures_iter(s)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|m| !m.is_empty())
        .collect()
}

/// Split a draft into claims. Sentences shorter than `min_chars` once markers
/// are stripped are connective tissue, not claims.
pub fn segment(draft: &str, min_chars: usize) -> Vec<Claim> {
    text::split_sentences(draft)
        .into_iter()
        .filter_map(|sentence| {
            let text = strip_markers(&sentence);
            (text.chars().count() >= min_chars).then(|| Claim {
                markers: markers(&sentence),
                text,
                sentence,
            })
        })
        .collect()
}

/// Every sentence of a draft that says anything once markers are stripped,
/// however short. Citation enforcement runs over these.
pub fn sentences(draft: &str) -> Vec<Claim> {
    segment(draft, 1)
}

/// The draft with every marker removed.
pub fn plain_text(draft: &str) -> String {
    strip_markers(draft)
}
