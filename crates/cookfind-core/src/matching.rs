//! Recipe name normalization and exact/fuzzy classification.
//!
//! A candidate is an exact match when its lower-cased name equals the
//! lower-cased query. Otherwise, for long queries, a candidate is a fuzzy
//! match when all but at most one of its words appear among the query's words.

use std::collections::HashSet;

use serde::Serialize;

/// Minimum number of words both the query and the candidate need before
/// fuzzy matching is attempted.
pub const FUZZY_MIN_WORDS: usize = 4;

/// How a candidate recipe name relates to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Exact,
    Fuzzy,
    None,
}

impl Classification {
    pub fn label(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Fuzzy => "fuzzy",
            Self::None => "none",
        }
    }
}

/// Lower-case `text` and split it into non-empty words on runs of whitespace.
///
/// Returns the lower-cased text untouched (no whitespace collapsing) together
/// with its words in order.
pub fn normalize(text: &str) -> (String, Vec<String>) {
    let lower = text.to_lowercase();
    let words = lower.split_whitespace().map(str::to_string).collect();
    (lower, words)
}

/// A search query, normalized once when the search starts.
#[derive(Debug, Clone)]
pub struct Query {
    raw_text: String,
    normalized_text: String,
    normalized_words: Vec<String>,
    word_set: HashSet<String>,
}

impl Query {
    pub fn new(raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let (normalized_text, normalized_words) = normalize(&raw_text);
        let word_set = normalized_words.iter().cloned().collect();
        Self {
            raw_text,
            normalized_text,
            normalized_words,
            word_set,
        }
    }

    /// The query exactly as the user typed it.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn normalized_text(&self) -> &str {
        &self.normalized_text
    }

    /// Query words in order, duplicates kept.
    pub fn normalized_words(&self) -> &[String] {
        &self.normalized_words
    }

    fn contains_word(&self, word: &str) -> bool {
        self.word_set.contains(word)
    }
}

/// Classify a candidate recipe name against the query.
pub fn classify(display_name: &str, query: &Query) -> Classification {
    let (candidate_text, candidate_words) = normalize(display_name);

    if candidate_text == query.normalized_text() {
        return Classification::Exact;
    }

    if query.normalized_words().len() >= FUZZY_MIN_WORDS && all_but_one(&candidate_words, query) {
        Classification::Fuzzy
    } else {
        Classification::None
    }
}

/// True when every candidate word, except at most one, is also a query word.
///
/// The floor is taken from the candidate's own word count; a candidate with
/// fewer than [`FUZZY_MIN_WORDS`] words never qualifies.
fn all_but_one(candidate_words: &[String], query: &Query) -> bool {
    let count = candidate_words.len();
    if count < FUZZY_MIN_WORDS {
        return false;
    }
    let shared = candidate_words
        .iter()
        .filter(|w| query.contains_word(w))
        .count();
    shared >= count - 1
}
