//! Frequency-ranked keywords for a slice of tokens.

use crate::normalizer::Token;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use ts_rs::TS;

/// Upper bound for `max_keywords`.
pub const MAX_KEYWORDS_LIMIT: usize = 100;

static RE_NON_TERM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}-]").unwrap());

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "a", "an", "to", "of", "in", "on", "for", "with", "as", "by", "at", "from",
        "is", "are", "was", "were", "be", "been", "being", "that", "this", "it", "its", "or",
        "but", "if", "then", "so", "than", "into", "about", "over", "after", "before", "during",
        "most", "more", "many", "much", "can", "could", "should", "would", "may", "might",
        "will", "just", "very", "not", "no", "yes", "you", "we", "they", "he", "she", "him",
        "her", "them",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Keyword {
    pub term: String,
    pub frequency: usize,
}

pub fn is_stopword(term: &str) -> bool {
    STOPWORDS.contains(term)
}

/// Lower-case `word` and keep letters, digits and hyphens. Stopwords and
/// words with nothing left yield `None`.
pub fn normalize_term(word: &str) -> Option<String> {
    let lowered = word.to_lowercase();
    let term = RE_NON_TERM.replace_all(&lowered, "");
    if term.is_empty() || is_stopword(&term) {
        None
    } else {
        Some(term.into_owned())
    }
}

/// Term counts over a token slice, kept in first-occurrence order.
#[derive(Debug, Clone, Default)]
pub struct TermFrequencies {
    entries: Vec<Keyword>,
    positions: HashMap<String, usize>,
}

impl TermFrequencies {
    pub fn from_tokens(tokens: &[Token]) -> Self {
        Self::from_words(tokens.iter().map(|token| token.text.as_str()))
    }

    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut frequencies = Self::default();
        for term in words.into_iter().filter_map(normalize_term) {
            frequencies.record(term);
        }
        frequencies
    }

    fn record(&mut self, term: String) {
        match self.positions.get(&term) {
            Some(&position) => self.entries[position].frequency += 1,
            None => {
                self.positions.insert(term.clone(), self.entries.len());
                self.entries.push(Keyword { term, frequency: 1 });
            }
        }
    }

    pub fn get(&self, term: &str) -> usize {
        self.positions
            .get(term)
            .map(|&position| self.entries[position].frequency)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top `limit` terms by descending frequency; ties keep first occurrence.
    pub fn top(&self, limit: usize) -> Vec<Keyword> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        ranked.truncate(limit);
        ranked
    }
}

/// Most frequent non-stopword terms in `tokens`.
pub fn extract_keywords(tokens: &[Token], max_keywords: usize) -> Vec<Keyword> {
    TermFrequencies::from_tokens(tokens).top(max_keywords.min(MAX_KEYWORDS_LIMIT))
}
