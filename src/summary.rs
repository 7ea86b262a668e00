//! Extractive chapter summaries.
//!
//! Sentences are ranked by the chapter-wide frequency of their terms and the
//! winners are emitted in the order they appear in the chapter.

use crate::keywords::{TermFrequencies, normalize_term};
use crate::normalizer::Token;
use crate::text_utils::split_sentences;
use serde::Serialize;
use std::cmp::Ordering;
use ts_rs::TS;

/// Upper bound for `max_sentences`.
pub const MAX_SENTENCES_LIMIT: usize = 100;

const POSITION_BONUS: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct Summary {
    /// Selected sentences in chapter order.
    pub sentences: Vec<String>,
    /// Number of sentences the chapter was split into.
    pub source_sentences: usize,
}

impl Summary {
    pub fn text(&self) -> String {
        self.sentences.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct ScoredSentence {
    index: usize,
    score: f64,
}

/// Summarize a chapter's tokens, keeping at most `max_sentences` sentences.
pub fn summarize_tokens(tokens: &[Token], max_sentences: usize) -> Summary {
    let text = tokens
        .iter()
        .map(|token| token.raw.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    summarize(&text, max_sentences)
}

/// Summarize plain text, keeping at most `max_sentences` sentences.
pub fn summarize(text: &str, max_sentences: usize) -> Summary {
    let sentences = split_sentences(text);
    let frequencies = TermFrequencies::from_words(text.split_whitespace());
    let total = sentences.len();

    let mut scored: Vec<ScoredSentence> = sentences
        .iter()
        .enumerate()
        .map(|(index, sentence)| ScoredSentence {
            index,
            score: sentence_score(sentence, &frequencies) + (total - index) as f64 * POSITION_BONUS,
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(max_sentences.min(MAX_SENTENCES_LIMIT));
    scored.sort_by_key(|entry| entry.index);

    Summary {
        sentences: scored
            .into_iter()
            .map(|entry| sentences[entry.index].clone())
            .collect(),
        source_sentences: total,
    }
}

fn sentence_score(sentence: &str, frequencies: &TermFrequencies) -> f64 {
    sentence
        .split_whitespace()
        .filter_map(normalize_term)
        .map(|term| frequencies.get(&term))
        .sum::<usize>() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::tokenize;

    const CHAPTER: &str = "The harbor was quiet. Gulls circled. \
        The harbor master counted ships in the harbor at dawn. \
        Nobody spoke! Ships and harbor lights and ships again filled the harbor. \
        Was that the end?";

    fn position_in_source(sentence: &str) -> usize {
        CHAPTER.find(sentence).expect("summary sentence should come from source")
    }

    #[test]
    fn selection_preserves_source_order() {
        let summary = summarize(CHAPTER, 3);
        assert_eq!(summary.sentences.len(), 3);
        assert_eq!(summary.source_sentences, 6);
        let positions: Vec<usize> = summary
            .sentences
            .iter()
            .map(|sentence| position_in_source(sentence))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn picks_highest_scoring_sentences() {
        let summary = summarize(CHAPTER, 2);
        assert_eq!(
            summary.sentences,
            vec![
                "The harbor master counted ships in the harbor at dawn.",
                "Ships and harbor lights and ships again filled the harbor.",
            ]
        );
    }

    #[test]
    fn ties_favour_earlier_sentences() {
        let summary = summarize("Alpha beta. Gamma delta. Epsilon zeta.", 1);
        assert_eq!(summary.sentences, vec!["Alpha beta."]);
    }

    #[test]
    fn short_chapters_are_returned_whole() {
        let summary = summarize("One line. Two lines.", 7);
        assert_eq!(summary.text(), "One line. Two lines.");
    }

    #[test]
    fn empty_input_gives_empty_summary() {
        let summary = summarize_tokens(&[], 7);
        assert!(summary.is_empty());
        assert_eq!(summary.source_sentences, 0);
    }

    #[test]
    fn token_summaries_keep_surface_punctuation() {
        let tokens = tokenize("First, the storm. Then the calm! Finally the storm returned.");
        let summary = summarize_tokens(&tokens, 2);
        assert_eq!(
            summary.sentences,
            vec!["First, the storm.", "Finally the storm returned."]
        );
    }
}
