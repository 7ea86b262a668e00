//! Raw text cleanup and tokenization.
//!
//! Tokens are produced per whitespace-delimited word: characters outside
//! letters, digits, apostrophes and hyphens are removed and words that end up
//! empty are dropped. Because removal never touches whitespace this is the
//! same sequence as cleaning the whole text first and splitting afterwards,
//! and it lets every token remember the surface form it came from.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use ts_rs::TS;
use unicode_normalization::UnicodeNormalization;

static RE_DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s'’-]").unwrap());
static RE_KEPT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}'’-]").unwrap());
static RE_LEADING_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{L}\p{N}]+").unwrap());

/// A normalized word with its position in the full token stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Token {
    pub index: usize,
    /// Cleaned word; never empty.
    pub text: String,
    /// The whitespace-delimited word the token was cleaned from.
    pub raw: String,
}

/// Rendering hint for a word: bold leading half, plain remainder, and the
/// trailing non-alphanumeric tail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct WordEmphasis {
    pub bold: String,
    pub plain: String,
    pub suffix: String,
}

impl WordEmphasis {
    pub fn is_emphasized(&self) -> bool {
        !self.bold.is_empty()
    }
}

/// Compose text into NFC so decomposed accents count as letters.
pub fn canonicalize(text: &str) -> String {
    text.nfc().collect()
}

/// Clean a single raw word, returning `None` when nothing survives.
pub fn normalize_word(raw: &str) -> Option<String> {
    let cleaned = RE_DISALLOWED.replace_all(raw, "");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.into_owned())
    }
}

/// Split text into tokens numbered from `0`.
pub fn tokenize(text: &str) -> Vec<Token> {
    text.split_whitespace()
        .filter_map(|raw| normalize_word(raw).map(|cleaned| (raw, cleaned)))
        .enumerate()
        .map(|(index, (raw, text))| Token {
            index,
            text,
            raw: raw.to_string(),
        })
        .collect()
}

/// Whether a raw word survives normalization.
pub fn has_word_chars(raw: &str) -> bool {
    RE_KEPT.is_match(raw)
}

/// Number of tokens `tokenize` would produce, without allocating them.
pub fn count_tokens(text: &str) -> usize {
    text.split_whitespace()
        .filter(|raw| has_word_chars(raw))
        .count()
}

/// Split the leading letter/digit run of `word` at `ceil(len / 2)`.
///
/// Words that do not start with a letter or digit are returned whole in the
/// suffix with nothing emphasized.
pub fn emphasize(word: &str) -> WordEmphasis {
    let Some(leading) = RE_LEADING_ALNUM.find(word) else {
        return WordEmphasis {
            bold: String::new(),
            plain: String::new(),
            suffix: word.to_string(),
        };
    };

    let run = leading.as_str();
    let char_count = run.chars().count();
    let middle = char_count.div_ceil(2);
    let split_at = run
        .char_indices()
        .nth(middle)
        .map(|(offset, _)| offset)
        .unwrap_or(run.len());

    WordEmphasis {
        bold: run[..split_at].to_string(),
        plain: run[split_at..].to_string(),
        suffix: word[leading.end()..].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|token| token.text.as_str()).collect()
    }

    #[test]
    fn strips_punctuation_and_keeps_contractions() {
        let tokens = tokenize("Don't stop -- well-known: \"quotes\", (brackets)!");
        assert_eq!(
            texts(&tokens),
            vec!["Don't", "stop", "--", "well-known", "quotes", "brackets"]
        );
        assert_eq!(tokens[4].raw, "\"quotes\",");
        assert_eq!(tokens[5].index, 5);
    }

    #[test]
    fn drops_words_without_kept_characters() {
        let tokens = tokenize("alpha ... — beta !!");
        assert_eq!(texts(&tokens), vec!["alpha", "beta"]);
        assert_eq!(tokens[1].index, 1);
    }

    #[test]
    fn empty_and_blank_input_produce_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \n\t ").is_empty());
    }

    #[test]
    fn keeps_unicode_letters_and_digits() {
        let tokens = tokenize("Café naïve 1984, Ωmega.");
        assert_eq!(texts(&tokens), vec!["Café", "naïve", "1984", "Ωmega"]);
    }

    #[test]
    fn count_matches_tokenize() {
        let samples = [
            "",
            "Chapter 1\nHello world. This is a test.\n",
            "a -- b ... c's ’tis “quoted” ¶ 42",
        ];
        for sample in samples {
            assert_eq!(count_tokens(sample), tokenize(sample).len(), "{sample:?}");
        }
    }

    #[test]
    fn canonicalize_composes_accents() {
        let decomposed = "Cafe\u{301}";
        let composed = canonicalize(decomposed);
        assert_eq!(composed, "Café");
        assert_eq!(texts(&tokenize(&composed)), vec!["Café"]);
    }

    #[test]
    fn emphasis_splits_leading_run_at_upper_half() {
        let hint = emphasize("world.");
        assert_eq!(hint.bold, "wor");
        assert_eq!(hint.plain, "ld");
        assert_eq!(hint.suffix, ".");

        let odd = emphasize("reader");
        assert_eq!((odd.bold.as_str(), odd.plain.as_str()), ("rea", "der"));

        let five = emphasize("hello");
        assert_eq!((five.bold.as_str(), five.plain.as_str()), ("hel", "lo"));
    }

    #[test]
    fn emphasis_handles_single_letters_and_multibyte() {
        let single = emphasize("a");
        assert_eq!((single.bold.as_str(), single.plain.as_str()), ("a", ""));

        let accented = emphasize("élan,");
        assert_eq!(accented.bold, "él");
        assert_eq!(accented.plain, "an");
        assert_eq!(accented.suffix, ",");
    }

    #[test]
    fn emphasis_passes_through_words_without_leading_alnum() {
        let hint = emphasize("\"quoted\"");
        assert!(!hint.is_emphasized());
        assert_eq!(hint.suffix, "\"quoted\"");
        assert!(hint.plain.is_empty());
    }
}
