//! Text splitting helpers for summarization and paragraph anchors.

use crate::normalizer::count_tokens;

/// Lightweight sentence splitter: a sentence ends at `.`, `!` or `?` when
/// whitespace follows. Trailing text without terminal punctuation is kept as
/// the last sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        let boundary = matches!(ch, '.' | '!' | '?')
            && chars.peek().is_some_and(|next| next.is_whitespace());
        if boundary {
            push_sentence(&mut sentences, &current);
            current.clear();
        }
    }
    push_sentence(&mut sentences, &current);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}

/// Word index at which each blank-line separated paragraph starts.
///
/// Paragraphs without any token are skipped, so the returned indices are
/// strictly increasing.
pub fn paragraph_starts(text: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut words = 0usize;
    let mut paragraph_words = 0usize;

    for line in text.split('\n') {
        if line.trim().is_empty() {
            paragraph_words = 0;
            continue;
        }
        let line_words = count_tokens(line);
        if paragraph_words == 0 && line_words > 0 {
            starts.push(words);
        }
        paragraph_words += line_words;
        words += line_words;
    }

    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation_followed_by_space() {
        let sentences = split_sentences("Hello world. Is it? Yes!  It is 3.14 exactly.");
        assert_eq!(
            sentences,
            vec!["Hello world.", "Is it?", "Yes!", "It is 3.14 exactly."]
        );
    }

    #[test]
    fn keeps_unterminated_tail() {
        let sentences = split_sentences("First one. trailing words");
        assert_eq!(sentences, vec!["First one.", "trailing words"]);
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn paragraph_starts_follow_blank_lines() {
        let text = "One two\nthree.\n\n\nFour five.\n  \n...\n\nSix";
        assert_eq!(paragraph_starts(text), vec![0, 3, 5]);
        assert!(paragraph_starts("").is_empty());
    }
}
