//! Chapter heading detection and the preface anchor.
//!
//! Headings are found line by line in the raw text and pinned to the number
//! of tokens that precede their line. The list is never empty and its start
//! indices are strictly increasing, starting at zero.

use crate::normalizer::{count_tokens, has_word_chars};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::ops::Range;
use tracing::debug;
use ts_rs::TS;

pub const INTRODUCTION_TITLE: &str = "Introduction";
pub const FULL_TEXT_TITLE: &str = "Full Text";

static RE_CHAPTER_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^chapter\s+\d+\b.*$").unwrap());
static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+.+$").unwrap());
static RE_ROMAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[IVXLC]+\.?\s+.+$").unwrap());
static RE_UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{Lu}[\p{Lu}\s]{3,}$").unwrap());
static RE_PREFACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)preface|introduction").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Chapter {
    pub title: String,
    pub start_word_index: usize,
}

impl Chapter {
    fn new(title: impl Into<String>, start_word_index: usize) -> Self {
        Self {
            title: title.into(),
            start_word_index,
        }
    }
}

/// Whether a trimmed line looks like a chapter heading.
pub fn is_heading(line: &str) -> bool {
    !line.is_empty()
        && (RE_CHAPTER_NUMBER.is_match(line)
            || RE_NUMBERED.is_match(line)
            || RE_ROMAN.is_match(line)
            || RE_UPPERCASE.is_match(line))
}

/// Detect chapters in `text`.
pub fn detect_chapters(text: &str) -> Vec<Chapter> {
    let mut anchors = Vec::new();
    let mut words_before_line = 0usize;

    // Tokens never span a newline, so the token count of the prefix ending at
    // a line start is the sum of the counts of the lines before it.
    for line in text.split('\n') {
        let trimmed = line.trim();
        if is_heading(trimmed) {
            anchors.push(Chapter::new(trimmed, words_before_line));
        }
        words_before_line += count_tokens(line);
    }

    if anchors.is_empty() {
        return vec![Chapter::new(FULL_TEXT_TITLE, 0)];
    }

    anchors.sort_by_key(|chapter| chapter.start_word_index);
    anchors.dedup_by_key(|chapter| chapter.start_word_index);
    if anchors[0].start_word_index != 0 {
        anchors.insert(0, Chapter::new(INTRODUCTION_TITLE, 0));
    }
    debug!(chapters = anchors.len(), "Detected chapter headings");
    anchors
}

/// Index of the chapter containing `word_index`.
pub fn chapter_at(chapters: &[Chapter], word_index: usize) -> usize {
    chapters
        .partition_point(|chapter| chapter.start_word_index <= word_index)
        .saturating_sub(1)
}

/// Word range of `chapter`, ending at the next chapter or `total_words`.
pub fn chapter_word_range(chapters: &[Chapter], chapter: usize, total_words: usize) -> Range<usize> {
    let Some(current) = chapters.get(chapter) else {
        return total_words..total_words;
    };
    let end = chapters
        .get(chapter + 1)
        .map(|next| next.start_word_index)
        .unwrap_or(total_words);
    let start = current.start_word_index.min(total_words);
    start..end.clamp(start, total_words)
}

/// Byte offset of the first "preface" or "introduction" in the scan window.
///
/// This is a first-match heuristic: the earliest literal occurrence wins even
/// when it is part of running prose. `scan_chars` bounds the search to a
/// prefix of the text; `None` scans everything.
pub fn find_preface(text: &str, scan_chars: Option<usize>) -> Option<usize> {
    let window_end = match scan_chars {
        Some(limit) => text
            .char_indices()
            .nth(limit)
            .map(|(offset, _)| offset)
            .unwrap_or(text.len()),
        None => text.len(),
    };
    RE_PREFACE.find(&text[..window_end]).map(|found| found.start())
}

/// Word index where reading starts when the preface anchor is honoured.
///
/// A match in the middle of a word starts reading at that word.
pub fn preface_word_index(text: &str, scan_chars: Option<usize>) -> Option<usize> {
    let offset = find_preface(text, scan_chars)?;
    let prefix = &text[..offset];
    let mut words = count_tokens(prefix);
    let ends_inside_word = prefix.chars().last().is_some_and(|ch| !ch.is_whitespace());
    if ends_inside_word {
        let partial = prefix.split_whitespace().last().unwrap_or("");
        if has_word_chars(partial) {
            words = words.saturating_sub(1);
        }
    }
    Some(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::tokenize;

    fn assert_invariants(chapters: &[Chapter]) {
        assert!(!chapters.is_empty());
        assert_eq!(chapters[0].start_word_index, 0);
        assert!(
            chapters
                .windows(2)
                .all(|pair| pair[0].start_word_index < pair[1].start_word_index)
        );
    }

    #[test]
    fn two_numbered_chapters() {
        let text = "Chapter 1\nHello world. This is a test.\nChapter 2\nSecond chapter text here.";
        let chapters = detect_chapters(text);
        let second_line_start = text.find("Chapter 2").unwrap();
        let expected = tokenize(&text[..second_line_start]).len();
        assert_eq!(expected, 8);
        assert_eq!(
            chapters,
            vec![Chapter::new("Chapter 1", 0), Chapter::new("Chapter 2", expected)]
        );
        assert_invariants(&chapters);
    }

    #[test]
    fn no_headings_yield_full_text() {
        let chapters = detect_chapters("just some prose.\nand more of it, lowercase.");
        assert_eq!(chapters, vec![Chapter::new(FULL_TEXT_TITLE, 0)]);
        assert_eq!(detect_chapters(""), vec![Chapter::new(FULL_TEXT_TITLE, 0)]);
    }

    #[test]
    fn late_first_heading_gets_introduction() {
        let text = "Some opening words here.\nCHAPTER ONE\nBody text follows.";
        let chapters = detect_chapters(text);
        assert_eq!(chapters[0], Chapter::new(INTRODUCTION_TITLE, 0));
        assert_eq!(chapters[1], Chapter::new("CHAPTER ONE", 4));
        assert_invariants(&chapters);
    }

    #[test]
    fn recognises_each_heading_form() {
        assert!(is_heading("chapter 12 The Return"));
        assert!(is_heading("3. Methods"));
        assert!(is_heading("IV. The Storm"));
        assert!(is_heading("XII Rising"));
        assert!(is_heading("THE END"));
        assert!(!is_heading("ABC"));
        assert!(!is_heading("Chapter One"));
        assert!(!is_heading("3.Methods"));
        assert!(!is_heading("The storm came."));
        assert!(!is_heading(""));
    }

    #[test]
    fn consecutive_headings_keep_distinct_anchors() {
        let text = "PART ONE\n***\nChapter 1 Begins\nText.";
        let chapters = detect_chapters(text);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "PART ONE");
        assert_eq!(chapters[1].start_word_index, 2);
        assert_invariants(&chapters);
    }

    #[test]
    fn chapter_lookup_and_ranges() {
        let chapters = vec![
            Chapter::new("A", 0),
            Chapter::new("B", 10),
            Chapter::new("C", 25),
        ];
        assert_eq!(chapter_at(&chapters, 0), 0);
        assert_eq!(chapter_at(&chapters, 9), 0);
        assert_eq!(chapter_at(&chapters, 10), 1);
        assert_eq!(chapter_at(&chapters, 1000), 2);
        assert_eq!(chapter_word_range(&chapters, 1, 40), 10..25);
        assert_eq!(chapter_word_range(&chapters, 2, 40), 25..40);
        assert_eq!(chapter_word_range(&chapters, 7, 40), 40..40);
    }

    #[test]
    fn preface_is_first_match_case_insensitive() {
        let text = "Title page\nCopyright\nPREFACE\nWords. Introduction later.";
        let offset = find_preface(text, None).unwrap();
        assert_eq!(&text[offset..offset + 7], "PREFACE");
        assert_eq!(preface_word_index(text, None), Some(3));
    }

    #[test]
    fn preface_respects_scan_window() {
        let text = "aaaa bbbb cccc introduction";
        assert_eq!(find_preface(text, Some(10)), None);
        assert_eq!(preface_word_index(text, Some(100)), Some(3));
        assert_eq!(find_preface("no anchor here", None), None);
    }

    #[test]
    fn preface_inside_word_starts_at_that_word() {
        let text = "one two reintroduction three";
        assert_eq!(preface_word_index(text, None), Some(2));

        let quoted = "one “Introduction” two";
        assert_eq!(preface_word_index(quoted, None), Some(1));
    }
}
