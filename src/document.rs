//! Immutable, fully derived view of the extracted book text.
//!
//! A `Document` is rebuilt from the complete fragment list whenever new text
//! arrives; nothing is patched in place. Chapters and paragraphs use absolute
//! word indices over the whole token stream, while pages and playback cover
//! the playable stream that starts at the preface anchor.

use crate::chapters::{self, Chapter};
use crate::config::EngineConfig;
use crate::graph::{KeywordGraph, build_graph};
use crate::keywords::{Keyword, extract_keywords};
use crate::normalizer::{Token, canonicalize, tokenize};
use crate::pagination::Pagination;
use crate::playback::PositionMap;
use crate::summary::{Summary, summarize_tokens};
use crate::text_utils::paragraph_starts;
use std::ops::Range;
use tracing::info;

/// Derived per-chapter content.
#[derive(Debug, Clone)]
pub struct ChapterAnalysis {
    pub keywords: Vec<Keyword>,
    pub graph: KeywordGraph,
    pub summary: Summary,
}

#[derive(Debug, Clone)]
pub struct Document {
    tokens: Vec<Token>,
    chapters: Vec<Chapter>,
    analyses: Vec<ChapterAnalysis>,
    paragraph_starts: Vec<usize>,
    reading_start: usize,
    pagination: Pagination,
}

impl Document {
    pub fn empty(config: &EngineConfig) -> Self {
        Self::build(&[], config)
    }

    /// Build a document from ordered text fragments.
    ///
    /// Fragments are joined with newlines so a fragment that begins with a
    /// heading keeps it on its own line.
    pub fn build(fragments: &[String], config: &EngineConfig) -> Self {
        Self::build_with_reading_start(fragments, config, None)
    }

    /// Build a document whose playable stream starts at `reading_start`
    /// instead of a freshly detected preface anchor.
    ///
    /// Fragments only ever grow at the end, so an absolute token index from an
    /// earlier build still names the same word.
    pub fn build_with_reading_start(
        fragments: &[String],
        config: &EngineConfig,
        reading_start: Option<usize>,
    ) -> Self {
        let config = config.sanitized();
        let text = canonicalize(&fragments.join("\n"));
        let tokens = tokenize(&text);
        let chapters = chapters::detect_chapters(&text);

        let reading_start = match reading_start {
            Some(start) => start,
            None if config.start_from_preface => {
                chapters::preface_word_index(&text, config.preface_scan_chars).unwrap_or(0)
            }
            None => 0,
        }
        .min(tokens.len());
        let pagination = Pagination::new(tokens.len() - reading_start, config.page_size);

        let analyses = (0..chapters.len())
            .map(|chapter| {
                let range = chapters::chapter_word_range(&chapters, chapter, tokens.len());
                analyze_chapter(&tokens[range], &config)
            })
            .collect();

        info!(
            fragments = fragments.len(),
            words = tokens.len(),
            reading_start,
            pages = pagination.page_count(),
            chapters = chapters.len(),
            "Built document"
        );

        Self {
            paragraph_starts: paragraph_starts(&text),
            tokens,
            chapters,
            analyses,
            reading_start,
            pagination,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.playable_len() == 0
    }

    /// Every token, including those before the preface anchor.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Absolute index of the first playable token.
    pub fn reading_start(&self) -> usize {
        self.reading_start
    }

    pub fn playable_tokens(&self) -> &[Token] {
        &self.tokens[self.reading_start..]
    }

    pub fn playable_len(&self) -> usize {
        self.tokens.len() - self.reading_start
    }

    /// Token at a playable-stream index.
    pub fn token_at(&self, word_index: usize) -> Option<&Token> {
        self.playable_tokens().get(word_index)
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn page_count(&self) -> usize {
        self.pagination.page_count()
    }

    /// Tokens on `page`; empty when the page does not exist.
    pub fn page(&self, page: usize) -> &[Token] {
        self.pagination
            .page_to_word_range(page)
            .map(|range| &self.playable_tokens()[range])
            .unwrap_or(&[])
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Absolute word range of `chapter`.
    pub fn chapter_range(&self, chapter: usize) -> Range<usize> {
        chapters::chapter_word_range(&self.chapters, chapter, self.tokens.len())
    }

    /// Analysis for `chapter`, clamped to the last chapter.
    pub fn analysis(&self, chapter: usize) -> &ChapterAnalysis {
        let last = self.analyses.len().saturating_sub(1);
        &self.analyses[chapter.min(last)]
    }

    /// Paragraph holding the absolute word index, if any paragraph exists.
    pub fn paragraph_at(&self, absolute_index: usize) -> Option<usize> {
        let after = self
            .paragraph_starts
            .partition_point(|start| *start <= absolute_index);
        after.checked_sub(1)
    }

    pub fn paragraph_starts(&self) -> &[usize] {
        &self.paragraph_starts
    }

    /// Page and chapter layout of the playable stream for the scheduler.
    pub fn position_map(&self) -> PositionMap {
        let chapter_starts = self
            .chapters
            .iter()
            .map(|chapter| chapter.start_word_index.saturating_sub(self.reading_start))
            .collect();
        PositionMap::new(
            self.playable_len(),
            self.pagination.page_size(),
            chapter_starts,
        )
    }
}

fn analyze_chapter(tokens: &[Token], config: &EngineConfig) -> ChapterAnalysis {
    let keywords = extract_keywords(tokens, config.max_keywords);
    ChapterAnalysis {
        graph: build_graph(&keywords),
        summary: summarize_tokens(tokens, config.max_sentences),
        keywords,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_without_preface() -> EngineConfig {
        EngineConfig {
            start_from_preface: false,
            ..EngineConfig::default()
        }
    }

    fn fragments(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| part.to_string()).collect()
    }

    #[test]
    fn empty_fragments_build_an_empty_document() {
        let document = Document::empty(&EngineConfig::default());
        assert!(document.is_empty());
        assert_eq!(document.page_count(), 0);
        assert_eq!(document.chapters().len(), 1);
        assert!(document.analysis(0).keywords.is_empty());
        assert!(document.page(0).is_empty());
    }

    #[test]
    fn fragments_keep_headings_on_their_own_lines() {
        let document = Document::build(
            &fragments(&["Chapter 1", "Hello world. This is a test.", "Chapter 2", "Second chapter text here."]),
            &config_without_preface(),
        );
        let titles: Vec<&str> = document
            .chapters()
            .iter()
            .map(|chapter| chapter.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Chapter 1", "Chapter 2"]);
        assert_eq!(document.chapters()[1].start_word_index, 8);
        assert_eq!(document.chapter_range(0), 0..8);
        assert_eq!(document.chapter_range(1), 8..14);
    }

    #[test]
    fn pages_cover_the_playable_stream() {
        let words: Vec<String> = (0..450).map(|i| format!("w{i}")).collect();
        let document = Document::build(&[words.join(" ")], &config_without_preface());
        assert_eq!(document.page_count(), 3);
        assert_eq!(document.page(2).len(), 50);
        assert_eq!(document.page(2)[0].text, "w400");
    }

    #[test]
    fn preface_anchor_trims_playable_stream() {
        let document = Document::build(
            &fragments(&["Title Page", "Copyright notice here", "PREFACE", "It begins here. Chapter 1 follows."]),
            &EngineConfig::default(),
        );
        assert_eq!(document.reading_start(), 5);
        assert_eq!(document.token_at(0).map(|token| token.text.as_str()), Some("PREFACE"));
        assert_eq!(document.playable_len(), document.tokens().len() - 5);
        assert_eq!(document.chapters()[0].start_word_index, 0);

        let positions = document.position_map();
        assert_eq!(positions.word_count(), document.playable_len());
        assert_eq!(positions.chapter_of(0), 1);
    }

    #[test]
    fn pinned_reading_start_survives_a_later_preface() {
        let first = fragments(&["opening words before anything"]);
        let document = Document::build(&first, &EngineConfig::default());
        assert_eq!(document.reading_start(), 0);

        let grown = fragments(&["opening words before anything", "then an Introduction appears"]);
        assert_eq!(Document::build(&grown, &EngineConfig::default()).reading_start(), 6);

        let pinned = Document::build_with_reading_start(
            &grown,
            &EngineConfig::default(),
            Some(document.reading_start()),
        );
        assert_eq!(pinned.reading_start(), 0);
        assert_eq!(pinned.playable_len(), 8);
        assert_eq!(pinned.token_at(3).map(|token| token.text.as_str()), Some("anything"));
    }

    #[test]
    fn bounded_scan_window_can_miss_the_preface() {
        let config = EngineConfig {
            preface_scan_chars: Some(10),
            ..EngineConfig::default()
        };
        let document = Document::build(&fragments(&["some opening words", "Preface text"]), &config);
        assert_eq!(document.reading_start(), 0);
    }

    #[test]
    fn chapter_analysis_is_scoped_to_the_chapter() {
        let document = Document::build(
            &fragments(&[
                "Chapter 1",
                "Ships sail. Ships return. The harbor waits.",
                "Chapter 2",
                "Mountains rise. Snow falls on mountains.",
            ]),
            &config_without_preface(),
        );
        let first = document.analysis(0);
        assert_eq!(first.keywords[0].term, "ships");
        assert!(first.keywords.iter().all(|keyword| keyword.term != "mountains"));
        assert_eq!(first.graph.edges.len(), first.keywords.len());

        let second = document.analysis(9);
        assert_eq!(second.keywords[0].term, "mountains");
        assert_eq!(
            second.summary.sentences,
            vec!["Chapter 2 Mountains rise.", "Snow falls on mountains."]
        );
    }

    #[test]
    fn paragraphs_map_absolute_indices() {
        let document = Document::build(
            &fragments(&["alpha beta\n\ngamma delta epsilon\n\nzeta"]),
            &config_without_preface(),
        );
        assert_eq!(document.paragraph_starts(), &[0, 2, 5]);
        assert_eq!(document.paragraph_at(0), Some(0));
        assert_eq!(document.paragraph_at(4), Some(1));
        assert_eq!(document.paragraph_at(5), Some(2));
        assert_eq!(Document::empty(&EngineConfig::default()).paragraph_at(0), None);
    }
}
