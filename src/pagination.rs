//! Pagination utilities.
//!
//! Pages are fixed-size word windows over the playable token stream. The
//! mapping is pure arithmetic so any word index can be turned into a page
//! without walking the pages, and a different page size means building a new
//! `Pagination`.

use std::ops::Range;

/// Default number of words per page.
pub const DEFAULT_PAGE_SIZE: usize = 200;
/// Minimum allowed page size (words).
pub const MIN_PAGE_SIZE: usize = 1;
/// Maximum allowed page size (words).
pub const MAX_PAGE_SIZE: usize = 10_000;

/// Fixed-size partition of `word_count` words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    word_count: usize,
}

impl Pagination {
    pub fn new(word_count: usize, page_size: usize) -> Self {
        Self {
            page_size: page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
            word_count,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn page_count(&self) -> usize {
        self.word_count.div_ceil(self.page_size)
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    /// Page holding `word_index`. Indices past the end map to the last page.
    pub fn word_index_to_page(&self, word_index: usize) -> usize {
        let last_word = self.word_count.saturating_sub(1);
        word_index.min(last_word) / self.page_size
    }

    /// Half-open word range of `page`, or `None` when the page does not exist.
    pub fn page_to_word_range(&self, page: usize) -> Option<Range<usize>> {
        if page >= self.page_count() {
            return None;
        }
        let start = page * self.page_size;
        let end = (start + self.page_size).min(self.word_count);
        Some(start..end)
    }

    /// First word of `page` after clamping it to the existing pages.
    pub fn clamped_page_start(&self, page: usize) -> usize {
        let last_page = self.page_count().saturating_sub(1);
        page.min(last_page) * self.page_size
    }

    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.page_count()).filter_map(|page| self.page_to_word_range(page))
    }
}

/// Split `items` into `page_size` chunks; the last chunk may be shorter.
pub fn paginate<T>(items: &[T], page_size: usize) -> Vec<&[T]> {
    let pagination = Pagination::new(items.len(), page_size);
    pagination.ranges().map(|range| &items[range]).collect()
}
