//! Speed-reading engine: turns extracted book text into tokens, pages,
//! chapters, keyword graphs and summaries, and drives a word-by-word cursor
//! at a configurable rate.

pub mod cadence;
pub mod chapters;
pub mod config;
pub mod document;
pub mod graph;
pub mod ingest;
pub mod keywords;
pub mod normalizer;
pub mod pagination;
pub mod playback;
pub mod session;
pub mod summary;
pub mod text_utils;
