use crate::cadence::{Cadence, CadenceTick};
use crate::chapters::Chapter;
use crate::config::EngineConfig;
use crate::document::Document;
use crate::graph::KeywordGraph;
use crate::keywords::Keyword;
use crate::normalizer::{Token, WordEmphasis, emphasize};
use crate::playback::{PlaybackScheduler, PlaybackState, RunState};
use crate::summary::Summary;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ReadingMode {
    #[default]
    Book,
    Speed,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct CurrentWord {
    pub token: Token,
    pub emphasis: WordEmphasis,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ReaderSnapshot {
    pub mode: ReadingMode,
    pub playback: PlaybackState,
    pub current_word: Option<CurrentWord>,
    pub page_tokens: Vec<String>,
    pub total_pages: usize,
    pub word_count: usize,
    /// One-based position for display; zero when there are no words.
    pub word_position: usize,
    pub progress_pct: f64,
    pub chapters: Vec<Chapter>,
    pub active_chapter: Option<usize>,
    pub active_paragraph: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum SessionCommand {
    GetSnapshot,
    LoadFragments { fragments: Vec<String> },
    AppendFragments { fragments: Vec<String> },
    SetMode { mode: ReadingMode },
    Play,
    Pause,
    TogglePlayPause,
    StepForward,
    StepBackward,
    NextPage,
    PrevPage,
    SeekPage { page: usize },
    SeekChapter { chapter: usize },
    SetRate { wpm: i64 },
}

impl SessionCommand {
    pub fn action(&self) -> &'static str {
        match self {
            Self::GetSnapshot => "reader_get_snapshot",
            Self::LoadFragments { .. } => "reader_load_fragments",
            Self::AppendFragments { .. } => "reader_append_fragments",
            Self::SetMode { .. } => "reader_set_mode",
            Self::Play => "reader_play",
            Self::Pause => "reader_pause",
            Self::TogglePlayPause => "reader_toggle_play_pause",
            Self::StepForward => "reader_step_forward",
            Self::StepBackward => "reader_step_backward",
            Self::NextPage => "reader_next_page",
            Self::PrevPage => "reader_prev_page",
            Self::SeekPage { .. } => "reader_seek_page",
            Self::SeekChapter { .. } => "reader_seek_chapter",
            Self::SetRate { .. } => "reader_set_rate",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionEvent {
    pub action: &'static str,
    pub snapshot: ReaderSnapshot,
}

/// One open book: its fragments, the derived document, playback and the
/// reading mode.
pub struct ReaderSession<C> {
    config: EngineConfig,
    fragments: Vec<String>,
    document: Document,
    playback: PlaybackScheduler<C>,
    mode: ReadingMode,
}

impl<C: Cadence> ReaderSession<C> {
    pub fn new(config: EngineConfig, cadence: C) -> Self {
        let config = config.sanitized();
        let playback = PlaybackScheduler::new(cadence, config.wpm, config.finish_behavior);
        Self {
            document: Document::empty(&config),
            fragments: Vec::new(),
            playback,
            mode: ReadingMode::default(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn playback(&self) -> &PlaybackScheduler<C> {
        &self.playback
    }

    pub fn mode(&self) -> ReadingMode {
        self.mode
    }

    /// Replace the book. Playback stops and rewinds.
    pub fn load_fragments(&mut self, fragments: Vec<String>) {
        self.fragments = fragments;
        self.document = Document::build(&self.fragments, &self.config);
        self.playback.load(self.document.position_map());
        info!(
            fragments = self.fragments.len(),
            words = self.document.playable_len(),
            "Loaded new book"
        );
    }

    /// Add a batch of fragments to the current book and rebuild everything
    /// derived from it. The cursor and run state are kept, and so is the
    /// preface anchor once the book has playable words.
    pub fn append_fragments(&mut self, fragments: Vec<String>) {
        if fragments.is_empty() {
            return;
        }
        let added = fragments.len();
        self.fragments.extend(fragments);
        // Once there is something to read the anchor stays put, so the cursor
        // keeps naming the same word.
        let reading_start = (!self.document.is_empty()).then(|| self.document.reading_start());
        self.document =
            Document::build_with_reading_start(&self.fragments, &self.config, reading_start);
        self.playback.reindex(self.document.position_map());
        info!(
            added,
            fragments = self.fragments.len(),
            words = self.document.playable_len(),
            "Appended fragment batch"
        );
    }

    pub fn set_mode(&mut self, mode: ReadingMode) {
        if mode == self.mode {
            return;
        }
        if mode == ReadingMode::Book {
            self.playback.pause();
        }
        self.mode = mode;
        info!(?mode, "Reading mode changed");
    }

    /// Start playback, switching to speed reading first when needed.
    pub fn play(&mut self) {
        self.set_mode(ReadingMode::Speed);
        self.playback.start();
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    pub fn toggle_play_pause(&mut self) {
        if self.playback.run_state() != RunState::Running {
            self.set_mode(ReadingMode::Speed);
        }
        self.playback.toggle();
    }

    pub fn step_forward(&mut self) {
        self.playback.step_forward();
    }

    pub fn step_backward(&mut self) {
        self.playback.step_backward();
    }

    pub fn next_page(&mut self) {
        let page = self.playback.state().current_page_index;
        if page + 1 < self.document.page_count() {
            self.playback.seek_page(page + 1);
        }
    }

    pub fn prev_page(&mut self) {
        let page = self.playback.state().current_page_index;
        if page > 0 {
            self.playback.seek_page(page - 1);
        }
    }

    pub fn seek_page(&mut self, page: usize) {
        self.playback.seek_page(page);
    }

    pub fn seek_chapter(&mut self, chapter: usize) {
        self.playback.seek_chapter(chapter);
    }

    pub fn set_rate(&mut self, wpm: i64) {
        self.playback.set_rate(wpm);
    }

    /// Feed a cadence tick. Returns whether the cursor state changed.
    pub fn on_tick(&mut self, tick: CadenceTick) -> bool {
        self.playback.on_tick(tick)
    }

    pub fn chapter_keywords(&self, chapter: usize) -> &[Keyword] {
        &self.document.analysis(chapter).keywords
    }

    pub fn chapter_summary(&self, chapter: usize) -> &Summary {
        &self.document.analysis(chapter).summary
    }

    pub fn chapter_graph(&self, chapter: usize) -> &KeywordGraph {
        &self.document.analysis(chapter).graph
    }

    pub fn snapshot(&self) -> ReaderSnapshot {
        let playback = self.playback.state();
        let word_count = self.document.playable_len();
        let has_words = word_count > 0;
        let current_word = self
            .document
            .token_at(playback.current_word_index)
            .map(|token| CurrentWord {
                emphasis: emphasize(&token.text),
                token: token.clone(),
            });
        let word_position = if has_words {
            playback.current_word_index + 1
        } else {
            0
        };
        let progress_pct = if has_words {
            let pct = word_position as f64 / word_count as f64 * 100.0;
            (pct * 1000.0).round() / 1000.0
        } else {
            0.0
        };

        ReaderSnapshot {
            mode: self.mode,
            playback,
            current_word,
            page_tokens: self
                .document
                .page(playback.current_page_index)
                .iter()
                .map(|token| token.raw.clone())
                .collect(),
            total_pages: self.document.page_count(),
            word_count,
            word_position,
            progress_pct,
            chapters: self.document.chapters().to_vec(),
            active_chapter: has_words.then_some(playback.current_chapter_index),
            active_paragraph: has_words
                .then(|| {
                    self.document
                        .paragraph_at(self.document.reading_start() + playback.current_word_index)
                })
                .flatten(),
        }
    }

    pub fn apply_command(&mut self, command: SessionCommand) -> SessionEvent {
        let action = command.action();
        debug!(action, "Applying session command");
        match command {
            SessionCommand::GetSnapshot => {}
            SessionCommand::LoadFragments { fragments } => self.load_fragments(fragments),
            SessionCommand::AppendFragments { fragments } => self.append_fragments(fragments),
            SessionCommand::SetMode { mode } => self.set_mode(mode),
            SessionCommand::Play => self.play(),
            SessionCommand::Pause => self.pause(),
            SessionCommand::TogglePlayPause => self.toggle_play_pause(),
            SessionCommand::StepForward => self.step_forward(),
            SessionCommand::StepBackward => self.step_backward(),
            SessionCommand::NextPage => self.next_page(),
            SessionCommand::PrevPage => self.prev_page(),
            SessionCommand::SeekPage { page } => self.seek_page(page),
            SessionCommand::SeekChapter { chapter } => self.seek_chapter(chapter),
            SessionCommand::SetRate { wpm } => self.set_rate(wpm),
        }
        SessionEvent {
            action,
            snapshot: self.snapshot(),
        }
    }
}
