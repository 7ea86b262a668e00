//! Word-stepping playback state machine.
//!
//! The scheduler owns the cursor over the playable token stream together with
//! the page and chapter it falls in. Every operation that moves the cursor
//! recomputes both before returning, so a `PlaybackState` snapshot is always
//! self-consistent. The scheduler also owns the single live cadence handle;
//! starting a cadence always cancels the previous one first.

use crate::cadence::{Cadence, CadenceHandle, CadenceTick};
use crate::config::FinishBehavior;
use crate::pagination::{DEFAULT_PAGE_SIZE, Pagination};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};
use ts_rs::TS;

/// Slowest accepted reading rate.
pub const MIN_WPM: u32 = 1;
/// Fastest accepted reading rate.
pub const MAX_WPM: u32 = 2000;
/// Shortest tick interval, whatever the rate.
pub const MIN_TICK_MS: u64 = 10;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RunState {
    /// Nothing to read.
    #[default]
    Idle,
    Paused,
    Running,
    /// The cursor reached the last word and the cadence stopped.
    Finished,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[ts(export)]
pub struct PlaybackState {
    pub current_word_index: usize,
    pub current_page_index: usize,
    pub current_chapter_index: usize,
    pub rate_wpm: u32,
    pub run_state: RunState,
}

/// Clamp a requested rate into `[MIN_WPM, MAX_WPM]`.
pub fn clamp_wpm(wpm: i64) -> u32 {
    wpm.clamp(i64::from(MIN_WPM), i64::from(MAX_WPM)) as u32
}

/// Time between two words at `wpm`.
pub fn tick_interval(wpm: u32) -> Duration {
    let wpm = wpm.clamp(MIN_WPM, MAX_WPM);
    let millis = (60_000.0 / f64::from(wpm)).round() as u64;
    Duration::from_millis(millis.max(MIN_TICK_MS))
}

/// Word, page and chapter layout of the playable stream.
///
/// Chapter starts are relative to the playable stream and sorted; the first
/// chapter always starts at zero. Chapters that begin before the playable
/// stream share start zero and keep their own index, so the last of them owns
/// the opening words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionMap {
    pagination: Pagination,
    chapter_starts: Vec<usize>,
}

impl Default for PositionMap {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE, Vec::new())
    }
}

impl PositionMap {
    pub fn new(word_count: usize, page_size: usize, mut chapter_starts: Vec<usize>) -> Self {
        chapter_starts.sort_unstable();
        if chapter_starts.first() != Some(&0) {
            chapter_starts.insert(0, 0);
        }
        Self {
            pagination: Pagination::new(word_count, page_size),
            chapter_starts,
        }
    }

    pub fn word_count(&self) -> usize {
        self.pagination.word_count()
    }

    pub fn page_count(&self) -> usize {
        self.pagination.page_count()
    }

    pub fn chapter_count(&self) -> usize {
        self.chapter_starts.len()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn page_of(&self, word_index: usize) -> usize {
        self.pagination.word_index_to_page(word_index)
    }

    pub fn chapter_of(&self, word_index: usize) -> usize {
        self.chapter_starts
            .partition_point(|start| *start <= word_index)
            .saturating_sub(1)
    }

    fn last_word(&self) -> usize {
        self.word_count().saturating_sub(1)
    }

    fn page_start(&self, page: usize) -> usize {
        self.pagination.clamped_page_start(page)
    }

    fn chapter_start(&self, chapter: usize) -> usize {
        let last_chapter = self.chapter_starts.len().saturating_sub(1);
        self.chapter_starts[chapter.min(last_chapter)].min(self.last_word())
    }
}

pub struct PlaybackScheduler<C> {
    cadence: C,
    active: Option<CadenceHandle>,
    generation: u64,
    positions: PositionMap,
    state: PlaybackState,
    finish_behavior: FinishBehavior,
}

impl<C: Cadence> PlaybackScheduler<C> {
    pub fn new(cadence: C, wpm: u32, finish_behavior: FinishBehavior) -> Self {
        Self {
            cadence,
            active: None,
            generation: 0,
            positions: PositionMap::default(),
            state: PlaybackState {
                current_word_index: 0,
                current_page_index: 0,
                current_chapter_index: 0,
                rate_wpm: clamp_wpm(i64::from(wpm)),
                run_state: RunState::Idle,
            },
            finish_behavior,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn run_state(&self) -> RunState {
        self.state.run_state
    }

    pub fn positions(&self) -> &PositionMap {
        &self.positions
    }

    pub fn cadence(&self) -> &C {
        &self.cadence
    }

    pub fn tick_interval(&self) -> Duration {
        tick_interval(self.state.rate_wpm)
    }

    /// Generation of the live cadence, if one is running.
    pub fn active_generation(&self) -> Option<u64> {
        self.active.as_ref().map(CadenceHandle::generation)
    }

    /// Replace the layout and rewind. An empty layout leaves playback idle.
    pub fn load(&mut self, positions: PositionMap) {
        self.cancel_cadence();
        self.positions = positions;
        self.state.run_state = if self.positions.word_count() == 0 {
            RunState::Idle
        } else {
            RunState::Paused
        };
        self.move_to(0);
        info!(
            words = self.positions.word_count(),
            pages = self.positions.page_count(),
            chapters = self.positions.chapter_count(),
            state = ?self.state.run_state,
            "Loaded playback positions"
        );
    }

    /// Swap in a recomputed layout for the same, grown document.
    ///
    /// The cursor is kept when it is still in range and clamped otherwise.
    /// This never starts playback: the run state is kept, except that a
    /// finished scheduler with new words after the cursor becomes `Paused`.
    pub fn reindex(&mut self, positions: PositionMap) {
        let was_idle = self.state.run_state == RunState::Idle;
        self.positions = positions;

        if self.positions.word_count() == 0 {
            self.cancel_cadence();
            self.state.run_state = RunState::Idle;
            self.move_to(0);
        } else if was_idle {
            self.state.run_state = RunState::Paused;
            self.move_to(0);
        } else {
            let cursor = self.state.current_word_index.min(self.positions.last_word());
            self.move_to(cursor);
            if self.state.run_state == RunState::Finished && cursor < self.positions.last_word() {
                self.state.run_state = RunState::Paused;
            }
        }
        debug!(
            words = self.positions.word_count(),
            cursor = self.state.current_word_index,
            state = ?self.state.run_state,
            "Reindexed playback positions"
        );
    }

    pub fn start(&mut self) {
        match self.state.run_state {
            RunState::Idle | RunState::Running => return,
            RunState::Paused => {}
            RunState::Finished => match self.finish_behavior {
                FinishBehavior::Restart => self.move_to(0),
                FinishBehavior::Hold => {
                    debug!("Start ignored: playback finished and restart is disabled");
                    return;
                }
            },
        }
        self.state.run_state = RunState::Running;
        self.start_cadence();
        info!(
            word = self.state.current_word_index,
            wpm = self.state.rate_wpm,
            "Playback started"
        );
    }

    pub fn pause(&mut self) {
        if self.state.run_state != RunState::Running {
            return;
        }
        self.cancel_cadence();
        self.state.run_state = RunState::Paused;
        info!(word = self.state.current_word_index, "Playback paused");
    }

    pub fn toggle(&mut self) {
        if self.state.run_state == RunState::Running {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn step_forward(&mut self) {
        let target = self.state.current_word_index.saturating_add(1);
        self.jump(target, "step_forward");
    }

    pub fn step_backward(&mut self) {
        let target = self.state.current_word_index.saturating_sub(1);
        self.jump(target, "step_backward");
    }

    pub fn seek_page(&mut self, page: usize) {
        let target = self.positions.page_start(page);
        self.jump(target, "seek_page");
    }

    pub fn seek_chapter(&mut self, chapter: usize) {
        let target = self.positions.chapter_start(chapter);
        self.jump(target, "seek_chapter");
    }

    pub fn seek_word(&mut self, word_index: usize) {
        self.jump(word_index, "seek_word");
    }

    /// Change the rate. A running cadence is replaced; the cursor stays put.
    pub fn set_rate(&mut self, wpm: i64) {
        let rate = clamp_wpm(wpm);
        self.state.rate_wpm = rate;
        if self.state.run_state == RunState::Running {
            self.start_cadence();
        }
        info!(
            requested = wpm,
            wpm = rate,
            interval_ms = self.tick_interval().as_millis() as u64,
            "Playback rate changed"
        );
    }

    /// Advance on a cadence tick. Returns whether the tick was applied.
    pub fn on_tick(&mut self, tick: CadenceTick) -> bool {
        if self.state.run_state != RunState::Running
            || self.active_generation() != Some(tick.generation)
        {
            debug!(generation = tick.generation, "Ignoring stale cadence tick");
            return false;
        }

        if self.state.current_word_index >= self.positions.last_word() {
            self.cancel_cadence();
            self.state.run_state = RunState::Finished;
            info!(word = self.state.current_word_index, "Playback finished");
        } else {
            self.move_to(self.state.current_word_index + 1);
        }
        true
    }

    fn jump(&mut self, target: usize, action: &'static str) {
        if self.state.run_state == RunState::Idle {
            return;
        }
        self.cancel_cadence();
        self.state.run_state = RunState::Paused;
        self.move_to(target.min(self.positions.last_word()));
        debug!(
            action,
            word = self.state.current_word_index,
            page = self.state.current_page_index,
            chapter = self.state.current_chapter_index,
            "Playback cursor moved"
        );
    }

    fn move_to(&mut self, word_index: usize) {
        self.state.current_word_index = word_index;
        self.state.current_page_index = self.positions.page_of(word_index);
        self.state.current_chapter_index = self.positions.chapter_of(word_index);
    }

    fn start_cadence(&mut self) {
        self.cancel_cadence();
        self.generation = self.generation.wrapping_add(1);
        let handle = self.cadence.start(self.tick_interval(), self.generation);
        debug!(
            generation = handle.generation(),
            interval_ms = handle.interval().as_millis() as u64,
            "Cadence started"
        );
        self.active = Some(handle);
    }

    fn cancel_cadence(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.cancel();
            debug!(generation = handle.generation(), "Cadence cancelled");
        }
    }
}
