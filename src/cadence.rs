//! Repeating tick sources for playback.
//!
//! A cadence is started with an interval and a generation number and keeps
//! emitting `CadenceTick`s until its handle is cancelled or dropped. The
//! scheduler owns the only live handle and ignores ticks whose generation is
//! not the current one, so a cancelled timer can never move the cursor.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::Sender,
};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// One beat of a cadence, stamped with the generation that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CadenceTick {
    pub generation: u64,
}

/// Ownership of a running cadence. Cancelling is idempotent and dropping the
/// handle cancels it.
#[derive(Debug)]
pub struct CadenceHandle {
    generation: u64,
    interval: Duration,
    cancelled: Arc<AtomicBool>,
}

impl CadenceHandle {
    pub fn new(generation: u64, interval: Duration) -> Self {
        Self {
            generation,
            interval,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Shared flag for the tick source backing this handle.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }
}

impl Drop for CadenceHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Something that can start a repeating tick source.
pub trait Cadence {
    fn start(&mut self, interval: Duration, generation: u64) -> CadenceHandle;
}

/// Tick source backed by a sleeping thread that sends ticks over a channel.
///
/// The receiving side belongs to whoever owns the scheduler and feeds each
/// tick back through `PlaybackScheduler::on_tick`.
#[derive(Debug, Clone)]
pub struct ThreadCadence {
    ticks: Sender<CadenceTick>,
}

impl ThreadCadence {
    pub fn new(ticks: Sender<CadenceTick>) -> Self {
        Self { ticks }
    }
}

impl Cadence for ThreadCadence {
    fn start(&mut self, interval: Duration, generation: u64) -> CadenceHandle {
        let handle = CadenceHandle::new(generation, interval);
        let cancelled = handle.cancel_flag();
        let ticks = self.ticks.clone();

        thread::spawn(move || {
            let mut deadline = Instant::now() + interval;
            loop {
                thread::sleep(deadline.saturating_duration_since(Instant::now()));
                if cancelled.load(Ordering::Acquire) {
                    break;
                }
                if ticks.send(CadenceTick { generation }).is_err() {
                    break;
                }
                trace!(generation, "Cadence tick sent");
                deadline += interval;
            }
            debug!(generation, "Cadence thread stopped");
        });

        handle
    }
}

/// Tick source for hosts that drive time themselves (a UI frame loop, tests).
///
/// It only records what was started; the host delivers ticks by calling
/// `on_tick` with the generation reported by the scheduler.
#[derive(Debug, Default)]
pub struct ManualCadence {
    started: Vec<Duration>,
    flags: Vec<Arc<AtomicBool>>,
}

impl ManualCadence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intervals of every cadence started so far, oldest first.
    pub fn started_intervals(&self) -> &[Duration] {
        &self.started
    }

    /// Number of started cadences that have not been cancelled.
    pub fn live_count(&self) -> usize {
        self.flags
            .iter()
            .filter(|flag| !flag.load(Ordering::Acquire))
            .count()
    }
}

impl Cadence for ManualCadence {
    fn start(&mut self, interval: Duration, generation: u64) -> CadenceHandle {
        let handle = CadenceHandle::new(generation, interval);
        self.started.push(interval);
        self.flags.push(handle.cancel_flag());
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn dropping_a_handle_cancels_it() {
        let mut cadence = ManualCadence::new();
        let handle = cadence.start(Duration::from_millis(200), 1);
        assert_eq!(cadence.live_count(), 1);
        drop(handle);
        assert_eq!(cadence.live_count(), 0);
        assert_eq!(cadence.started_intervals(), &[Duration::from_millis(200)]);
    }

    #[test]
    fn thread_cadence_stops_after_cancel() {
        let (tx, rx) = mpsc::channel();
        let mut cadence = ThreadCadence::new(tx);
        let handle = cadence.start(Duration::from_millis(5), 7);

        let first = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("cadence should tick");
        assert_eq!(first.generation, 7);

        handle.cancel();
        thread::sleep(Duration::from_millis(30));
        while rx.try_recv().is_ok() {}
        thread::sleep(Duration::from_millis(30));
        assert!(rx.try_recv().is_err());
    }
}
