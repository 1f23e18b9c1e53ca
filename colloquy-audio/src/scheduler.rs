//! Gapless playback scheduling for decoded audio buffers.
//!
//! Inbound buffers arrive asynchronously with variable decode latency, but
//! must play back-to-back in arrival order. The scheduler keeps a cursor of
//! the next free slot on the output timeline and hands each buffer to the
//! sink with an explicit start time.

use crate::pcm::AudioBuffer;
use std::time::{Duration, Instant};

/// Identifier of one scheduled buffer, unique within a scheduler.
pub type PlaybackId = u64;

/// A monotonic clock over the output device's timeline.
pub trait OutputClock {
    /// Current time since the clock's origin.
    fn now(&self) -> Duration;
}

/// Wall-clock implementation backed by [`Instant`].
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock whose origin is now.
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputClock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Destination for scheduled buffers.
///
/// Implementations must accept `begin` calls for overlapping-free,
/// time-ordered buffers and tolerate `cancel`/`shutdown` for ids that have
/// already finished — the scheduler's active set is advisory, the sink's
/// own bookkeeping is authoritative for what is still audible.
pub trait PlaybackSink {
    /// Commit a buffer to begin playing at `at` on the sink's clock.
    fn begin(&mut self, id: PlaybackId, buffer: AudioBuffer, at: Duration);

    /// Stop a buffer immediately, whether or not it started playing.
    fn cancel(&mut self, id: PlaybackId);

    /// Release the output device. Called once per session teardown; a
    /// second call must be a no-op.
    fn shutdown(&mut self) {}
}

/// One in-flight buffer committed to the output device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledPlayback {
    /// Sink-facing identifier.
    pub id: PlaybackId,
    /// Committed start time on the output clock.
    pub start: Duration,
    /// Length of the buffer.
    pub duration: Duration,
}

impl ScheduledPlayback {
    fn ends_by(&self, now: Duration) -> bool {
        self.start + self.duration <= now
    }
}

/// Schedules decoded buffers for gapless, ordered, non-overlapping playback.
pub struct PlaybackScheduler<S, C> {
    sink: S,
    clock: C,
    next_start: Duration,
    next_id: PlaybackId,
    active: Vec<ScheduledPlayback>,
}

impl<S: PlaybackSink, C: OutputClock> PlaybackScheduler<S, C> {
    /// Create a scheduler whose cursor starts at the clock's current time.
    pub fn new(sink: S, clock: C) -> Self {
        let next_start = clock.now();
        Self { sink, clock, next_start, next_id: 0, active: Vec::new() }
    }

    /// Schedule a buffer directly after the previously scheduled one.
    ///
    /// If decode latency pushed the natural sequential start into the past,
    /// the start is pulled up to the clock's current time instead of
    /// scheduling into the past.
    pub fn schedule(&mut self, buffer: AudioBuffer) -> PlaybackId {
        self.reap_finished();

        let now = self.clock.now();
        let start = self.next_start.max(now);
        let duration = buffer.duration();

        let id = self.next_id;
        self.next_id += 1;

        self.sink.begin(id, buffer, start);
        self.next_start = start + duration;
        self.active.push(ScheduledPlayback { id, start, duration });

        tracing::debug!(id, ?start, ?duration, "Scheduled playback buffer");
        id
    }

    /// Remove a buffer whose playback ended naturally.
    pub fn on_ended(&mut self, id: PlaybackId) {
        self.active.retain(|p| p.id != id);
    }

    /// Drop active-set entries whose playback window has fully elapsed.
    pub fn reap_finished(&mut self) {
        let now = self.clock.now();
        self.active.retain(|p| !p.ends_by(now));
    }

    /// Cut all in-flight playback and resume scheduling from "now".
    ///
    /// Subsequent buffers start at the clock's current time — an audible
    /// but clean cut rather than playing over stale audio.
    pub fn interrupt(&mut self) {
        let stopped = self.active.len();
        for playback in self.active.drain(..) {
            self.sink.cancel(playback.id);
        }
        self.next_start = self.clock.now();
        if stopped > 0 {
            tracing::info!(stopped, "Interrupted in-flight playback");
        }
    }

    /// Stop everything and release the output device.
    pub fn shutdown(&mut self) {
        self.interrupt();
        self.sink.shutdown();
    }

    /// Currently scheduled, not-yet-finished buffers.
    pub fn active(&self) -> &[ScheduledPlayback] {
        &self.active
    }

    /// The cursor where the next buffer will be placed (or later, if the
    /// clock has already passed it).
    pub fn next_start(&self) -> Duration {
        self.next_start
    }
}
