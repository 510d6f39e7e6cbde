//! Monotonic frame clock producing per-frame elapsed/delta pairs.

use web_time::{Duration, Instant};

/// Elapsed/delta pair handed to the scene each frame, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock started (monotonic).
    pub elapsed: f32,
    /// Seconds since the previous tick (non-negative, clamped).
    pub delta: f32,
}

/// Frame clock that turns a monotonic [`Instant`] into [`FrameTime`]s.
///
/// Deltas are clamped to `max_delta` so a stalled tab or a debugger pause
/// does not fling every family to its target in one step.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    max_delta: Duration,
}

impl FrameClock {
    /// Default upper bound on a single frame delta.
    pub const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(250);

    /// Clock starting now with the default delta clamp.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::now(), Self::DEFAULT_MAX_DELTA)
    }

    /// Clock starting at `start` with a custom delta clamp.
    #[must_use]
    pub fn starting_at(start: Instant, max_delta: Duration) -> Self {
        Self {
            start,
            last_frame: start,
            max_delta,
        }
    }

    /// Advance to the current instant.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advance to `now`. Instants earlier than the last tick give a zero
    /// delta.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let raw = now.saturating_duration_since(self.last_frame);
        if now > self.last_frame {
            self.last_frame = now;
        }

        FrameTime {
            elapsed: self.last_frame.duration_since(self.start).as_secs_f32(),
            delta: raw.min(self.max_delta).as_secs_f32(),
        }
    }

    /// Upper bound on a single delta.
    #[must_use]
    pub fn max_delta(&self) -> Duration {
        self.max_delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
