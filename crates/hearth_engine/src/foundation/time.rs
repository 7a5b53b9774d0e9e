//! Frame timing
//!
//! [`Timer`] measures wall-clock time between frames. The delta handed to the
//! simulation is clamped so a long stall (debugger, window drag) does not
//! turn into one huge physics step.

use std::time::{Duration, Instant};

/// Longest frame delta reported by [`Timer::tick`], in seconds
pub const DEFAULT_MAX_DELTA: f32 = 0.25;

/// Wall-clock frame timer
#[derive(Debug, Clone)]
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: Duration,
    frame_count: u64,
    max_delta: f32,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Start timing now
    pub fn new() -> Self {
        Self::with_max_delta(DEFAULT_MAX_DELTA)
    }

    /// Start timing now with a custom delta clamp
    pub fn with_max_delta(max_delta: f32) -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: Duration::ZERO,
            frame_count: 0,
            max_delta,
        }
    }

    /// Mark the start of a frame and return the clamped delta in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.advance(now.duration_since(self.last_frame));
        self.last_frame = now;
        self.delta_time
    }

    fn advance(&mut self, elapsed: Duration) {
        self.total_time += elapsed;
        self.frame_count += 1;
        self.delta_time = elapsed.as_secs_f32().min(self.max_delta);
    }

    /// Clamped delta of the last frame
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Unclamped wall-clock time since the timer started
    pub fn total_time(&self) -> f32 {
        self.total_time.as_secs_f32()
    }

    /// Frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second averaged over the timer's lifetime
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        let seconds = self.total_time();
        if seconds > 0.0 {
            self.frame_count as f32 / seconds
        } else {
            0.0
        }
    }
}
