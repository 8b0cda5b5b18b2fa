//! Frame timing for the host loop.
//!
//! The swarm only ever sees one number per tick: seconds since the previous
//! tick, clamped to a maximum so a stalled frame does not turn into one huge
//! jump. [`FrameClock`] produces that number from wall-clock time.
//!
//! # Example
//!
//! ```ignore
//! use handswarm::time::FrameClock;
//!
//! let mut clock = FrameClock::new(0.05);
//!
//! // In your render loop:
//! let dt = clock.tick();
//! swarm.tick(&signals, dt);
//! log::trace!("frame {} at {:.1} fps", clock.frame(), clock.fps());
//! ```

use std::time::{Duration, Instant};

/// Default upper bound on a single step, in seconds.
pub const DEFAULT_MAX_DELTA: f32 = 0.05;

/// Clamp an elapsed time into `[0, max_delta]`. Non-finite input reads as 0.
#[inline]
pub fn clamp_delta(elapsed: f32, max_delta: f32) -> f32 {
    if elapsed.is_finite() {
        elapsed.clamp(0.0, max_delta.max(0.0))
    } else {
        0.0
    }
}

/// Wall-clock frame timer producing clamped step sizes.
#[derive(Debug)]
pub struct FrameClock {
    /// When the last frame occurred.
    last_frame: Instant,
    /// Clamped time since the last frame, in seconds.
    delta_secs: f32,
    /// Largest delta ever reported.
    max_delta: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
    /// Whether time is paused.
    paused: bool,
    /// Fixed delta time for deterministic runs (optional).
    fixed_delta: Option<f32>,
}

impl FrameClock {
    /// Create a clock starting now, reporting at most `max_delta` per frame.
    pub fn new(max_delta: f32) -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta_secs: 0.0,
            max_delta,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            fixed_delta: None,
        }
    }

    /// Advance one frame and return the clamped step in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if self.paused {
            self.delta_secs = 0.0;
            return 0.0;
        }

        self.delta_secs = clamp_delta(self.fixed_delta.unwrap_or(raw), self.max_delta);
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// Step reported by the last [`tick`](Self::tick).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    /// Total frames since start, not counting paused ticks.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop time. While paused every tick reports 0.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.last_frame = Instant::now();
            self.paused = false;
        }
    }

    /// Report a fixed step instead of wall-clock time. The step is still
    /// clamped. Pass `None` to go back to real timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DELTA)
    }
}
