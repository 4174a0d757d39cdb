//! Time management utilities
//!
//! The simulation advances in fixed ticks while rendering runs at whatever
//! rate the host manages. [`FixedTimestep`] converts variable frame deltas
//! into a whole number of ticks.

use std::time::Instant;

/// Wall-clock frame timer
#[derive(Debug, Clone)]
pub struct Timer {
    started: Instant,
    last_frame: Instant,
    frames: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Start timing now
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_frame: now,
            frames: 0,
        }
    }

    /// Mark the start of a frame and return seconds since the previous one
    pub fn frame(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frames += 1;
        delta
    }

    /// Seconds since the timer was created
    pub fn elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// Frames marked so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Accumulator turning variable frame time into fixed simulation ticks
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    max_ticks_per_frame: u32,
}

impl FixedTimestep {
    /// Create a fixed step running at `ticks_per_second`
    ///
    /// At most `max_ticks_per_frame` ticks are produced per frame; a long stall
    /// drops the excess instead of spiralling.
    pub fn new(ticks_per_second: f32, max_ticks_per_frame: u32) -> Self {
        Self {
            step: 1.0 / ticks_per_second.max(f32::EPSILON),
            accumulator: 0.0,
            max_ticks_per_frame: max_ticks_per_frame.max(1),
        }
    }

    /// Length of one tick in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed a frame delta and return how many ticks to run this frame
    pub fn advance(&mut self, delta_time: f32) -> u32 {
        self.accumulator += delta_time.max(0.0);
        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_ticks_per_frame {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if ticks == self.max_ticks_per_frame && self.accumulator >= self.step {
            log::warn!("Simulation fell behind, dropping {:.3}s", self.accumulator);
            self.accumulator %= self.step;
        }
        ticks
    }
}
