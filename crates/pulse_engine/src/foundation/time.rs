//! Frame timing and the smoothed frame-rate estimate

use std::time::Instant;

/// Upper bound applied to measured frame deltas, in seconds.
///
/// A hitch (debugger pause, window drag, suspended process) would otherwise
/// feed one huge step into simulation code that expects frame-sized
/// increments.
pub const MAX_DELTA_TIME: f32 = 0.25;

/// Measures wall-clock time between consecutive frames
pub struct FrameTimer {
    last_tick: Instant,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    /// Create a new timer anchored at the current instant
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    /// Seconds elapsed since the previous call, clamped to [`MAX_DELTA_TIME`]
    ///
    /// The first call measures from timer creation.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta.min(MAX_DELTA_TIME)
    }
}

/// Running frame-rate estimate fed by per-frame deltas
///
/// Frame times are folded into an exponentially weighted average so the
/// reported rate is stable enough for a title bar while still tracking
/// sustained changes. The whole-number rate is derived from the average on
/// every read rather than stored.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frame_count: u64,
    average_frame_time: Option<f32>,
}

impl FpsCounter {
    /// Blend weight given to the newest sample.
    const ALPHA: f32 = 1.0 / 100.0;

    /// Create a counter with no samples yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one frame's delta (in seconds) into the running average
    ///
    /// The first sample seeds the average directly; later samples blend in
    /// with weight [`Self::ALPHA`].
    pub fn sample(&mut self, delta_time: f32) {
        self.frame_count += 1;
        self.average_frame_time = Some(match self.average_frame_time {
            Some(average) => average * (1.0 - Self::ALPHA) + delta_time * Self::ALPHA,
            None => delta_time,
        });
    }

    /// Smoothed frames-per-second, truncated to a whole number
    ///
    /// Returns 0 until the first sample arrives, and 0 while the average
    /// frame time is zero.
    pub fn fps(&self) -> u32 {
        match self.average_frame_time {
            Some(average) if average > 0.0 => (1.0 / average) as u32,
            _ => 0,
        }
    }

    /// The smoothed frame time in seconds, if any samples have arrived
    pub fn average_frame_time(&self) -> Option<f32> {
        self.average_frame_time
    }

    /// Total number of samples folded in so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
