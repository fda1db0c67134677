//! Frame timing

use std::time::Instant;

/// Weight of the newest sample in the smoothed frame rate.
const FPS_SMOOTHING: f32 = 0.1;

/// Monotonic frame clock.
///
/// The first [`tick`](Self::tick) measures from construction.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { last: start }
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Like [`tick`](Self::tick) with an explicit timestamp. Timestamps
    /// earlier than the previous one count as zero elapsed time.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let delta = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now.max(self.last);
        delta
    }
}

/// Running frame statistics shown in the overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    frame_count: u64,
    elapsed: f32,
    last_delta: f32,
    smoothed_fps: f32,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, delta_time: f32) {
        self.frame_count += 1;
        self.elapsed += delta_time;
        self.last_delta = delta_time;

        if delta_time > 0.0 {
            let fps = 1.0 / delta_time;
            self.smoothed_fps = if self.smoothed_fps == 0.0 {
                fps
            } else {
                self.smoothed_fps + (fps - self.smoothed_fps) * FPS_SMOOTHING
            };
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Total seconds across recorded frames
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Last frame time in milliseconds
    pub fn frame_time_ms(&self) -> f32 {
        self.last_delta * 1000.0
    }

    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}
