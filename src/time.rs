// Frame timing for the host loop.
//
// The simulation itself only ever sees a `delta_time`. Where it comes from, a real clock or a
// fixed debug step, is decided here.

use std::time::{Duration, Instant};

use crate::config::TimingConfig;

// Produces the per-frame delta time.
#[derive(Debug)]
pub struct FrameClock {
    last_frame: Instant,
    use_fixed_delta: bool,
    fixed_delta: f32,
    frame_count: u64,
}

impl FrameClock {
    pub fn new(use_fixed_delta: bool, fixed_delta: f32) -> Self {
        FrameClock {
            last_frame: Instant::now(),
            use_fixed_delta,
            fixed_delta,
            frame_count: 0,
        }
    }

    pub fn from_config(timing: &TimingConfig) -> Self {
        Self::new(timing.use_fixed_delta, timing.fixed_delta)
    }

    // Advance to the next frame and return its delta in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let real_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        if self.use_fixed_delta {
            self.fixed_delta
        } else {
            real_delta
        }
    }

    // Switch between the real clock and the fixed debug step.
    pub fn toggle_fixed_delta(&mut self) -> bool {
        self.use_fixed_delta = !self.use_fixed_delta;
        self.use_fixed_delta
    }

    pub fn uses_fixed_delta(&self) -> bool {
        self.use_fixed_delta
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

// Target frame rate plus the vsync interval that approximates it on the display.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FramePacing {
    pub target_frame_rate: u32,
    pub vsync_count: u32,
}

impl FramePacing {
    pub fn new(refresh_rate: u32, target_frame_rate: u32) -> Self {
        let target_frame_rate = target_frame_rate.max(1);

        FramePacing {
            target_frame_rate,
            vsync_count: (refresh_rate / target_frame_rate).max(1),
        }
    }

    pub fn from_config(timing: &TimingConfig) -> Self {
        Self::new(timing.refresh_rate, timing.target_frame_rate)
    }

    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_frame_rate as f64)
    }

    // How long to sleep after a frame that took `elapsed`.
    pub fn remaining(&self, elapsed: Duration) -> Duration {
        self.frame_budget().saturating_sub(elapsed)
    }
}
