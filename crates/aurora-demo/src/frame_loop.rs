//! Fixed-timestep stepping for the headless demo.
//!
//! Frame times are supplied by the caller instead of measured, so a run is
//! reproducible for a given frame rate.

use tracing::warn;

/// Simulation step: 60 Hz.
pub const FIXED_DT: f32 = 1.0 / 60.0;

/// Longest frame accepted before clamping.
pub const MAX_FRAME_TIME: f32 = 0.25;

/// Accumulator turning variable frame times into fixed simulation steps.
#[derive(Debug, Default)]
pub struct FrameLoop {
    accumulator: f32,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame of `frame_time` seconds, calling `update_fn(FIXED_DT)`
    /// once per whole step it covers.
    pub fn tick(&mut self, frame_time: f32, mut update_fn: impl FnMut(f32)) {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;
        while self.accumulator >= FIXED_DT {
            update_fn(FIXED_DT);
            self.total_sim_time += f64::from(FIXED_DT);
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
        }
        self.frame_count += 1;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Simulated seconds so far.
    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}
