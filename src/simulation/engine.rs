//! Runtime clock of the world
//!
//! Turns the host's frame delta into a simulation step: clamp to
//! `max_dt`, then scale by the user-controlled multiplier

use super::params::Parameters;

#[derive(Debug, Clone)]
pub struct Engine {
    pub t: f64, // simulation time
    time_scale: f64, // sim seconds per real second
}

impl Engine {
    pub fn new(params: &Parameters) -> Self {
        Self {
            t: 0.0,
            time_scale: params
                .time_scale
                .clamp(params.min_time_scale, params.max_time_scale),
        }
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Simulation step for a host delta of `real_dt` seconds.
    /// A stalled host clock is clamped so one tick never jumps too far.
    pub fn scaled_dt(&self, real_dt: f64, params: &Parameters) -> f64 {
        if !real_dt.is_finite() {
            return 0.0;
        }
        real_dt.clamp(0.0, params.max_dt) * self.time_scale
    }

    /// Multiply the time scale by 10^steps, kept within the configured bounds.
    pub fn scale_time(&mut self, steps: i32, params: &Parameters) {
        self.set_time_scale(self.time_scale * 10f64.powi(steps), params);
    }

    pub fn set_time_scale(&mut self, time_scale: f64, params: &Parameters) {
        self.time_scale = time_scale.clamp(params.min_time_scale, params.max_time_scale);
    }

    /// Keep the multiplier at or below `cap` (used while thrusting).
    pub fn cap_time_scale(&mut self, cap: f64) {
        if self.time_scale > cap {
            self.time_scale = cap;
        }
    }
}
