//! Physical constants and runtime limits for the simulation
//!
//! `Parameters` is built once from the scenario file and handed to the
//! `World`; nothing mutates it afterwards:
//! - gravitational constant `G`,
//! - per-tick clamp on the host clock delta,
//! - time-scale bounds and the cap applied while thrusting,
//! - booster acceleration

#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct Parameters {
    pub G: f64, // gravitational constant
    pub max_dt: f64, // clamp on the real-time delta per tick
    pub time_scale: f64, // initial time multiplier
    pub min_time_scale: f64, // lower bound of the multiplier
    pub max_time_scale: f64, // upper bound of the multiplier
    pub max_thrust_time_scale: f64, // multiplier cap while any craft thrusts
    pub booster_force: f64, // thrust acceleration magnitude
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            G: 6.6743e-11,
            max_dt: 0.1,
            time_scale: 1.0,
            min_time_scale: 1.0,
            max_time_scale: 1.0e7,
            max_thrust_time_scale: 1000.0,
            booster_force: 5.0,
        }
    }
}
