//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`ParametersConfig`] – physical constants, clock clamp and time-scale limits
//! - [`BodyConfig`]       – initial state of each massive body (gravity source)
//! - [`SpacecraftConfig`] – initial state of the default spacecraft
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! The bundled Earth–Moon scenario, in the shape these types expect:
//!
//! ```yaml
//! parameters:
//!   G: 6.6743e-11               # gravitational constant
//!   max_dt: 0.1                 # clamp on the host clock delta per tick (s)
//!   time_scale: 1.0             # initial multiplier
//!   min_time_scale: 1.0
//!   max_time_scale: 1.0e7
//!   max_thrust_time_scale: 1000.0
//!   booster_force: 5.0          # thrust acceleration (m/s^2)
//!
//! bodies:                       # updated in this order every tick
//!   - name: earth
//!     x: [ 0.0, 0.0 ]
//!     v: [ 0.0, 0.0 ]
//!     m: 5.97219e24
//!     radius: 6371000.0
//!     fixed: true
//!   - name: moon
//!     x: [ -384399000.0, 0.0 ]
//!     v: [ 0.0, -1022.0 ]
//!     m: 7.34767309e22
//!     radius: 1737400.0
//!
//! spacecraft:
//!   x: [ 16371000.0, 0.0 ]
//!   v: [ 0.0, 5000.0 ]
//!   m: 1000.0
//!   size: 5.0
//! ```
//!
//! The scenario builder maps this into the runtime `World`, validating it on
//! the way.

use serde::Deserialize;

/// Global physical and numerical parameters for a scenario
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub G: f64, // gravitational constant
    pub max_dt: f64, // largest host delta accepted per tick, guards against a stalled clock
    #[serde(default = "default_time_scale")]
    pub time_scale: f64, // initial time multiplier
    #[serde(default = "default_min_time_scale")]
    pub min_time_scale: f64,
    #[serde(default = "default_max_time_scale")]
    pub max_time_scale: f64,
    #[serde(default = "default_max_thrust_time_scale")]
    pub max_thrust_time_scale: f64, // the multiplier is capped here while a booster fires
    #[serde(default = "default_booster_force")]
    pub booster_force: f64, // thrust acceleration magnitude
}

fn default_time_scale() -> f64 {
    1.0
}

fn default_min_time_scale() -> f64 {
    1.0
}

fn default_max_time_scale() -> f64 {
    1.0e7
}

fn default_max_thrust_time_scale() -> f64 {
    1000.0
}

fn default_booster_force() -> f64 {
    5.0
}

/// Configuration for a single massive body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    #[serde(default)]
    pub name: Option<String>, // used in logs and errors, defaults to `body<i>`
    pub x: Vec<f64>, // initial position [x, y] (m)
    pub v: Vec<f64>, // initial velocity [x, y] (m/s)
    pub m: f64, // mass (kg)
    pub radius: f64, // surface radius (m), collision boundary
    #[serde(default)]
    pub fixed: bool, // `true` - held in place, never integrated
}

/// Initial state of the default spacecraft
#[derive(Deserialize, Debug, Clone)]
pub struct SpacecraftConfig {
    pub x: Vec<f64>, // initial position [x, y] (m)
    pub v: Vec<f64>, // initial velocity [x, y] (m/s)
    #[serde(default = "default_craft_mass")]
    pub m: f64, // mass (kg), informational
    pub size: f64, // collision radius (m)
}

fn default_craft_mass() -> f64 {
    1000.0
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub parameters: ParametersConfig, // Physical constants and clock limits
    pub bodies: Vec<BodyConfig>, // Gravity sources, in update order
    #[serde(default)]
    pub spacecraft: Option<SpacecraftConfig>, // Default spacecraft, spawned at start
}
