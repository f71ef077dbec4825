//! Error types for kepsim.
//!
//! Only world construction can fail. Once a world exists every tick
//! succeeds: degenerate geometry, solver non-convergence and a missing
//! gravity source are absorbed by the propagator and logged.

use thiserror::Error;

/// Result type alias for scenario loading and world construction.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Rejected scenario configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Scenario file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Scenario file is not valid YAML for the expected schema.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Mass must be finite and strictly positive.
    #[error("body '{name}': mass must be finite and > 0, got {m}")]
    InvalidMass {
        /// Body name.
        name: String,
        /// Offending mass.
        m: f64,
    },

    /// Radius (or craft size) must be finite and non-negative.
    #[error("body '{name}': radius must be finite and >= 0, got {radius}")]
    InvalidRadius {
        /// Body name.
        name: String,
        /// Offending radius.
        radius: f64,
    },

    /// Vectors are `[x, y]`.
    #[error("'{field}' must have exactly 2 components, got {len}")]
    VectorLength {
        /// Field path, e.g. `bodies[1].v`.
        field: String,
        /// Number of components found.
        len: usize,
    },

    /// NaN or infinite value in an initial state.
    #[error("'{field}' must be finite")]
    NonFinite {
        /// Field path.
        field: String,
    },

    /// Out-of-range numeric parameter.
    #[error("parameter '{name}' = {value} is invalid: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
        /// What the value must satisfy.
        reason: &'static str,
    },

    /// Time-scale bounds are inconsistent.
    #[error("time scale bounds [{min}, {max}] must be positive and ordered")]
    TimeScaleBounds {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}

impl ConfigError {
    /// Shorthand for an invalid parameter.
    #[must_use]
    pub fn parameter(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter { name, value, reason }
    }
}
