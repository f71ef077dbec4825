//! Anomaly conversions and Kepler equation solvers
//!
//! Elliptic orbits use the eccentric anomaly E (M = E - e sin E), hyperbolic
//! orbits the hyperbolic anomaly H (M = e sinh H - H). Both are inverted with
//! Newton-Raphson; when the iteration cap is hit the best estimate is returned

use std::f64::consts::{PI, TAU};

use tracing::warn;

/// Newton-Raphson stops once the correction is below this
pub const ANOMALY_TOLERANCE: f64 = 1e-6;

/// Hard cap so near-parabolic inputs still terminate
pub const MAX_ITERATIONS: usize = 100;

/// Normalize an angle into [0, 2π)
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

/// Wrap an angle into (-π, π]
pub fn wrap_angle(angle: f64) -> f64 {
    let a = normalize_angle(angle);
    if a > PI { a - TAU } else { a }
}

/// Eccentric anomaly from true anomaly (e < 1)
pub fn eccentric_from_true(nu: f64, e: f64) -> f64 {
    let half = nu / 2.0;
    2.0 * ((1.0 - e).sqrt() * half.sin()).atan2((1.0 + e).sqrt() * half.cos())
}

/// True anomaly from eccentric anomaly (e < 1)
pub fn true_from_eccentric(ea: f64, e: f64) -> f64 {
    let half = ea / 2.0;
    2.0 * ((1.0 + e).sqrt() * half.sin()).atan2((1.0 - e).sqrt() * half.cos())
}

/// Hyperbolic anomaly from true anomaly (e > 1). `nu` must lie inside the
/// asymptotes, |ν| < acos(-1/e)
pub fn hyperbolic_from_true(nu: f64, e: f64) -> f64 {
    let t = ((e - 1.0) / (e + 1.0)).sqrt() * (wrap_angle(nu) / 2.0).tan();
    2.0 * t.atanh()
}

/// True anomaly from hyperbolic anomaly (e > 1)
pub fn true_from_hyperbolic(ha: f64, e: f64) -> f64 {
    2.0 * (((e + 1.0) / (e - 1.0)).sqrt() * (ha / 2.0).tanh()).atan()
}

/// Solve M = E - e sin E for E
///
/// Works on M reduced into [0, 2π) and adds the whole revolutions back, so
/// the identity holds for any input M
pub fn solve_eccentric_anomaly(mean_anomaly: f64, e: f64) -> f64 {
    let m = normalize_angle(mean_anomaly);
    let revolutions = mean_anomaly - m;

    // Starting at π converges monotonically for any e < 1
    let mut ea = if e < 0.8 { m } else { PI };

    for _ in 0..MAX_ITERATIONS {
        let f = ea - e * ea.sin() - m;
        let df = 1.0 - e * ea.cos();
        let delta = f / df;
        if !delta.is_finite() {
            break;
        }
        ea -= delta;

        if delta.abs() < ANOMALY_TOLERANCE {
            return ea + revolutions;
        }
    }

    warn!(mean_anomaly, e, "eccentric anomaly did not converge, using best estimate");
    ea + revolutions
}

/// Solve M = e sinh H - H for H (e > 1)
pub fn solve_hyperbolic_anomaly(mean_anomaly: f64, e: f64) -> f64 {
    let m = mean_anomaly;
    let mut ha = (m / e).asinh();

    for _ in 0..MAX_ITERATIONS {
        let f = e * ha.sinh() - ha - m;
        let df = e * ha.cosh() - 1.0;
        let delta = f / df;
        if !delta.is_finite() {
            break;
        }
        ha -= delta;

        if delta.abs() < ANOMALY_TOLERANCE {
            return ha;
        }
    }

    warn!(mean_anomaly, e, "hyperbolic anomaly did not converge, using best estimate");
    ha
}
