//! Keplerian conic of one body around one gravity source
//!
//! An [`OrbitalPos`] holds the orbital elements (e, a, ω, ν, direction) of a
//! body relative to its source and caches everything derived from them:
//! absolute and relative state vectors, the orbit center and the apsides.
//! Every mutation recomputes the cache, so outputs are never stale.
//!
//! Elliptic orbits have `a > 0`, hyperbolic ones `a < 0`. Parabolic input
//! (`e == 1`) is not modeled.

use std::f64::consts::TAU;

use nalgebra::Rotation2;

use super::forces::newtonian_gravity;
use super::kepler::{
    eccentric_from_true, hyperbolic_from_true, normalize_angle, solve_eccentric_anomaly,
    solve_hyperbolic_anomaly, true_from_eccentric, true_from_hyperbolic,
};
use super::states::{BodyId, NVec2};

/// Below this p/|a| the state is treated as rectilinear (h ≈ 0)
const DEGENERATE_LATUS_RECTUM: f64 = 1e-9;

/// Sense of travel around the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Counter-clockwise, positive angular momentum
    Prograde,
    /// Clockwise
    Retrograde,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Prograde => 1.0,
            Direction::Retrograde => -1.0,
        }
    }

    fn from_angular_momentum(h: f64) -> Self {
        if h > 0.0 { Direction::Prograde } else { Direction::Retrograde }
    }
}

/// The state of a source an orbit is computed against.
///
/// Copied out of the `MassiveBody` so the orbit holds no reference into the
/// world; refreshed with [`OrbitalPos::rebase`] whenever the source moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceFrame {
    pub id: BodyId,
    pub x: NVec2, // absolute position
    pub v: NVec2, // absolute velocity
    pub mu: f64, // gravitational parameter
    pub radius: f64,
}

#[derive(Debug, Clone)]
pub struct OrbitalPos {
    source: SourceFrame,
    eccentricity: f64,
    semi_major_axis: f64,
    omega: f64, // argument of periapsis
    true_anomaly: f64,
    direction: Direction,

    position: NVec2,
    velocity: NVec2,
    relative_position: NVec2,
    relative_velocity: NVec2,
    center: NVec2,
    apoapsis: Option<NVec2>,
    periapsis: NVec2,
}

impl OrbitalPos {
    /// Build from elements; outputs are computed immediately.
    pub fn new(
        source: SourceFrame,
        eccentricity: f64,
        semi_major_axis: f64,
        omega: f64,
        true_anomaly: f64,
        direction: Direction,
    ) -> Self {
        let mut orbit = Self::blank(source);
        orbit.eccentricity = eccentricity;
        orbit.semi_major_axis = semi_major_axis;
        orbit.omega = omega;
        orbit.true_anomaly = true_anomaly;
        orbit.direction = direction;
        orbit.calc_outputs();
        orbit
    }

    /// Build the conic passing through an absolute state vector.
    pub fn from_state(source: SourceFrame, x: NVec2, v: NVec2) -> Self {
        let mut orbit = Self::blank(source);
        orbit.derive_elements(x, v);
        orbit
    }

    fn blank(source: SourceFrame) -> Self {
        Self {
            source,
            eccentricity: 0.0,
            semi_major_axis: 0.0,
            omega: 0.0,
            true_anomaly: 0.0,
            direction: Direction::Prograde,
            position: NVec2::zeros(),
            velocity: NVec2::zeros(),
            relative_position: NVec2::zeros(),
            relative_velocity: NVec2::zeros(),
            center: NVec2::zeros(),
            apoapsis: None,
            periapsis: NVec2::zeros(),
        }
    }

    /// Overwrite all elements from an absolute state vector.
    ///
    /// A bit-identical state to the cached one is a no-op.
    pub fn set_state(&mut self, x: NVec2, v: NVec2) {
        if x == self.position && v == self.velocity {
            return;
        }
        self.derive_elements(x, v);
    }

    /// Advance the true anomaly analytically by `dt` (may be negative).
    pub fn update(&mut self, dt: f64) {
        if self.is_degenerate() {
            return;
        }
        let e = self.eccentricity;
        let a = self.semi_major_axis;
        let mu = self.source.mu;
        let step = dt * self.direction.sign();

        let nu = if self.is_hyperbolic() {
            let ha = hyperbolic_from_true(self.true_anomaly, e);
            let mean = e * ha.sinh() - ha;
            let n = (mu / -(a * a * a)).sqrt();
            let ha = solve_hyperbolic_anomaly(mean + n * step, e);
            true_from_hyperbolic(ha, e)
        } else {
            let ea = eccentric_from_true(self.true_anomaly, e);
            let mean = ea - e * ea.sin();
            let n = (mu / (a * a * a)).sqrt();
            let ea = solve_eccentric_anomaly(mean + n * step, e);
            true_from_eccentric(ea, e)
        };

        self.true_anomaly = normalize_angle(nu);
        self.calc_outputs();
    }

    /// Move the orbit onto the source's current state. Elements are relative
    /// and stay untouched; only the absolute outputs shift.
    pub fn rebase(&mut self, source: SourceFrame) {
        self.source = source;
        self.calc_outputs();
    }

    pub fn source(&self) -> BodyId {
        self.source.id
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// a·√|1 - e²|; carries the sign of `a`, so it is negative on hyperbolas.
    pub fn semi_minor_axis(&self) -> f64 {
        let e = self.eccentricity;
        self.semi_major_axis * (1.0 - e * e).abs().sqrt()
    }

    /// Argument of periapsis.
    pub fn omega(&self) -> f64 {
        self.omega
    }

    pub fn true_anomaly(&self) -> f64 {
        self.true_anomaly
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_hyperbolic(&self) -> bool {
        self.eccentricity > 1.0
    }

    /// No usable conic: a radial or resting state (h ≈ 0) collapses it onto a
    /// line, where p = 0 and the anomaly formulas divide by zero. Only the
    /// relative state is kept and `update` does nothing.
    pub fn is_degenerate(&self) -> bool {
        !(self.semi_latus_rectum() > DEGENERATE_LATUS_RECTUM * self.semi_major_axis.abs())
    }

    pub fn position(&self) -> NVec2 {
        self.position
    }

    pub fn velocity(&self) -> NVec2 {
        self.velocity
    }

    pub fn relative_position(&self) -> NVec2 {
        self.relative_position
    }

    pub fn relative_velocity(&self) -> NVec2 {
        self.relative_velocity
    }

    pub fn center(&self) -> NVec2 {
        self.center
    }

    pub fn periapsis(&self) -> NVec2 {
        self.periapsis
    }

    /// `None` on hyperbolic orbits.
    pub fn apoapsis(&self) -> Option<NVec2> {
        self.apoapsis
    }

    /// p = a(1 - e²), positive on both branches.
    pub fn semi_latus_rectum(&self) -> f64 {
        let e = self.eccentricity;
        self.semi_major_axis * (1.0 - e * e)
    }

    /// Distance from the source's center.
    pub fn distance(&self) -> f64 {
        self.relative_position.norm()
    }

    pub fn altitude(&self) -> f64 {
        self.distance() - self.source.radius
    }

    /// The source's pull at the current position.
    pub fn gravity(&self) -> NVec2 {
        newtonian_gravity(self.source.x, self.source.mu, self.position)
    }

    /// ε = -μ / 2a
    pub fn specific_energy(&self) -> f64 {
        -self.source.mu / (2.0 * self.semi_major_axis)
    }

    /// Orbital period; `None` for hyperbolic orbits.
    pub fn period(&self) -> Option<f64> {
        if self.is_hyperbolic() {
            return None;
        }
        let a = self.semi_major_axis;
        Some(TAU * (a * a * a / self.source.mu).sqrt())
    }

    /// Angle of the asymptotes, acos(-1/e); `None` for ellipses.
    pub fn true_anomaly_limit(&self) -> Option<f64> {
        self.is_hyperbolic().then(|| (-1.0 / self.eccentricity).acos())
    }

    /// Absolute point of the conic at true anomaly `nu`.
    pub fn point_at(&self, nu: f64) -> NVec2 {
        let r = self.distance_at(nu);
        self.to_world(NVec2::new(r * nu.cos(), r * nu.sin())) + self.source.x
    }

    fn distance_at(&self, nu: f64) -> f64 {
        self.semi_latus_rectum() / (1.0 + self.eccentricity * nu.cos())
    }

    /// Rotate from the perifocal frame (x towards periapsis) into the world frame.
    fn to_world(&self, local: NVec2) -> NVec2 {
        Rotation2::new(self.omega) * local
    }

    fn derive_elements(&mut self, x: NVec2, v: NVec2) {
        let mu = self.source.mu;
        let r_vec = x - self.source.x;
        let v_vec = v - self.source.v;

        let r = r_vec.norm();
        let v2 = v_vec.norm_squared();

        // Specific angular momentum (z component) and vis-viva
        let h = r_vec.perp(&v_vec);
        let semi_major_axis = 1.0 / (2.0 / r - v2 / mu);

        // Eccentricity vector points at periapsis
        let e_vec = r_vec * (v2 / mu - 1.0 / r) - v_vec * (r_vec.dot(&v_vec) / mu);

        self.semi_major_axis = semi_major_axis;
        self.eccentricity = e_vec.norm();
        self.direction = Direction::from_angular_momentum(h);
        self.omega = normalize_angle(e_vec.y.atan2(e_vec.x));
        self.true_anomaly = normalize_angle(r_vec.y.atan2(r_vec.x) - self.omega);
        self.relative_position = r_vec;
        self.relative_velocity = v_vec;

        self.calc_outputs();
    }

    fn calc_outputs(&mut self) {
        if self.is_degenerate() {
            self.position = self.relative_position + self.source.x;
            self.velocity = self.relative_velocity + self.source.v;
            self.center = self.position;
            self.apoapsis = None;
            self.periapsis = self.source.x;
            return;
        }
        self.calc_position();
        self.calc_velocity();
        self.calc_center();
        self.calc_apoapsis();
        self.calc_periapsis();
    }

    fn calc_position(&mut self) {
        let nu = self.true_anomaly;
        let r = self.distance_at(nu);
        self.relative_position = self.to_world(NVec2::new(r * nu.cos(), r * nu.sin()));
        self.position = self.relative_position + self.source.x;
    }

    fn calc_velocity(&mut self) {
        let e = self.eccentricity;
        let nu = self.true_anomaly;

        // Radial and tangential components, sqrt(μ/p) on both branches
        let k = self.direction.sign() * (self.source.mu / self.semi_latus_rectum()).sqrt();
        let vr = k * e * nu.sin();
        let vt = k * (1.0 + e * nu.cos());

        let local = NVec2::new(
            vr * nu.cos() - vt * nu.sin(),
            vr * nu.sin() + vt * nu.cos(),
        );
        self.relative_velocity = self.to_world(local);
        self.velocity = self.relative_velocity + self.source.v;
    }

    fn calc_center(&mut self) {
        let offset = -self.eccentricity * self.semi_major_axis;
        self.center = self.to_world(NVec2::new(offset, 0.0)) + self.source.x;
    }

    fn calc_apoapsis(&mut self) {
        self.apoapsis = if self.is_hyperbolic() {
            None
        } else {
            let r = (1.0 + self.eccentricity) * self.semi_major_axis;
            Some(self.to_world(NVec2::new(-r, 0.0)) + self.source.x)
        };
    }

    fn calc_periapsis(&mut self) {
        let r = (1.0 - self.eccentricity) * self.semi_major_axis;
        self.periapsis = self.to_world(NVec2::new(r, 0.0)) + self.source.x;
    }
}
