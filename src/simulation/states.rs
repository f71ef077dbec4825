//! Core state types for the propagator.
//!
//! Defines the two kinds of physics body the world owns:
//! - `MassiveBody` – a gravity source, either held fixed or itself propagated
//! - `DynamicBody` – a spacecraft (test particle) that feels gravity but exerts none
//!
//! Both carry a [`Motion`], the shared state the hybrid propagator advances.

use nalgebra::Vector2;

use super::forces::{gravity_magnitude, newtonian_gravity};
use super::orbital::{OrbitalPos, SourceFrame};
use super::propagator::{Motion, Phase};

pub type NVec2 = Vector2<f64>;

/// Index of a massive body inside the world. Massive bodies are never
/// destroyed during a run, so the index is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub usize);

/// Identity of a spacecraft, assigned once at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CraftId(pub u64);

/// Whether a massive body is integrated or held in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mobility {
    /// Never integrated (e.g. a primary held stationary)
    Fixed,
    /// Advanced every tick through the same path as spacecraft
    Mobile,
}

#[derive(Debug, Clone)]
pub struct MassiveBody {
    pub id: BodyId,
    pub name: String,
    pub m: f64, // mass
    pub radius: f64, // surface radius, used for collisions and altitude
    pub mobility: Mobility,
    pub motion: Motion,
    mu: f64, // G * m
    last_displacement: NVec2,
    last_velocity_delta: NVec2,
}

impl MassiveBody {
    pub fn new(
        id: BodyId,
        name: impl Into<String>,
        x: NVec2,
        v: NVec2,
        m: f64,
        radius: f64,
        mobility: Mobility,
        g: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            m,
            radius,
            mobility,
            motion: Motion::new(x, v),
            mu: g * m,
            last_displacement: NVec2::zeros(),
            last_velocity_delta: NVec2::zeros(),
        }
    }

    pub fn position(&self) -> NVec2 {
        self.motion.x
    }

    pub fn velocity(&self) -> NVec2 {
        self.motion.v
    }

    pub fn is_fixed(&self) -> bool {
        self.mobility == Mobility::Fixed
    }

    /// μ = G·m
    pub fn gravitational_parameter(&self) -> f64 {
        self.mu
    }

    /// Point-mass field strength at distance `d` from the center.
    pub fn gravity_magnitude(&self, d: f64) -> f64 {
        gravity_magnitude(self.mu, d)
    }

    /// Acceleration this body imparts at `p`. Zero when `p` coincides with the
    /// center, where the direction is undefined.
    pub fn gravity_vector_at(&self, p: NVec2) -> NVec2 {
        newtonian_gravity(self.motion.x, self.mu, p)
    }

    /// Position delta applied during this body's most recent update.
    pub fn last_displacement(&self) -> NVec2 {
        self.last_displacement
    }

    /// Velocity delta applied during this body's most recent update.
    pub fn last_velocity_delta(&self) -> NVec2 {
        self.last_velocity_delta
    }

    /// True when the last update shifted this body's frame.
    pub fn has_moved(&self) -> bool {
        self.last_displacement != NVec2::zeros() || self.last_velocity_delta != NVec2::zeros()
    }

    /// Snapshot of the state an orbit around this body is computed against.
    pub fn frame(&self) -> SourceFrame {
        SourceFrame {
            id: self.id,
            x: self.motion.x,
            v: self.motion.v,
            mu: self.mu,
            radius: self.radius,
        }
    }

    /// The conic this body currently follows, if it is mobile and bound.
    pub fn orbit(&self) -> Option<&OrbitalPos> {
        self.motion.orbit.as_ref()
    }

    /// Replace the motion state with the result of a propagation step and
    /// publish the deltas for dependents.
    pub(crate) fn advance_to(&mut self, motion: Motion) {
        self.last_displacement = motion.x - self.motion.x;
        self.last_velocity_delta = motion.v - self.motion.v;
        self.motion = motion;
    }
}

#[derive(Debug, Clone)]
pub struct DynamicBody {
    pub id: CraftId,
    pub m: f64, // mass (informational, crafts are test particles)
    pub size: f64, // collision radius
    pub motion: Motion,
}

impl DynamicBody {
    pub fn new(id: CraftId, x: NVec2, v: NVec2, m: f64, size: f64) -> Self {
        Self {
            id,
            m,
            size,
            motion: Motion::new(x, v),
        }
    }

    pub fn position(&self) -> NVec2 {
        self.motion.x
    }

    pub fn velocity(&self) -> NVec2 {
        self.motion.v
    }

    /// Velocity relative to the current dominant source.
    pub fn relative_velocity(&self) -> NVec2 {
        self.motion
            .orbit
            .as_ref()
            .map_or(self.motion.v, OrbitalPos::relative_velocity)
    }

    /// Height above the dominant source's surface, zero before a source is found.
    pub fn altitude(&self) -> f64 {
        self.motion.orbit.as_ref().map_or(0.0, OrbitalPos::altitude)
    }

    pub fn orbit(&self) -> Option<&OrbitalPos> {
        self.motion.orbit.as_ref()
    }

    pub fn crashed_into(&self) -> Option<BodyId> {
        self.motion.crashed_into
    }

    pub fn extra_acceleration(&self) -> NVec2 {
        self.motion.extra_acceleration
    }

    /// Set thrust for the coming ticks. Ignored once crashed; returns whether
    /// it took effect.
    pub fn set_extra_acceleration(&mut self, a: NVec2) -> bool {
        if self.motion.crashed_into.is_some() {
            return false;
        }
        self.motion.extra_acceleration = a;
        true
    }

    pub fn phase(&self) -> Phase {
        self.motion.phase()
    }
}
