//! Hybrid per-body propagation
//!
//! Every mobile body (spacecraft or non-fixed massive body) carries a
//! [`Motion`] and is advanced through [`Motion::step`] once per tick:
//!
//! 1. a crashed body rides along with the body it struck, nothing else
//! 2. frame correction: shift by the source's own displacement this tick
//! 3. pick the dominant source, rebuilding the conic on a handoff
//! 4. thrust active, or a radial state with no conic -> semi-implicit Euler,
//!    then re-derive the conic
//! 5. otherwise -> analytic conic propagation (elliptic or hyperbolic)
//! 6. surface collision test against every massive body

use tracing::{debug, info, warn};

use super::forces::dominant_source;
use super::integrator::{drift, semi_implicit_euler};
use super::orbital::OrbitalPos;
use super::states::{BodyId, MassiveBody, NVec2};

/// What the propagator is doing with a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Unperturbed elliptic conic, propagated analytically
    Coasting,
    /// Extra acceleration applied, integrated numerically
    Thrusting,
    /// Unperturbed hyperbolic conic, propagated analytically
    Escaping,
    /// Struck a massive body; terminal
    Crashed,
    /// No gravity source at all, straight-line motion
    Drifting,
}

#[derive(Debug, Clone)]
pub struct Motion {
    pub x: NVec2, // absolute position
    pub v: NVec2, // absolute velocity
    pub extra_acceleration: NVec2, // thrust, zero when coasting
    pub orbit: Option<OrbitalPos>, // conic around the dominant source
    pub crashed_into: Option<BodyId>, // set once, never cleared
}

impl Motion {
    pub fn new(x: NVec2, v: NVec2) -> Self {
        Self {
            x,
            v,
            extra_acceleration: NVec2::zeros(),
            orbit: None,
            crashed_into: None,
        }
    }

    pub fn is_thrusting(&self) -> bool {
        self.extra_acceleration != NVec2::zeros()
    }

    pub fn phase(&self) -> Phase {
        if self.crashed_into.is_some() {
            return Phase::Crashed;
        }
        match &self.orbit {
            None => Phase::Drifting,
            Some(_) if self.is_thrusting() => Phase::Thrusting,
            Some(orbit) if orbit.is_hyperbolic() => Phase::Escaping,
            Some(_) => Phase::Coasting,
        }
    }

    /// Advance this body by `dt`.
    ///
    /// `own` is the body's id when it is itself a massive body, so it is never
    /// its own source or collision target. `size` is its collision radius.
    /// `sources` must already hold this tick's state of every massive body the
    /// orbit may be bound to.
    pub fn step(&mut self, own: Option<BodyId>, size: f64, sources: &[MassiveBody], dt: f64) -> Phase {
        if let Some(host) = self.crashed_into {
            if let Some(host) = sources.get(host.0) {
                self.x += host.last_displacement();
                self.v += host.last_velocity_delta();
            }
            return Phase::Crashed;
        }

        self.correct_frame(sources);

        let Some(dominant) = dominant_source(sources, self.x, own) else {
            if self.orbit.take().is_some() {
                warn!("no gravity source left, drifting");
            }
            drift(&mut self.x, self.v, dt);
            return Phase::Drifting;
        };

        let bound_to = self.orbit.as_ref().map(OrbitalPos::source);
        if bound_to != Some(dominant.id) {
            debug!(from = ?bound_to, to = ?dominant.id, "dominant source handoff");
            self.orbit = Some(OrbitalPos::from_state(dominant.frame(), self.x, self.v));
        }
        let Some(orbit) = self.orbit.as_mut() else {
            return Phase::Drifting;
        };

        // A radial or resting state has no conic to follow and is integrated too
        if self.extra_acceleration != NVec2::zeros() || orbit.is_degenerate() {
            // Only the dominant source pulls; the conic is re-derived for display
            let a = dominant.gravity_vector_at(self.x) + self.extra_acceleration;
            semi_implicit_euler(&mut self.x, &mut self.v, a, dt);
            orbit.set_state(self.x, self.v);
        } else {
            orbit.update(dt);
            self.x = orbit.position();
            self.v = orbit.velocity();
        }

        if let Some(hit) = self.collision(own, size, sources) {
            info!(body = ?hit, "crashed");
            self.crashed_into = Some(hit);
            self.extra_acceleration = NVec2::zeros();
            return Phase::Crashed;
        }

        self.phase()
    }

    /// Ride along with a source that moved this tick, keeping the relative
    /// state exact for a uniformly translating frame.
    fn correct_frame(&mut self, sources: &[MassiveBody]) {
        let Some(orbit) = self.orbit.as_mut() else {
            return;
        };
        let Some(source) = sources.get(orbit.source().0) else {
            return;
        };
        if !source.has_moved() {
            return;
        }

        self.x += source.last_displacement();
        self.v += source.last_velocity_delta();
        orbit.rebase(source.frame());
    }

    fn collision(&self, own: Option<BodyId>, size: f64, sources: &[MassiveBody]) -> Option<BodyId> {
        sources
            .iter()
            .filter(|body| Some(body.id) != own)
            .find(|body| (body.position() - self.x).norm() <= body.radius + size)
            .map(|body| body.id)
    }
}
