//! Gravity field queries for the propagator
//!
//! Point-mass Newtonian gravity, the summed field of all massive bodies and
//! the dominant-source selection used by the patched-conic handoff

use crate::simulation::states::{BodyId, MassiveBody, NVec2};

/// Newton's law for a point mass: |g| = μ / d²
pub fn gravity_magnitude(mu: f64, d: f64) -> f64 {
    mu / (d * d)
}

/// Acceleration at `p` due to a point mass with parameter `mu` sitting at `source`
///
/// Returns the zero vector when `p` coincides with `source`: the direction is
/// undefined there and callers treat it as no force
pub fn newtonian_gravity(source: NVec2, mu: f64, p: NVec2) -> NVec2 {
    // r points from the query point towards the source, so the pull is along +r
    let r = source - p;
    let d = r.norm();

    match r.try_normalize(f64::EPSILON) {
        Some(dir) => dir * gravity_magnitude(mu, d),
        None => NVec2::zeros(),
    }
}

/// Combined gravity of every massive body at `p`, optionally leaving one out
/// (a massive body never pulls on itself)
pub fn field_at(bodies: &[MassiveBody], p: NVec2, excluding: Option<BodyId>) -> NVec2 {
    let mut g = NVec2::zeros();
    for body in bodies {
        if Some(body.id) == excluding {
            continue;
        }
        g += body.gravity_vector_at(p);
    }
    g
}

/// The massive body whose pull is strongest at `p`
///
/// Ranks by μ/d² so no square roots are needed. A source whose center
/// coincides with `p` is skipped (no direction, no conic); `None` means there
/// is no candidate at all
pub fn dominant_source(
    bodies: &[MassiveBody],
    p: NVec2,
    excluding: Option<BodyId>,
) -> Option<&MassiveBody> {
    let mut best: Option<(&MassiveBody, f64)> = None;

    for body in bodies {
        if Some(body.id) == excluding {
            continue;
        }

        let d2 = (body.position() - p).norm_squared();
        if d2 <= 0.0 {
            continue;
        }

        let strength = body.gravitational_parameter() / d2;
        match best {
            Some((_, s)) if s >= strength => {}
            _ => best = Some((body, strength)),
        }
    }

    best.map(|(body, _)| body)
}
