//! Fixed-step numeric integration for perturbed motion
//!
//! Used only while a closed-form conic does not describe the motion (active
//! thrust, or no gravity source at all). Unperturbed motion never comes
//! through here, it is propagated analytically by `OrbitalPos`

use super::states::NVec2;

/// Advance `(x, v)` by one semi-implicit (symplectic) Euler step
///
/// The velocity is kicked first and the new velocity drives the drift:
/// v_n+1 = v_n + a dt
/// x_n+1 = x_n + v_n+1 dt
pub fn semi_implicit_euler(x: &mut NVec2, v: &mut NVec2, a: NVec2, dt: f64) {
    *v += a * dt;
    *x += *v * dt;
}

/// Straight-line drift with no force applied
pub fn drift(x: &mut NVec2, v: NVec2, dt: f64) {
    *x += v * dt;
}
