use std::time::Instant;

use crate::simulation::forces::newtonian_gravity;
use crate::simulation::integrator::semi_implicit_euler;
use crate::simulation::orbital::{OrbitalPos, SourceFrame};
use crate::simulation::states::{BodyId, NVec2};

/// Earth-like source at rest at the origin
fn make_source() -> SourceFrame {
    SourceFrame {
        id: BodyId(0),
        x: NVec2::zeros(),
        v: NVec2::zeros(),
        mu: 3.986004418e14,
        radius: 6.371e6,
    }
}

/// Specific orbital energy of a state around `source`
fn energy(source: &SourceFrame, x: NVec2, v: NVec2) -> f64 {
    let r = x - source.x;
    let w = v - source.v;
    0.5 * w.norm_squared() - source.mu / r.norm()
}

/// Compare analytic conic propagation against semi-implicit Euler on the
/// same eccentric orbit, for a range of step sizes
/// Paste output directly into a spreadsheet to graph
pub fn bench_propagation() {
    let source = make_source();
    let steps = 100_000;

    // e = 0.2 orbit with a 9000 km periapsis
    let x0 = NVec2::new(9.0e6, 0.0);
    let v0 = NVec2::new(0.0, (source.mu * 1.2 / 9.0e6).sqrt());
    let e0 = energy(&source, x0, v0);

    println!("dt,analytic_us,euler_us,analytic_drift,euler_drift");

    for dt in [0.1, 1.0, 10.0, 60.0] {
        // Analytic
        let mut orbit = OrbitalPos::from_state(source, x0, v0);
        let t0 = Instant::now();
        for _ in 0..steps {
            orbit.update(dt);
        }
        let analytic_us = t0.elapsed().as_secs_f64() * 1e6 / steps as f64;
        let analytic_drift = ((energy(&source, orbit.position(), orbit.velocity()) - e0) / e0).abs();

        // Numeric
        let (mut x, mut v) = (x0, v0);
        let t1 = Instant::now();
        for _ in 0..steps {
            let g = newtonian_gravity(source.x, source.mu, x);
            semi_implicit_euler(&mut x, &mut v, g, dt);
        }
        let euler_us = t1.elapsed().as_secs_f64() * 1e6 / steps as f64;
        let euler_drift = ((energy(&source, x, v) - e0) / e0).abs();

        println!("{},{:.4},{:.4},{:.3e},{:.3e}", dt, analytic_us, euler_us, analytic_drift, euler_drift);
    }
}
