use std::path::PathBuf;

use kepsim::simulation::forces::{dominant_source, field_at};
use kepsim::simulation::kepler::wrap_angle;
use kepsim::{build_scenario, load_scenario, solve_eccentric_anomaly, solve_hyperbolic_anomaly};
use kepsim::{
    BodyId, ConfigError, CraftSpec, Direction, MassiveBody, MassiveSpec, Mobility, NVec2,
    OrbitalPos, Parameters, Phase, ScenarioConfig, SourceFrame, World,
};

const G: f64 = 6.6743e-11;
const EARTH_M: f64 = 5.972e24;
const EARTH_R: f64 = 6.371e6;
const MOON_M: f64 = 7.342e22;
const MOON_R: f64 = 1.7374e6;

fn v2(x: f64, y: f64) -> NVec2 {
    NVec2::new(x, y)
}

/// Earth-like source at rest at the origin
pub fn earth_frame() -> SourceFrame {
    SourceFrame {
        id: BodyId(0),
        x: NVec2::zeros(),
        v: NVec2::zeros(),
        mu: G * EARTH_M,
        radius: EARTH_R,
    }
}

/// Default parameters for tests, with room for 10 s steps at unit time scale
pub fn test_params() -> Parameters {
    Parameters {
        G,
        max_dt: 10.0,
        ..Parameters::default()
    }
}

pub fn earth_spec() -> MassiveSpec {
    MassiveSpec {
        name: "earth".into(),
        x: NVec2::zeros(),
        v: NVec2::zeros(),
        m: EARTH_M,
        radius: EARTH_R,
        mobility: Mobility::Fixed,
    }
}

pub fn moon_spec() -> MassiveSpec {
    MassiveSpec {
        name: "moon".into(),
        x: v2(3.633e8, 0.0),
        v: v2(0.0, 1075.83),
        m: MOON_M,
        radius: MOON_R,
        mobility: Mobility::Mobile,
    }
}

pub fn craft(x: NVec2, v: NVec2) -> CraftSpec {
    CraftSpec { x, v, m: 1000.0, size: 5.0 }
}

/// Earth (fixed) and a mobile moon, plus one craft
pub fn earth_moon_world(spacecraft: Option<CraftSpec>) -> World {
    World::new(test_params(), vec![earth_spec(), moon_spec()], spacecraft).unwrap()
}

fn specific_energy(mu: f64, r: NVec2, v: NVec2) -> f64 {
    0.5 * v.norm_squared() - mu / r.norm()
}

fn relative_error(a: NVec2, b: NVec2) -> f64 {
    (a - b).norm() / b.norm()
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn gravity_points_toward_source() {
    let body = MassiveBody::new(BodyId(0), "earth", NVec2::zeros(), NVec2::zeros(), EARTH_M, EARTH_R, Mobility::Fixed, G);
    let p = v2(1.0e7, 0.0);
    let g = body.gravity_vector_at(p);

    assert!(g.x < 0.0, "Acceleration is not toward the source");
    assert_eq!(g.y, 0.0);
    assert!((g.norm() - body.gravity_magnitude(1.0e7)).abs() < 1e-12);
}

#[test]
fn gravity_inverse_square_law() {
    let body = MassiveBody::new(BodyId(0), "earth", NVec2::zeros(), NVec2::zeros(), EARTH_M, EARTH_R, Mobility::Fixed, G);
    let g_r = body.gravity_vector_at(v2(1.0e7, 0.0));
    let g_2r = body.gravity_vector_at(v2(0.0, 2.0e7));

    let ratio = g_r.norm() / g_2r.norm();
    assert!((ratio - 4.0).abs() < 1e-9, "Expected 4x, got {}", ratio);
}

#[test]
fn gravity_at_center_is_zero() {
    let body = MassiveBody::new(BodyId(0), "earth", v2(5.0, 5.0), NVec2::zeros(), EARTH_M, EARTH_R, Mobility::Fixed, G);
    assert_eq!(body.gravity_vector_at(v2(5.0, 5.0)), NVec2::zeros());
}

#[test]
fn gravity_at_excludes_one_body() {
    let world = earth_moon_world(None);
    let p = v2(3.0e8, 1.0e7);

    let total = world.gravity_at(p, None);
    let earth_only = world.gravity_at(p, Some(BodyId(1)));
    let moon_only = world.gravity_at(p, Some(BodyId(0)));

    let earth = &world.massive_bodies()[0];
    assert!((earth_only - earth.gravity_vector_at(p)).norm() < 1e-15);
    assert!((total - (earth_only + moon_only)).norm() < 1e-15);
    assert_eq!(field_at(world.massive_bodies(), p, None), total);
}

#[test]
fn dominant_source_picks_strongest_pull() {
    let world = earth_moon_world(None);
    let bodies = world.massive_bodies();

    // Deep inside the moon's sphere of influence
    let near_moon = v2(3.633e8 - 5.0e6, 0.0);
    assert_eq!(dominant_source(bodies, near_moon, None).map(|b| b.id), Some(BodyId(1)));

    // Low earth orbit
    assert_eq!(dominant_source(bodies, v2(7.0e6, 0.0), None).map(|b| b.id), Some(BodyId(0)));

    // A body is never its own source
    let at_moon = bodies[1].position();
    assert_eq!(dominant_source(bodies, at_moon, Some(BodyId(1))).map(|b| b.id), Some(BodyId(0)));

    assert!(dominant_source(&[], near_moon, None).is_none());
}

// ==================================================================================
// Kepler solver tests
// ==================================================================================

#[test]
fn eccentric_solver_residual_across_eccentricities() {
    for i in 0..=99 {
        let e = i as f64 * 0.01;
        for j in -8..=24 {
            let m = j as f64 * 0.5;
            let ea = solve_eccentric_anomaly(m, e);
            let residual = ea - e * ea.sin() - m;
            assert!(residual.abs() < 1e-6, "e = {e}, M = {m}, residual = {residual}");
        }
    }
}

#[test]
fn hyperbolic_solver_residual() {
    for &e in &[1.01, 1.2, 2.0, 10.0] {
        for &m in &[-100.0, -3.0, -0.1, 0.0, 0.1, 3.0, 100.0] {
            let ha = solve_hyperbolic_anomaly(m, e);
            let residual = e * ha.sinh() - ha - m;
            assert!(residual.abs() < 1e-6, "e = {e}, M = {m}, residual = {residual}");
        }
    }
}

// ==================================================================================
// Orbital element tests
// ==================================================================================

#[test]
fn state_round_trip_prograde() {
    let x = v2(7.0e6, 1.0e6);
    let v = v2(-1000.0, 7500.0);
    let orbit = OrbitalPos::from_state(earth_frame(), x, v);

    assert_eq!(orbit.direction(), Direction::Prograde);
    assert!(!orbit.is_hyperbolic());
    assert!(relative_error(orbit.position(), x) < 1e-6);
    assert!(relative_error(orbit.velocity(), v) < 1e-6);
}

#[test]
fn state_round_trip_retrograde() {
    let x = v2(-3.0e6, 8.0e6);
    let v = v2(6000.0, 1500.0);
    let orbit = OrbitalPos::from_state(earth_frame(), x, v);

    assert_eq!(orbit.direction(), Direction::Retrograde);
    assert!(relative_error(orbit.position(), x) < 1e-6);
    assert!(relative_error(orbit.velocity(), v) < 1e-6);
}

#[test]
fn state_round_trip_hyperbolic() {
    let x = v2(7.0e6, -2.0e6);
    let v = v2(3000.0, 14000.0);
    let orbit = OrbitalPos::from_state(earth_frame(), x, v);

    assert!(orbit.is_hyperbolic());
    assert!(orbit.semi_major_axis() < 0.0);
    assert!(orbit.apoapsis().is_none());
    assert!(orbit.period().is_none());
    assert!(relative_error(orbit.position(), x) < 1e-6);
    assert!(relative_error(orbit.velocity(), v) < 1e-6);
}

#[test]
fn state_round_trip_in_moving_frame() {
    let frame = SourceFrame {
        x: v2(3.0e8, -1.0e8),
        v: v2(500.0, 900.0),
        ..earth_frame()
    };
    let x = frame.x + v2(0.0, 9.0e6);
    let v = frame.v + v2(-6500.0, 200.0);
    let orbit = OrbitalPos::from_state(frame, x, v);

    assert!(relative_error(orbit.relative_position(), x - frame.x) < 1e-6);
    assert!(relative_error(orbit.relative_velocity(), v - frame.v) < 1e-6);
}

#[test]
fn elements_place_apsides() {
    let (e, a, omega) = (0.3, 1.0e7, 1.0);
    let orbit = OrbitalPos::new(earth_frame(), e, a, omega, 0.0, Direction::Prograde);

    // At ν = 0 the body sits on periapsis
    assert!((orbit.position() - orbit.periapsis()).norm() < 1e-3);
    assert!((orbit.periapsis().norm() - a * (1.0 - e)).abs() < 1e-3);

    let apoapsis = orbit.apoapsis().unwrap();
    assert!((apoapsis.norm() - a * (1.0 + e)).abs() < 1e-3);
    assert!((orbit.center() - (orbit.periapsis() + apoapsis) / 2.0).norm() < 1e-3);

    // Periapsis lies along ω
    let angle = orbit.periapsis().y.atan2(orbit.periapsis().x);
    assert!((angle - omega).abs() < 1e-12);

    let b = orbit.semi_minor_axis();
    assert!((b - a * (1.0 - e * e).sqrt()).abs() < 1e-6);
}

#[test]
fn point_at_matches_position() {
    let orbit = OrbitalPos::new(earth_frame(), 0.4, 1.2e7, 2.0, 1.1, Direction::Retrograde);
    assert!((orbit.point_at(orbit.true_anomaly()) - orbit.position()).norm() < 1e-6);
}

#[test]
fn set_state_with_cached_state_is_noop() {
    let mut orbit = OrbitalPos::from_state(earth_frame(), v2(7.0e6, 1.0e6), v2(-1000.0, 7500.0));
    let (e, a, omega, nu) = (orbit.eccentricity(), orbit.semi_major_axis(), orbit.omega(), orbit.true_anomaly());

    orbit.set_state(orbit.position(), orbit.velocity());

    assert_eq!(orbit.eccentricity(), e);
    assert_eq!(orbit.semi_major_axis(), a);
    assert_eq!(orbit.omega(), omega);
    assert_eq!(orbit.true_anomaly(), nu);
}

#[test]
fn rebase_shifts_absolute_state_only() {
    let mut orbit = OrbitalPos::from_state(earth_frame(), v2(7.0e6, 0.0), v2(0.0, 8000.0));
    let rel_x = orbit.relative_position();
    let rel_v = orbit.relative_velocity();

    let moved = SourceFrame {
        x: v2(1000.0, -2000.0),
        v: v2(3.0, 4.0),
        ..earth_frame()
    };
    orbit.rebase(moved);

    assert_eq!(orbit.relative_position(), rel_x);
    assert_eq!(orbit.relative_velocity(), rel_v);
    assert!((orbit.position() - (rel_x + moved.x)).norm() < 1e-6);
    assert!((orbit.velocity() - (rel_v + moved.v)).norm() < 1e-9);
}

#[test]
fn resting_state_has_no_conic() {
    let x = v2(2.0e7, 0.0);
    let mut orbit = OrbitalPos::from_state(earth_frame(), x, NVec2::zeros());

    assert!(orbit.is_degenerate());
    assert!((orbit.position() - x).norm() < 1e-6);
    assert_eq!(orbit.velocity(), NVec2::zeros());
    assert!((orbit.altitude() - (2.0e7 - EARTH_R)).abs() < 1e-6);

    orbit.update(10.0);
    assert!((orbit.position() - x).norm() < 1e-6);

    let bound = OrbitalPos::from_state(earth_frame(), x, v2(0.0, 4000.0));
    assert!(!bound.is_degenerate());
}

#[test]
fn hyperbolic_queries() {
    let orbit = OrbitalPos::new(earth_frame(), 2.0, -7.0e6, 0.0, 0.0, Direction::Prograde);

    let limit = orbit.true_anomaly_limit().unwrap();
    assert!((limit - (-0.5f64).acos()).abs() < 1e-12);
    assert!(orbit.specific_energy() > 0.0);
    assert!(orbit.semi_latus_rectum() > 0.0);
    assert!(orbit.semi_minor_axis() < 0.0);

    let elliptic = OrbitalPos::new(earth_frame(), 0.1, 7.0e6, 0.0, 0.0, Direction::Prograde);
    assert!(elliptic.true_anomaly_limit().is_none());
    assert!(elliptic.specific_energy() < 0.0);
}

// ==================================================================================
// Analytic propagation tests
// ==================================================================================

#[test]
fn elliptic_propagation_conserves_energy() {
    let mu = earth_frame().mu;
    let x0 = v2(9.0e6, 0.0);
    let v0 = v2(0.0, (mu * 1.2 / 9.0e6).sqrt()); // e = 0.2
    let mut orbit = OrbitalPos::from_state(earth_frame(), x0, v0);
    let e0 = specific_energy(mu, x0, v0);

    for _ in 0..10_000 {
        orbit.update(10.0);
    }

    let e1 = specific_energy(mu, orbit.position(), orbit.velocity());
    assert!(((e1 - e0) / e0).abs() < 1e-6, "Energy drift: {}", (e1 - e0) / e0);
    assert!((orbit.eccentricity() - 0.2).abs() < 1e-9);
}

#[test]
fn full_period_returns_to_start() {
    let mut orbit = OrbitalPos::new(earth_frame(), 0.5, 2.0e7, 0.3, 1.0, Direction::Prograde);
    let nu0 = orbit.true_anomaly();
    let start = orbit.position();
    let period = orbit.period().unwrap();

    orbit.update(period / 3.0);
    assert!(wrap_angle(orbit.true_anomaly() - nu0).abs() > 0.1);
    orbit.update(2.0 * period / 3.0);

    assert!(wrap_angle(orbit.true_anomaly() - nu0).abs() < 1e-6);
    assert!((orbit.position() - start).norm() < 1.0);
}

#[test]
fn retrograde_orbit_turns_clockwise() {
    let mut orbit = OrbitalPos::new(earth_frame(), 0.1, 8.0e6, 0.0, 0.5, Direction::Retrograde);
    orbit.update(60.0);

    assert!(wrap_angle(orbit.true_anomaly() - 0.5) < 0.0);
    let h = orbit.relative_position().perp(&orbit.relative_velocity());
    assert!(h < 0.0);
}

#[test]
fn hyperbolic_forward_then_back() {
    let mut orbit = OrbitalPos::new(earth_frame(), 1.5, -7.0e6, 0.0, 0.3, Direction::Prograde);
    let mu = earth_frame().mu;
    let e0 = specific_energy(mu, orbit.relative_position(), orbit.relative_velocity());

    orbit.update(100.0);
    assert!(orbit.true_anomaly() > 0.3);
    assert!(orbit.true_anomaly() < orbit.true_anomaly_limit().unwrap());

    orbit.update(-100.0);
    assert!(wrap_angle(orbit.true_anomaly() - 0.3).abs() < 1e-4);

    let e1 = specific_energy(mu, orbit.relative_position(), orbit.relative_velocity());
    assert!(((e1 - e0) / e0).abs() < 1e-6);
}

// ==================================================================================
// World tests
// ==================================================================================

#[test]
fn circular_orbit_period_in_world() {
    let mut world = earth_moon_world(Some(craft(v2(7.371e6, 0.0), v2(0.0, 7353.71))));
    let id = world.current_craft_id().unwrap();

    // First tick binds the conic
    world.tick(1.0);
    let orbit = world.craft(id).unwrap().orbit().unwrap().clone();
    let nu1 = orbit.true_anomaly();
    let period = orbit.period().unwrap();
    assert_eq!(orbit.source(), BodyId(0));

    let n = 1000;
    let dt = period / n as f64;
    assert!(dt <= test_params().max_dt);
    for _ in 0..n {
        world.tick(dt);
    }

    let craft = world.craft(id).unwrap();
    let orbit = craft.orbit().unwrap();
    assert_eq!(orbit.source(), BodyId(0));
    assert!(!orbit.is_hyperbolic());
    assert_eq!(craft.phase(), Phase::Coasting);
    assert!(wrap_angle(orbit.true_anomaly() - nu1).abs() < 1e-3);

    // The moon itself coasts around the earth
    let moon = &world.massive_bodies()[1];
    assert_eq!(moon.orbit().map(OrbitalPos::source), Some(BodyId(0)));
    assert!(moon.has_moved());
    assert!(!world.massive_bodies()[0].has_moved());
}

#[test]
fn handoff_keeps_state_continuous() {
    let params = test_params();
    let a = MassiveSpec {
        name: "a".into(),
        radius: 1.0e6,
        ..earth_spec()
    };
    let b = MassiveSpec {
        name: "b".into(),
        x: v2(1.0e8, 0.0),
        radius: 1.0e6,
        ..earth_spec()
    };
    let mut world = World::new(params, vec![a, b], Some(craft(v2(3.0e7, 2.0e7), v2(1.0e4, 0.0)))).unwrap();
    let id = world.current_craft_id().unwrap();

    world.tick(1.0);
    assert_eq!(world.craft(id).unwrap().orbit().unwrap().source(), BodyId(0));

    let mut handoffs = 0;
    for _ in 0..4000 {
        let before = world.craft(id).unwrap().clone();
        world.tick(1.0);
        let after = world.craft(id).unwrap();

        let speed = before.velocity().norm();
        let dv = (after.velocity() - before.velocity()).norm();
        let dx = (after.position() - before.position() - before.velocity()).norm();
        assert!(dv <= 1e-3 * speed, "velocity jump {dv}");
        assert!(dx <= 1e-3 * speed, "position jump {dx}");

        if before.orbit().unwrap().source() != after.orbit().unwrap().source() {
            handoffs += 1;
        }
    }

    assert_eq!(handoffs, 1);
    let craft = world.craft(id).unwrap();
    assert_eq!(craft.orbit().unwrap().source(), BodyId(1));
    assert!(craft.crashed_into().is_none());
}

#[test]
fn frame_correction_keeps_relative_orbit() {
    let moon = moon_spec();
    let mu = G * MOON_M;
    let r = 2.0e6;
    let x = moon.x + v2(r, 0.0);
    let v = moon.v + v2(0.0, (mu / r).sqrt());
    let mut world = earth_moon_world(Some(craft(x, v)));
    let id = world.current_craft_id().unwrap();

    world.tick(10.0);
    let relative_energy = |world: &World| {
        let craft = world.craft(id).unwrap();
        let moon = &world.massive_bodies()[1];
        specific_energy(mu, craft.position() - moon.position(), craft.velocity() - moon.velocity())
    };
    let e0 = relative_energy(&world);

    for _ in 0..1000 {
        world.tick(10.0);
        assert_eq!(world.craft(id).unwrap().orbit().unwrap().source(), BodyId(1));
    }

    let e1 = relative_energy(&world);
    assert!(((e1 - e0) / e0).abs() < 1e-6, "Relative energy drift: {}", (e1 - e0) / e0);

    let craft = world.craft(id).unwrap();
    let moon = &world.massive_bodies()[1];
    let offset = craft.position() - moon.position();
    assert!((offset - craft.orbit().unwrap().relative_position()).norm() < 1e-3);
}

#[test]
fn crash_latches_onto_moving_body() {
    let moon = moon_spec();
    let x = moon.x + v2(MOON_R + 2000.0, 0.0);
    let v = moon.v + v2(0.0, 1000.0);
    let mut world = earth_moon_world(Some(craft(x, v)));
    let id = world.current_craft_id().unwrap();

    let mut crashed = false;
    for _ in 0..500 {
        world.tick(1.0);
        if world.craft(id).unwrap().crashed_into().is_some() {
            crashed = true;
            break;
        }
    }
    assert!(crashed, "craft never reached the surface");
    assert_eq!(world.craft(id).unwrap().crashed_into(), Some(BodyId(1)));

    let offset = |world: &World| world.craft(id).unwrap().position() - world.massive_bodies()[1].position();
    let landed = offset(&world);

    // Thrust is ignored once down, and so is the thrust time-scale cap
    world.scale_time(5);
    world.set_thrust(v2(1.0, 0.0));
    assert_eq!(world.craft(id).unwrap().extra_acceleration(), NVec2::zeros());
    assert!((world.time_scale() - 1.0e5).abs() < 1e-6);
    world.scale_time(-5);

    for _ in 0..200 {
        world.tick(1.0);
        let craft = world.craft(id).unwrap();
        assert_eq!(craft.crashed_into(), Some(BodyId(1)));
        assert_eq!(craft.phase(), Phase::Crashed);
    }
    assert!((offset(&world) - landed).norm() < 1e-3);
}

#[test]
fn thrust_raises_orbit_and_caps_time_scale() {
    let r = 7.0e6;
    let v = (G * EARTH_M / r).sqrt();
    let mut world = World::new(test_params(), vec![earth_spec()], Some(craft(v2(r, 0.0), v2(0.0, v)))).unwrap();
    let id = world.current_craft_id().unwrap();

    world.tick(1.0);
    let a0 = world.craft(id).unwrap().orbit().unwrap().semi_major_axis();

    world.scale_time(5);
    assert!((world.time_scale() - 1.0e5).abs() < 1e-6);

    let prograde = world.craft(id).unwrap().velocity().normalize();
    world.set_thrust(prograde);
    assert_eq!(world.time_scale(), test_params().max_thrust_time_scale);
    assert_eq!(world.craft(id).unwrap().phase(), Phase::Thrusting);

    // Raising the scale while thrusting stays capped
    world.scale_time(1);
    assert_eq!(world.time_scale(), test_params().max_thrust_time_scale);
    world.scale_time(-3);
    assert!((world.time_scale() - 1.0).abs() < 1e-9);

    for _ in 0..100 {
        let along = world.craft(id).unwrap().velocity().normalize();
        world.set_thrust(along);
        world.tick(1.0);
    }
    world.set_thrust(NVec2::zeros());

    let craft = world.craft(id).unwrap();
    assert!(craft.orbit().unwrap().semi_major_axis() > a0);
    assert_eq!(craft.phase(), Phase::Coasting);
}

#[test]
fn escape_trajectory_is_hyperbolic() {
    let mut world = World::new(test_params(), vec![earth_spec()], Some(craft(v2(7.0e6, 0.0), v2(0.0, 12500.0)))).unwrap();
    let id = world.current_craft_id().unwrap();

    for _ in 0..100 {
        world.tick(10.0);
    }

    let craft = world.craft(id).unwrap();
    assert_eq!(craft.phase(), Phase::Escaping);
    assert!(craft.altitude() > 7.0e6 - EARTH_R);
}

#[test]
fn craft_at_rest_falls_and_crashes() {
    let mut world = World::new(test_params(), vec![earth_spec()], Some(craft(v2(2.0e7, 0.0), NVec2::zeros()))).unwrap();
    let id = world.current_craft_id().unwrap();

    let mut crashed = false;
    for _ in 0..1000 {
        world.tick(10.0);
        let craft = world.craft(id).unwrap();
        assert!(craft.position().iter().all(|c| c.is_finite()), "position {:?}", craft.position());
        assert!(craft.velocity().iter().all(|c| c.is_finite()), "velocity {:?}", craft.velocity());
        if craft.crashed_into().is_some() {
            crashed = true;
            break;
        }
        // Straight down, never sideways
        assert_eq!(craft.position().y, 0.0);
        assert!(craft.velocity().x < 0.0);
    }

    assert!(crashed, "craft never reached the surface");
    assert_eq!(world.craft(id).unwrap().crashed_into(), Some(BodyId(0)));
}

#[test]
fn drifts_without_gravity_sources() {
    let mut world = World::new(test_params(), Vec::new(), Some(craft(v2(1.0, 2.0), v2(3.0, -4.0)))).unwrap();
    let id = world.current_craft_id().unwrap();

    let dt = world.tick(2.0);
    assert_eq!(dt, 2.0);

    let craft = world.craft(id).unwrap();
    assert_eq!(craft.phase(), Phase::Drifting);
    assert!((craft.position() - v2(7.0, -6.0)).norm() < 1e-12);
    assert_eq!(craft.velocity(), v2(3.0, -4.0));
}

#[test]
fn tick_clamps_host_delta() {
    let mut world = earth_moon_world(None);

    assert_eq!(world.tick(1.0e6), test_params().max_dt);
    assert_eq!(world.tick(-1.0), 0.0);
    assert_eq!(world.time(), test_params().max_dt);
}

// ==================================================================================
// Spacecraft roster tests
// ==================================================================================

#[test]
fn spawned_craft_joins_next_tick() {
    let mut world = earth_moon_world(Some(craft(v2(7.0e6, 0.0), v2(0.0, 7600.0))));
    assert_eq!(world.spacecraft().len(), 1);
    let first = world.current_craft_id().unwrap();

    let second = world.add_default_spacecraft().unwrap();
    assert_ne!(first, second);
    assert_eq!(world.current_craft_id(), Some(second));
    assert_eq!(world.spacecraft().len(), 1);
    assert!(world.current_craft().is_some());

    world.tick(1.0);
    assert_eq!(world.spacecraft().len(), 2);
}

#[test]
fn clone_copies_current_state() {
    let mut world = earth_moon_world(Some(craft(v2(7.0e6, 0.0), v2(0.0, 7600.0))));
    for _ in 0..10 {
        world.tick(1.0);
    }
    let original = world.current_craft().unwrap().clone();

    let copy = world.clone_current_spacecraft().unwrap();
    let cloned = world.craft(copy).unwrap();
    assert_eq!(cloned.position(), original.position());
    assert_eq!(cloned.velocity(), original.velocity());
    assert_eq!(cloned.size, original.size);
}

#[test]
fn focus_cycles_and_clears_thrust() {
    let mut world = earth_moon_world(Some(craft(v2(7.0e6, 0.0), v2(0.0, 7600.0))));
    let first = world.current_craft_id().unwrap();
    let second = world.add_default_spacecraft().unwrap();
    world.tick(1.0);

    world.set_thrust(v2(0.0, 1.0));
    assert!(world.craft(second).unwrap().extra_acceleration().norm() > 0.0);

    assert_eq!(world.next_spacecraft(), Some(first));
    assert_eq!(world.craft(second).unwrap().extra_acceleration(), NVec2::zeros());

    assert_eq!(world.next_spacecraft(), Some(second));
    assert_eq!(world.prev_spacecraft(), Some(first));
    assert_eq!(world.prev_spacecraft(), Some(second));
}

#[test]
fn empty_roster() {
    let mut world = earth_moon_world(None);
    assert!(world.current_craft().is_none());
    assert!(world.add_default_spacecraft().is_none());
    assert!(world.clone_current_spacecraft().is_none());
    assert!(world.next_spacecraft().is_none());
    world.set_thrust(v2(1.0, 0.0));
}

// ==================================================================================
// Configuration tests
// ==================================================================================

const SCENARIO: &str = r#"
parameters:
  G: 6.6743e-11
  max_dt: 0.1
bodies:
  - name: earth
    x: [ 0.0, 0.0 ]
    v: [ 0.0, 0.0 ]
    m: 5.97219e24
    radius: 6371000.0
    fixed: true
  - x: [ -384399000.0, 0.0 ]
    v: [ 0.0, -1022.0 ]
    m: 7.34767309e22
    radius: 1737400.0
spacecraft:
  x: [ 16371000.0, 0.0 ]
  v: [ 0.0, 5000.0 ]
  size: 5.0
"#;

fn parse(yaml: &str) -> ScenarioConfig {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn scenario_builds_world() {
    let world = build_scenario(parse(SCENARIO)).unwrap();

    let bodies = world.massive_bodies();
    assert_eq!(bodies.len(), 2);
    assert!(bodies[0].is_fixed());
    assert_eq!(bodies[1].mobility, Mobility::Mobile);
    assert_eq!(bodies[1].name, "body1");
    assert_eq!(world.spacecraft().len(), 1);
    assert_eq!(world.spacecraft()[0].m, 1000.0);
    assert_eq!(world.time_scale(), 1.0);
    assert_eq!(world.parameters.booster_force, 5.0);
}

#[test]
fn scenario_rejects_bad_vector() {
    let yaml = SCENARIO.replace("v: [ 0.0, 5000.0 ]", "v: [ 0.0, 5000.0, 1.0 ]");
    match build_scenario(parse(&yaml)) {
        Err(ConfigError::VectorLength { field, len }) => {
            assert_eq!(field, "spacecraft.v");
            assert_eq!(len, 3);
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn scenario_rejects_non_positive_mass() {
    let yaml = SCENARIO.replace("m: 7.34767309e22", "m: -1.0");
    assert!(matches!(build_scenario(parse(&yaml)), Err(ConfigError::InvalidMass { .. })));
}

#[test]
fn scenario_rejects_inverted_time_scale_bounds() {
    let yaml = SCENARIO.replace("max_dt: 0.1", "max_dt: 0.1\n  min_time_scale: 10.0\n  max_time_scale: 1.0");
    assert!(matches!(build_scenario(parse(&yaml)), Err(ConfigError::TimeScaleBounds { .. })));
}

#[test]
fn world_rejects_bad_parameters() {
    let params = Parameters { max_dt: 0.0, ..test_params() };
    assert!(matches!(
        World::new(params, vec![earth_spec()], None),
        Err(ConfigError::InvalidParameter { name: "max_dt", .. })
    ));

    let spec = MassiveSpec { x: v2(f64::NAN, 0.0), ..earth_spec() };
    assert!(matches!(
        World::new(test_params(), vec![spec], None),
        Err(ConfigError::NonFinite { .. })
    ));
}

#[test]
fn bundled_scenarios_load() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios");
    for name in ["earth_moon.yaml", "escape.yaml"] {
        let cfg = load_scenario(&dir.join(name)).unwrap();
        let world = build_scenario(cfg).unwrap();
        assert!(world.current_craft().is_some(), "{name}");
    }
}

#[test]
fn missing_scenario_is_io_error() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join("does_not_exist.yaml");
    assert!(matches!(load_scenario(&path), Err(ConfigError::Io(_))));
}

