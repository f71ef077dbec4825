use std::f64::consts::TAU;

use bevy::prelude::*;
use bevy::log::LogPlugin;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::math::primitives::Circle;

use crate::simulation::orbital::OrbitalPos;
use crate::simulation::states::NVec2;
use crate::simulation::world::World;

#[derive(Component)]
struct BodyIndex(pub usize);

/// World meters -> screen pixels
const SCALE: f64 = 1.0e-5;
const ORBIT_SEGMENTS: usize = 256;
const CRAFT_MARKER: f32 = 3.0;
const ZOOM_STEP: f32 = 1.05;

pub fn run_2d(world: World) {
    tracing::info!(
        massive = world.massive_bodies().len(),
        crafts = world.spacecraft().len(),
        "starting Bevy 2D viewer"
    );

    App::new()
        .insert_resource(world)
        // tracing is already set up by the binary
        .add_plugins(DefaultPlugins.build().disable::<LogPlugin>())
        .add_systems(Startup, setup_bodies_system)
        .add_systems(
            Update,
            (input_system, physics_step_system, sync_transforms_system, draw_orbits_system).chain(),
        )
        .run();
}

fn to_screen(p: NVec2) -> Vec2 {
    Vec2::new((p.x * SCALE) as f32, (p.y * SCALE) as f32)
}

fn setup_bodies_system(mut commands: Commands, world: Res<World>, mut meshes: ResMut<Assets<Mesh>>, mut materials: ResMut<Assets<ColorMaterial>>) {
    // 2D camera
    commands.spawn(Camera2dBundle::default());

    for (i, body) in world.massive_bodies().iter().enumerate() {
        let radius_screen = ((body.radius * SCALE) as f32).max(2.0);
        let p = to_screen(body.position());

        commands.spawn((
            MaterialMesh2dBundle {
                mesh: Mesh2dHandle(meshes.add(Circle::new(radius_screen))),
                material: materials.add(ColorMaterial::from(Color::srgb(0.53, 0.67, 1.0))),
                transform: Transform::from_xyz(p.x, p.y, 0.0),
                ..Default::default()
            },
            BodyIndex(i),
        ));
    }
}

/// Keyboard -> thrust, time scale, focus, spawning and zoom
fn input_system(keys: Res<ButtonInput<KeyCode>>, mut world: ResMut<World>, mut projections: Query<&mut OrthographicProjection, With<Camera2d>>) {
    let mut thrust = NVec2::zeros();
    if keys.pressed(KeyCode::ArrowUp) { thrust.y += 1.0; }
    if keys.pressed(KeyCode::ArrowDown) { thrust.y -= 1.0; }
    if keys.pressed(KeyCode::ArrowLeft) { thrust.x -= 1.0; }
    if keys.pressed(KeyCode::ArrowRight) { thrust.x += 1.0; }
    world.set_thrust(thrust.try_normalize(f64::EPSILON).unwrap_or_else(NVec2::zeros));

    if keys.just_pressed(KeyCode::Period) { world.scale_time(1); }
    if keys.just_pressed(KeyCode::Comma) { world.scale_time(-1); }

    if keys.just_pressed(KeyCode::Tab) {
        if keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight) {
            world.prev_spacecraft();
        } else {
            world.next_spacecraft();
        }
    }
    if keys.just_pressed(KeyCode::KeyC) { world.clone_current_spacecraft(); }
    if keys.just_pressed(KeyCode::KeyN) { world.add_default_spacecraft(); }

    for mut projection in &mut projections {
        if keys.pressed(KeyCode::KeyZ) { projection.scale /= ZOOM_STEP; }
        if keys.pressed(KeyCode::KeyX) { projection.scale *= ZOOM_STEP; }
    }
}

fn physics_step_system(time: Res<Time>, mut world: ResMut<World>) {
    world.tick(time.delta_seconds() as f64);
}

/// Move body meshes and keep the camera on the current spacecraft
fn sync_transforms_system(world: Res<World>, mut bodies: Query<(&BodyIndex, &mut Transform)>, mut cameras: Query<&mut Transform, (With<Camera2d>, Without<BodyIndex>)>) {
    for (BodyIndex(i), mut transform) in &mut bodies {
        if let Some(b) = world.massive_bodies().get(*i) {
            let p = to_screen(b.position());
            transform.translation.x = p.x;
            transform.translation.y = p.y;
        }
    }

    if let Some(craft) = world.current_craft() {
        let p = to_screen(craft.position());
        for mut transform in &mut cameras {
            transform.translation.x = p.x;
            transform.translation.y = p.y;
        }
    }
}

/// Sample a conic: the whole ellipse, or a hyperbola up to just short of its asymptotes
fn conic_points(orbit: &OrbitalPos) -> Vec<Vec2> {
    let (start, span) = match orbit.true_anomaly_limit() {
        Some(limit) => (-0.98 * limit, 2.0 * 0.98 * limit),
        None => (0.0, TAU),
    };
    (0..=ORBIT_SEGMENTS)
        .map(|i| start + span * i as f64 / ORBIT_SEGMENTS as f64)
        .map(|nu| to_screen(orbit.point_at(nu)))
        .collect()
}

fn draw_orbit(gizmos: &mut Gizmos, orbit: &OrbitalPos, color: Color) {
    if orbit.is_degenerate() {
        return;
    }
    gizmos.linestrip_2d(conic_points(orbit), color);
    gizmos.circle_2d(to_screen(orbit.periapsis()), CRAFT_MARKER, Color::srgb(1.0, 0.0, 0.0));
    if let Some(apoapsis) = orbit.apoapsis() {
        gizmos.circle_2d(to_screen(apoapsis), CRAFT_MARKER, Color::srgb(0.0, 1.0, 0.0));
    }
}

fn draw_orbits_system(world: Res<World>, mut gizmos: Gizmos) {
    let gray = Color::srgb(0.5, 0.5, 0.5);

    for body in world.massive_bodies() {
        if let Some(orbit) = body.orbit() {
            draw_orbit(&mut gizmos, orbit, gray);
        }
    }

    let current = world.current_craft_id();
    for craft in world.spacecraft() {
        let color = if Some(craft.id) == current { Color::WHITE } else { gray };
        gizmos.circle_2d(to_screen(craft.position()), CRAFT_MARKER, color);

        if craft.crashed_into().is_some() {
            continue;
        }
        if let Some(orbit) = craft.orbit() {
            draw_orbit(&mut gizmos, orbit, color);
        }
    }
}
