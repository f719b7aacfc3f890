use bevy::prelude::*;
use bevy::time::{Fixed, Virtual};

use crate::simulation::engine::Simulation;
use crate::simulation::orbit_path::{OrbitLine, OrbitPath};
use crate::simulation::scenario::Scenario;
use crate::simulation::states::NVec3;

/// Component tagging each sphere with its body index into `Simulation::system.bodies`
#[derive(Component)]
struct BodyIndex(pub usize);

/// Marker for the playback/calendar overlay
#[derive(Component)]
struct Hud;

/// Point light kept on the star, which wobbles about the barycentre
#[derive(Component)]
struct StarLight(usize);

/// Visual radius per body, world units
#[derive(Resource)]
struct BodyRadii(Vec<f64>);

/// Pre-recorded orbit lines, each drawn around its anchor body
#[derive(Resource)]
struct OrbitLines(Vec<OrbitLine>);

/// Simulation units -> world units (1 AU = 75 world units)
const SCALE3D: f32 = 0.05;

/// Camera height and distance from the origin
const CAMERA_HEIGHT: f32 = 1200.0;
const CAMERA_DISTANCE: f32 = 2400.0;

/// Open the 3D viewer. One simulation tick runs per `FixedUpdate`; the fixed
/// timestep follows the active granularity's step size and virtual time runs at
/// the playback speed.
pub fn run_viewer(scenario: Scenario) {
    let Scenario { simulation, radii, orbit_lines } = scenario;

    let step = simulation.step_size();

    App::new()
        .add_plugins(DefaultPlugins)
        .insert_resource(Time::<Fixed>::from_seconds(step))
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 40.0,
        })
        .insert_resource(simulation)
        .insert_resource(BodyRadii(radii))
        .insert_resource(OrbitLines(orbit_lines))
        .add_systems(Startup, (setup_3d, log_ready))
        .add_systems(FixedUpdate, physics_tick)
        .add_systems(
            Update,
            (keyboard_controls, sync_playback, sync_transforms_3d, draw_orbit_lines, update_hud).chain(),
        )
        .run();
}

/// Startup system: spawn camera, sunlight, HUD and one sphere per body
fn setup_3d(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    simulation: Res<Simulation>,
    radii: Res<BodyRadii>,
) {
    commands.spawn(Camera3dBundle {
        camera: Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb(0.0, 0.0, 0.0)), // pure black
            ..Default::default()
        },
        transform: Transform::from_xyz(0.0, CAMERA_HEIGHT, CAMERA_DISTANCE)
            .looking_at(Vec3::ZERO, Vec3::Y),
        ..Default::default()
    });

    // The heaviest body is treated as the star: it emits light and is drawn unlit
    let star = heaviest_body(&simulation);

    if let Some(s) = star {
        let b = &simulation.bodies()[s];
        commands.spawn((
            PointLightBundle {
                point_light: PointLight {
                    intensity: 5.0e9,
                    range: 10_000.0,
                    shadows_enabled: false,
                    ..Default::default()
                },
                transform: Transform::from_translation(world_position(&b.x)),
                ..Default::default()
            },
            StarLight(s),
        ));
    }

    for (i, b) in simulation.bodies().iter().enumerate() {
        // Ensure a minimum visual radius so tiny bodies are still visible
        let radius = radii.0.get(i).copied().unwrap_or(1.0).max(0.1) as f32;
        let is_star = Some(i) == star;

        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Sphere::new(radius).mesh()),
                material: materials.add(StandardMaterial {
                    base_color: if is_star { Color::srgb(1.0, 0.85, 0.4) } else { Color::srgb(0.8, 0.8, 0.85) },
                    unlit: is_star,
                    ..Default::default()
                }),
                transform: Transform::from_translation(world_position(&b.x)),
                ..Default::default()
            },
            BodyIndex(i),
        ));
    }

    commands.spawn((
        TextBundle::from_section(
            String::new(),
            TextStyle {
                font_size: 22.0,
                color: Color::WHITE,
                ..Default::default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..Default::default()
        }),
        Hud,
    ));
}

fn heaviest_body(simulation: &Simulation) -> Option<usize> {
    simulation
        .bodies()
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.m.total_cmp(&b.m))
        .map(|(i, _)| i)
}

fn world_position(x: &NVec3) -> Vec3 {
    Vec3::new(x.x as f32, x.y as f32, x.z as f32) * SCALE3D
}

/// World-space points of `path` offset by the anchor's current position
fn anchored_points<'a>(path: &'a OrbitPath, anchor: &'a NVec3) -> impl Iterator<Item = Vec3> + 'a {
    path.positions
        .iter()
        .map(move |p| world_position(&(anchor + NVec3::new(p[0], p[1], p[2]))))
}

fn log_ready(simulation: Res<Simulation>) {
    info!(
        bodies = simulation.bodies().len(),
        granularity = %simulation.time.applied(),
        "simulation ready"
    );
}

/// Fixed-step physics: exactly one simulation tick
fn physics_tick(mut simulation: ResMut<Simulation>) {
    simulation.tick();
}

/// Up/Down: coarser/finer granularity. Right/Left: faster/slower (through zero into reverse).
/// Space: pause/resume. R: flip direction.
fn keyboard_controls(
    keys: Res<ButtonInput<KeyCode>>,
    mut simulation: ResMut<Simulation>,
    mut resume_speed: Local<Option<u32>>,
) {
    let time = &mut simulation.time;

    if keys.just_pressed(KeyCode::ArrowUp) {
        time.coarser();
    }
    if keys.just_pressed(KeyCode::ArrowDown) {
        time.finer();
    }
    if keys.just_pressed(KeyCode::ArrowRight) {
        time.faster();
    }
    if keys.just_pressed(KeyCode::ArrowLeft) {
        time.slower();
    }
    if keys.just_pressed(KeyCode::KeyR) {
        time.toggle_direction();
    }
    if keys.just_pressed(KeyCode::Space) {
        if time.is_paused() {
            time.set_speed(resume_speed.take().unwrap_or(1).max(1));
        } else {
            *resume_speed = Some(time.speed());
            time.pause();
        }
    }
}

/// Keep bevy's fixed timestep and virtual clock in line with the playback state
fn sync_playback(
    simulation: Res<Simulation>,
    mut fixed: ResMut<Time<Fixed>>,
    mut virtual_time: ResMut<Time<Virtual>>,
) {
    let time = &simulation.time;

    let step = simulation.parameters.step(time.granularity());
    if (fixed.timestep().as_secs_f64() - step).abs() > f64::EPSILON {
        fixed.set_timestep_seconds(step);
    }

    if time.is_paused() {
        if !virtual_time.is_paused() {
            virtual_time.pause();
        }
    } else {
        if virtual_time.is_paused() {
            virtual_time.unpause();
        }
        virtual_time.set_relative_speed(time.speed() as f32);
    }
}

fn sync_transforms_3d(
    simulation: Res<Simulation>,
    mut spheres: Query<(&BodyIndex, &mut Transform), Without<StarLight>>,
    mut lights: Query<(&StarLight, &mut Transform), Without<BodyIndex>>,
) {
    let bodies = simulation.bodies();
    for (BodyIndex(i), mut transform) in &mut spheres {
        if let Some(b) = bodies.get(*i) {
            transform.translation = world_position(&b.x);
            transform.rotation = Quat::from_rotation_y(b.angle as f32);
        }
    }
    for (StarLight(i), mut transform) in &mut lights {
        if let Some(b) = bodies.get(*i) {
            transform.translation = world_position(&b.x);
        }
    }
}

/// Loaded orbit lines plus the path being recorded live, each around its anchor
fn draw_orbit_lines(simulation: Res<Simulation>, lines: Res<OrbitLines>, mut gizmos: Gizmos) {
    let bodies = simulation.bodies();

    for line in &lines.0 {
        if let Some(anchor) = bodies.get(line.anchor) {
            gizmos.linestrip(anchored_points(&line.path, &anchor.x), Color::srgb(0.35, 0.45, 0.6));
        }
    }

    if let Some(recorder) = &simulation.recorder {
        if let Some(anchor) = bodies.get(recorder.anchor()) {
            gizmos.linestrip(anchored_points(recorder.path(), &anchor.x), Color::srgb(0.9, 0.6, 0.3));
        }
    }
}

fn update_hud(simulation: Res<Simulation>, mut query: Query<&mut Text, With<Hud>>) {
    for mut text in &mut query {
        text.sections[0].value = format!("{}\n{}", simulation.time, simulation.clock.label());
    }
}
