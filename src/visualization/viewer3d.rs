use bevy::prelude::*;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::primitives::{Cone, Cuboid, Cylinder, Sphere, Tetrahedron};
use bevy::pbr::wireframe::{Wireframe, WireframeColor, WireframePlugin};
use bevy::render::render_resource::WgpuFeatures;
use bevy::render::settings::{RenderCreation, WgpuSettings};
use bevy::render::RenderPlugin;
use bevy::window::PrimaryWindow;

use crate::animation::controller::ExplosionController;
use crate::animation::engine::Shape;
use crate::animation::scenario::Show;
use crate::animation::states::{ControllerEvent, NVec3};
use crate::visualization::camera::{CameraRig, OVERVIEW_POSITION};
use crate::visualization::orbit::OrbitControls;
use crate::visualization::picking::nearest_hit;
use crate::visualization::tuning::{stepped_rotation_speed, ViewTuning};

/// Component tagging the intact shape
#[derive(Component)]
struct CentralMesh;

/// Component tagging each fragment mesh with its index into the controller's fragments
#[derive(Component)]
struct FragmentIndex(pub usize);

/// Component tagging each spark with its index into the controller's particles
#[derive(Component)]
struct ParticleIndex(pub usize);

#[derive(Component)]
struct MainCamera;

#[derive(Component)]
struct InfoPanel;

/// The light the intensity knob drives
#[derive(Component)]
struct KeyLight;

/// Show settings the viewer needs beyond the controller
#[derive(Resource)]
struct ShowSettings {
    shape: Shape,
}

const SPARK_COLOR: u32 = 0xffa040;
const FRAGMENT_OPACITY: f32 = 0.7;

/// Bounding radius of the central shape at scale 1 (hexagon radius 2.5)
const BODY_PICK_RADIUS: f32 = 2.5;
/// Bounding radius of a fragment at scale 1
const FRAGMENT_PICK_RADIUS: f32 = 0.8;

const SPEED_STEP: f64 = 0.25;

/// Wheel travel in pixels that counts as one line step
const PIXELS_PER_LINE: f32 = 40.0;

const DIGITS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// Open the window and run the show until it is closed
pub fn run_show(show: Show) {
    let Show { engine, controller } = show;

    App::new()
        .insert_resource(controller)
        .insert_resource(ShowSettings { shape: engine.shape })
        .insert_resource(CameraRig::default())
        .insert_resource(OrbitControls::from_pose(OVERVIEW_POSITION, Vec3::ZERO))
        .insert_resource(ViewTuning::default())
        .insert_resource(ClearColor(Color::WHITE))
        .add_plugins((
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: engine.title,
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .set(RenderPlugin {
                    // line polygon mode for the wireframe overlays
                    render_creation: RenderCreation::Automatic(WgpuSettings {
                        features: WgpuFeatures::POLYGON_MODE_LINE,
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
            WireframePlugin,
        ))
        .add_systems(Startup, setup_show)
        .add_systems(
            Update,
            (
                orbit_input_system,
                input_system,
                tuning_input_system,
                step_system,
                events_system,
                sync_body,
                sync_fragments,
                sync_particles,
                wireframe_system,
                light_system,
                camera_system,
                info_panel_system,
            )
                .chain(),
        )
        .run();
}

fn to_vec3(v: &NVec3) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

fn to_quat(rot: &NVec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, rot.x as f32, rot.y as f32, rot.z as f32)
}

/// 0xRRGGBB + alpha -> bevy color
fn hex_color(hex: u32, alpha: f32) -> Color {
    let r = ((hex >> 16) & 0xff) as u8;
    let g = ((hex >> 8) & 0xff) as u8;
    let b = (hex & 0xff) as u8;
    Color::srgba_u8(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0) as u8)
}

fn blended(hex: u32, alpha: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: hex_color(hex, alpha),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 0.3,
        ..Default::default()
    }
}

/// Startup system: camera, lights, the central shape and the info panel
fn setup_show(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<ShowSettings>,
    tuning: Res<ViewTuning>,
    ctl: Res<ExplosionController>,
) {
    info!("starting viewer with {} labels, shape {:?}", ctl.labels().len(), settings.shape);

    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(OVERVIEW_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
            ..Default::default()
        },
        MainCamera,
    ));

    // Ambient for even fill, one key light and two tinted fills
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
    });
    commands.spawn((
        DirectionalLightBundle {
            directional_light: DirectionalLight {
                illuminance: tuning.key_light_lux(),
                shadows_enabled: true,
                ..Default::default()
            },
            transform: Transform::from_xyz(10.0, 10.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
            ..Default::default()
        },
        KeyLight,
    ));
    for (hex, lux, pos) in [
        (0x4a4aff, 2500.0, Vec3::new(-10.0, 0.0, 5.0)),
        (0xd4e157, 1500.0, Vec3::new(0.0, -10.0, 5.0)),
    ] {
        commands.spawn(DirectionalLightBundle {
            directional_light: DirectionalLight {
                color: hex_color(hex, 1.0),
                illuminance: lux,
                ..Default::default()
            },
            transform: Transform::from_translation(pos).looking_at(Vec3::ZERO, Vec3::Y),
            ..Default::default()
        });
    }

    // Central shape
    let mesh = match settings.shape {
        Shape::Hexagon => meshes.add(Cylinder::new(2.5, 2.25).mesh().resolution(6)),
        Shape::Sphere => meshes.add(Sphere::new(2.5).mesh().uv(48, 32)),
    };
    let body = ctl.body();
    commands.spawn((
        PbrBundle {
            mesh,
            material: materials.add(blended(tuning.body_color(), body.opacity as f32)),
            transform: Transform::from_scale(Vec3::splat(body.scale as f32)),
            ..Default::default()
        },
        CentralMesh,
    ));

    commands.spawn((
        TextBundle::from_section(
            "",
            TextStyle {
                font_size: 18.0,
                color: Color::srgb(0.1, 0.1, 0.2),
                ..Default::default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            max_width: Val::Px(440.0),
            ..Default::default()
        }),
        InfoPanel,
    ));
}

/// Mesh for fragment `i`: six shapes in rotation
fn fragment_mesh(i: usize, meshes: &mut Assets<Mesh>) -> Handle<Mesh> {
    match i % 6 {
        0 => meshes.add(Cuboid::new(1.2, 1.2, 0.6).mesh()),
        1 => meshes.add(Sphere::new(0.7).mesh().uv(12, 8)),
        2 => meshes.add(Cylinder::new(0.6, 1.0).mesh().resolution(8)),
        3 => meshes.add(Cone { radius: 0.7, height: 1.2 }.mesh()),
        4 => {
            let ico = Sphere::new(0.8).mesh().ico(0).unwrap_or_else(|_| Mesh::from(Sphere::new(0.8)));
            meshes.add(ico)
        }
        _ => meshes.add(Tetrahedron::default().mesh()),
    }
}

// ========================================================================================
// Input
// ========================================================================================

fn input_system(
    keys: Res<ButtonInput<KeyCode>>,
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform, &Transform), With<MainCamera>>,
    orbit: Res<OrbitControls>,
    mut ctl: ResMut<ExplosionController>,
    mut rig: ResMut<CameraRig>,
) {
    let Ok((camera, camera_gt, camera_tf)) = cameras.get_single() else {
        return;
    };
    let camera_pos = camera_tf.translation;

    if keys.just_pressed(KeyCode::Space) {
        ctl.trigger_explode();
    }
    if keys.just_pressed(KeyCode::KeyG) {
        ctl.trigger_gravity_pull();
    }
    if keys.just_pressed(KeyCode::KeyR) {
        ctl.reset();
        rig.fly_to_overview(camera_pos);
    }
    if keys.just_pressed(KeyCode::Escape) && ctl.focused().is_some() {
        ctl.clear_focus();
        rig.fly_to_overview(camera_pos);
    }
    if keys.just_pressed(KeyCode::ArrowUp) {
        let m = ctl.params().speed_multiplier + SPEED_STEP;
        ctl.set_speed_multiplier(m);
    }
    if keys.just_pressed(KeyCode::ArrowDown) {
        let m = ctl.params().speed_multiplier - SPEED_STEP;
        ctl.set_speed_multiplier(m);
    }
    for (i, key) in DIGITS.iter().enumerate() {
        if keys.just_pressed(*key) {
            focus_fragment(&mut ctl, &mut rig, camera_pos, i);
        }
    }

    // A press that turned into an orbit drag is not a click
    if !buttons.just_released(MouseButton::Left) || !orbit.is_click() {
        return;
    }
    let Some(cursor) = windows.get_single().ok().and_then(|w| w.cursor_position()) else {
        return;
    };
    let Some(ray) = camera.viewport_to_world(camera_gt, cursor) else {
        return;
    };

    // Body gets index n, fragments 0..n
    let n = ctl.fragments().len();
    let mut candidates: Vec<(usize, Vec3, f32)> = ctl
        .fragments()
        .iter()
        .enumerate()
        .filter(|(_, f)| f.visible)
        .map(|(i, f)| (i, to_vec3(&f.body.x), FRAGMENT_PICK_RADIUS * f.scale as f32))
        .collect();
    let body = ctl.body();
    if body.visible {
        candidates.push((n, Vec3::ZERO, BODY_PICK_RADIUS * body.scale as f32));
    }

    match nearest_hit(ray.origin, *ray.direction, candidates) {
        Some(i) if i == n => ctl.trigger_explode(),
        Some(i) => focus_fragment(&mut ctl, &mut rig, camera_pos, i),
        None => {}
    }
}

fn focus_fragment(ctl: &mut ExplosionController, rig: &mut CameraRig, camera_pos: Vec3, i: usize) {
    if ctl.focused() == Some(i) {
        return;
    }
    if ctl.focus(i).is_some() {
        let target = to_vec3(&ctl.fragments()[i].body.x);
        rig.fly_to_focus(camera_pos, target);
    }
}

/// Left-drag orbits, the wheel zooms; both wait while a fly is running
fn orbit_input_system(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    mut wheel: EventReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    rig: Res<CameraRig>,
    mut orbit: ResMut<OrbitControls>,
) {
    if buttons.just_pressed(MouseButton::Left) {
        orbit.begin_drag();
    }

    let delta: Vec2 = motion.read().map(|m| m.delta).sum();
    let steps: f32 = wheel
        .read()
        .map(|w| match w.unit {
            MouseScrollUnit::Line => w.y,
            MouseScrollUnit::Pixel => w.y / PIXELS_PER_LINE,
        })
        .sum();

    if rig.tween.is_some() {
        return;
    }
    if buttons.pressed(MouseButton::Left) && delta != Vec2::ZERO {
        let height = windows.get_single().map(|w| w.height()).unwrap_or(720.0);
        orbit.rotate(delta, height);
    }
    if steps != 0.0 {
        orbit.zoom(steps);
    }
}

/// Rotation speed, body color, light intensity and wireframe keys
fn tuning_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut ctl: ResMut<ExplosionController>,
    mut tuning: ResMut<ViewTuning>,
) {
    if keys.just_pressed(KeyCode::BracketRight) {
        let speed = stepped_rotation_speed(ctl.params().rotation_speed, 1.0);
        ctl.set_rotation_speed(speed);
    }
    if keys.just_pressed(KeyCode::BracketLeft) {
        let speed = stepped_rotation_speed(ctl.params().rotation_speed, -1.0);
        ctl.set_rotation_speed(speed);
    }
    if keys.just_pressed(KeyCode::KeyC) {
        let color = tuning.next_body_color();
        debug!("body color #{:06x}", color);
    }
    if keys.just_pressed(KeyCode::Equal) {
        tuning.adjust_light(1.0);
    }
    if keys.just_pressed(KeyCode::Minus) {
        tuning.adjust_light(-1.0);
    }
    if keys.just_pressed(KeyCode::KeyW) {
        let on = tuning.toggle_wireframe();
        debug!("wireframes {}", if on { "on" } else { "off" });
    }
}

// ========================================================================================
// Per-frame controller step and scene bookkeeping
// ========================================================================================

fn step_system(time: Res<Time>, mut ctl: ResMut<ExplosionController>) {
    ctl.tick(time.delta_seconds_f64());
}

/// Net scene changes for one frame's controller events
#[derive(Debug, Default, PartialEq)]
struct ScenePlan {
    clear: bool, // despawn the fragments and sparks that already exist
    spawn_fragments: usize,
    spawn_particles: usize,
    fly_to_overview: bool,
}

/// Spawn counts come from what the controller still holds after the whole
/// batch, so a reset later in the same frame cancels an earlier spawn.
fn plan_scene(events: &[ControllerEvent], live_fragments: usize, live_particles: usize) -> ScenePlan {
    let mut plan = ScenePlan::default();
    for event in events {
        match event {
            ControllerEvent::FragmentsSpawned(_) => plan.spawn_fragments = live_fragments,
            ControllerEvent::ParticlesSpawned(_) => plan.spawn_particles = live_particles,
            ControllerEvent::CollapseStarted => plan.fly_to_overview = true,
            ControllerEvent::Reformed | ControllerEvent::Reset => {
                plan.clear = true;
                plan.spawn_fragments = 0;
                plan.spawn_particles = 0;
            }
            ControllerEvent::Launched | ControllerEvent::Exploded | ControllerEvent::ReformStarted => {}
        }
    }
    plan
}

/// Create / destroy fragment and spark entities as the controller reports changes
#[allow(clippy::too_many_arguments)]
fn events_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut ctl: ResMut<ExplosionController>,
    mut rig: ResMut<CameraRig>,
    fragments: Query<Entity, With<FragmentIndex>>,
    particles: Query<Entity, With<ParticleIndex>>,
    cameras: Query<&Transform, With<MainCamera>>,
) {
    let events = ctl.drain_events();
    if events.is_empty() {
        return;
    }
    debug!("controller events {:?}", events);
    let plan = plan_scene(&events, ctl.fragments().len(), ctl.particles().len());

    if plan.clear {
        for e in fragments.iter().chain(particles.iter()) {
            commands.entity(e).despawn_recursive();
        }
    }

    for (i, f) in ctl.fragments().iter().enumerate().take(plan.spawn_fragments) {
        commands.spawn((
            PbrBundle {
                mesh: fragment_mesh(i, &mut meshes),
                material: materials.add(blended(f.label.color, FRAGMENT_OPACITY)),
                transform: Transform::from_translation(to_vec3(&f.body.x)).with_scale(Vec3::splat(f.scale as f32)),
                ..Default::default()
            },
            FragmentIndex(i),
        ));
    }

    if plan.spawn_particles > 0 {
        let mesh = meshes.add(Sphere::new(1.0).mesh().ico(1).unwrap_or_else(|_| Mesh::from(Sphere::new(1.0))));
        for i in 0..plan.spawn_particles {
            commands.spawn((
                PbrBundle {
                    mesh: mesh.clone(),
                    material: materials.add(StandardMaterial {
                        base_color: hex_color(SPARK_COLOR, 1.0),
                        emissive: LinearRgba::rgb(1.0, 0.5, 0.1),
                        alpha_mode: AlphaMode::Blend,
                        unlit: true,
                        ..Default::default()
                    }),
                    transform: Transform::from_scale(Vec3::ZERO),
                    ..Default::default()
                },
                ParticleIndex(i),
            ));
        }
    }

    // Focus is dropped when the collapse starts
    if plan.fly_to_overview {
        if let Ok(tf) = cameras.get_single() {
            if tf.translation != OVERVIEW_POSITION {
                rig.fly_to_overview(tf.translation);
            }
        }
    }
}

// ========================================================================================
// Sync controller state into transforms, visibility and material alpha
// ========================================================================================

fn visibility(visible: bool) -> Visibility {
    if visible {
        Visibility::Visible
    } else {
        Visibility::Hidden
    }
}

fn sync_body(
    ctl: Res<ExplosionController>,
    tuning: Res<ViewTuning>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(&mut Transform, &mut Visibility, &Handle<StandardMaterial>), With<CentralMesh>>,
) {
    let body = ctl.body();
    for (mut transform, mut vis, mat_handle) in &mut query {
        transform.scale = Vec3::splat(body.scale as f32);
        transform.rotation = to_quat(&body.rot);
        *vis = visibility(body.visible);
        if let Some(mat) = materials.get_mut(mat_handle) {
            mat.base_color = hex_color(tuning.body_color(), body.opacity as f32);
        }
    }
}

fn sync_fragments(
    ctl: Res<ExplosionController>,
    mut query: Query<(&FragmentIndex, &mut Transform, &mut Visibility)>,
) {
    let fragments = ctl.fragments();
    for (FragmentIndex(i), mut transform, mut vis) in &mut query {
        if let Some(f) = fragments.get(*i) {
            transform.translation = to_vec3(&f.body.x);
            transform.rotation = to_quat(&f.body.rot);
            transform.scale = Vec3::splat(f.scale as f32);
            *vis = visibility(f.visible);
        }
    }
}

fn sync_particles(
    ctl: Res<ExplosionController>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(&ParticleIndex, &mut Transform, &mut Visibility, &Handle<StandardMaterial>)>,
) {
    let particles = ctl.particles();
    for (ParticleIndex(i), mut transform, mut vis, mat_handle) in &mut query {
        if let Some(q) = particles.get(*i) {
            transform.translation = to_vec3(&q.body.x);
            transform.scale = Vec3::splat(q.scale as f32);
            *vis = visibility(q.visible);
            if let Some(mat) = materials.get_mut(mat_handle) {
                let fade = if q.lifetime > 0.0 { q.life / q.lifetime } else { 0.0 };
                mat.base_color = hex_color(SPARK_COLOR, fade as f32);
            }
        }
    }
}

/// White outlines on the body and fragments, following the toggle
fn wireframe_system(
    mut commands: Commands,
    tuning: Res<ViewTuning>,
    query: Query<(Entity, Has<Wireframe>), Or<(With<CentralMesh>, With<FragmentIndex>)>>,
) {
    for (e, has) in &query {
        if tuning.wireframe && !has {
            commands.entity(e).insert((Wireframe, WireframeColor { color: Color::WHITE }));
        } else if !tuning.wireframe && has {
            commands.entity(e).remove::<Wireframe>();
        }
    }
}

fn light_system(tuning: Res<ViewTuning>, mut query: Query<&mut DirectionalLight, With<KeyLight>>) {
    if !tuning.is_changed() {
        return;
    }
    for mut light in &mut query {
        light.illuminance = tuning.key_light_lux();
    }
}

/// A running fly owns the camera; otherwise the orbit does
fn camera_system(
    time: Res<Time>,
    mut rig: ResMut<CameraRig>,
    mut orbit: ResMut<OrbitControls>,
    mut query: Query<&mut Transform, With<MainCamera>>,
) {
    let (pos, target) = match rig.advance(time.delta_seconds()) {
        Some((pos, target)) => {
            orbit.resync(pos, target);
            (pos, target)
        }
        None => (orbit.update(), orbit.target),
    };
    for mut transform in &mut query {
        *transform = Transform::from_translation(pos).looking_at(target, Vec3::Y);
    }
}

fn info_panel_system(
    ctl: Res<ExplosionController>,
    tuning: Res<ViewTuning>,
    mut query: Query<&mut Text, With<InfoPanel>>,
) {
    let text = match ctl.focused_label() {
        Some(label) => format!("{}\n\n{}\n\n{}\n\n[Esc] back to overview", label.name, label.description, label.link),
        None => format!(
            "state: {:?}\nspeed x{:.2}   rotation {:.4}   light {:.1}   wireframe {}\n\n\
             [Space / click] explode   [G] gravity   [R] reset\n\
             [1-9 / click] focus   [Esc] overview   [drag / wheel] orbit, zoom\n\
             [Up/Down] speed   [ [ / ] ] rotation   [C] color   [- / =] light   [W] wireframe",
            ctl.state(),
            ctl.params().speed_multiplier,
            ctl.params().rotation_speed,
            tuning.light_intensity,
            if tuning.wireframe { "on" } else { "off" },
        ),
    };
    for mut t in &mut query {
        if let Some(section) = t.sections.first_mut() {
            if section.value != text {
                section.value = text.clone();
            }
        }
    }
}
