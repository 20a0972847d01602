use bevy::{
    asset::LoadState,
    color::palettes::css::WHITE,
    diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin},
    gltf::GltfAssetLabel,
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};

use kart_circuit::PlayerKart;
use kart_circuit::layout_format::LayoutFile;
use kart_circuit::motion::{self, DriveInput, KartMotion, MotionTuning};
use kart_circuit::scene;

fn main() {
    let layout_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/circuit.toml".to_string());

    App::new()
        .add_plugins((DefaultPlugins, FrameTimeDiagnosticsPlugin::default()))
        .insert_resource(ClearColor(Color::srgb(0.53, 0.81, 0.92)))
        .insert_resource(LayoutPath(layout_path))
        .insert_resource(MotionTuning::default())
        .insert_resource(OrbitCamera::default())
        .add_systems(Startup, (setup_scene, setup.after(setup_scene)))
        .add_systems(
            Update,
            (
                poll_kart_scene,
                drive_kart,
                update_camera,
                update_fps_counter,
                update_speed_readout,
            ),
        )
        .run();
}

#[derive(Resource)]
struct LayoutPath(String);

/// The kart model is loaded asynchronously; this tracks where it stands.
/// Driving is a no-op until the entity exists, and a failed load leaves the
/// scene running without a kart.
#[derive(Resource)]
struct KartAsset {
    scene: Handle<Scene>,
    status: KartStatus,
}

#[derive(Debug, PartialEq, Eq)]
enum KartStatus {
    Loading,
    Spawned,
    Failed,
}

/// Camera orbit state around the circuit centre.
#[derive(Resource)]
struct OrbitCamera {
    yaw: f32,
    pitch: f32,
    radius: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        // Start nearly overhead, matching the fixed top-down opening shot.
        Self {
            yaw: 0.0,
            pitch: 1.45,
            radius: 100.0,
        }
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    layout_path: Res<LayoutPath>,
) {
    let layout = LayoutFile::load(std::path::Path::new(&layout_path.0))
        .unwrap_or_else(|_| panic!("Failed to load layout file: {}", layout_path.0));
    info!(
        "Loaded layout '{}' ({} signs)",
        layout.metadata.name,
        layout.signs.len()
    );

    scene::spawn_driving_surface(&mut commands, &mut meshes, &mut materials, &layout.surface);
    scene::spawn_stand(&mut commands, &mut meshes, &mut materials, &layout.stand);
    scene::spawn_starting_line_arc(
        &mut commands,
        &mut meshes,
        &mut materials,
        &layout.starting_arc,
    );
    for sign in &layout.signs {
        scene::spawn_sign(&mut commands, &mut meshes, &mut materials, &asset_server, sign);
    }
    scene::spawn_finish_line(
        &mut commands,
        &mut meshes,
        &mut materials,
        &asset_server,
        &layout.finish_line,
    );
    scene::spawn_pit_stop(&mut commands, &mut meshes, &mut materials, &layout.pit_stop);
    scene::spawn_circular_track(&mut commands, &mut meshes, &mut materials, &layout.track);

    // Lights only affect the kart model; the dressing materials are unlit.
    commands.spawn((
        DirectionalLight {
            illuminance: 5_000.0,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 7.5).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        PointLight {
            range: 100.0,
            ..default()
        },
        Transform::from_xyz(-5.0, 5.0, 5.0),
    ));
    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
        ..default()
    });
}

fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
    // FPS counter
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.55)),
        Text::new("FPS: --"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(WHITE.into()),
        FpsCounterText,
    ));

    // Speed readout
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(40.0),
            left: Val::Px(8.0),
            padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.55)),
        Text::new("Speed: 0.00"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(WHITE.into()),
        SpeedReadoutText,
    ));

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 75.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Transform::from_xyz(0.0, 100.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
    ));

    commands.insert_resource(KartAsset {
        scene: asset_server.load(GltfAssetLabel::Scene(0).from_asset("kart.glb")),
        status: KartStatus::Loading,
    });
}

#[derive(Component)]
struct FpsCounterText;

#[derive(Component)]
struct SpeedReadoutText;

/// Poll the kart scene handle once per frame and spawn the drivable kart
/// when it arrives. A failed load is reported once and then left alone.
fn poll_kart_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut kart: ResMut<KartAsset>,
) {
    if kart.status != KartStatus::Loading {
        return;
    }

    match asset_server.get_load_state(kart.scene.id()) {
        Some(LoadState::Loaded) => {
            commands.spawn((
                SceneRoot(kart.scene.clone()),
                Transform::from_xyz(0.0, 0.0, 0.0).with_scale(Vec3::splat(0.1)),
                KartMotion::default(),
                PlayerKart,
            ));
            kart.status = KartStatus::Spawned;
            info!("Kart model loaded, driving enabled");
        }
        Some(LoadState::Failed(error)) => {
            warn!("Kart model failed to load, scene stays static: {error}");
            kart.status = KartStatus::Failed;
        }
        _ => {}
    }
}

fn drive_kart(
    keyboard: Res<ButtonInput<KeyCode>>,
    tuning: Res<MotionTuning>,
    mut kart_query: Query<(&mut KartMotion, &mut Transform), With<PlayerKart>>,
) {
    let input = DriveInput {
        forward: keyboard.pressed(KeyCode::KeyW),
        reverse: keyboard.pressed(KeyCode::KeyS),
        left: keyboard.pressed(KeyCode::KeyA),
        right: keyboard.pressed(KeyCode::KeyD),
    };

    for (mut kart_motion, mut transform) in &mut kart_query {
        motion::integrate(&mut kart_motion, &mut transform.translation, &input, &tuning);
        transform.rotation = Quat::from_rotation_y(kart_motion.yaw);
    }
}

fn update_camera(
    mut orbit: ResMut<OrbitCamera>,
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut scroll_events: MessageReader<MouseWheel>,
    mut motion_events: MessageReader<MouseMotion>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    for event in scroll_events.read() {
        let zoom_delta = match event.unit {
            bevy::input::mouse::MouseScrollUnit::Line => event.y * 0.1,
            bevy::input::mouse::MouseScrollUnit::Pixel => event.y * 0.001,
        };

        orbit.radius *= 1.0 - zoom_delta;
        orbit.radius = orbit.radius.clamp(1.0, 200.0);
    }

    // Middle-mouse or right-mouse drag to orbit; no panning.
    if mouse_buttons.pressed(MouseButton::Middle) || mouse_buttons.pressed(MouseButton::Right) {
        for event in motion_events.read() {
            orbit.yaw -= event.delta.x * 0.005;
            orbit.pitch = (orbit.pitch + event.delta.y * 0.005).clamp(-1.54, 1.54);
        }
    }

    let offset = Vec3::new(
        orbit.pitch.cos() * orbit.yaw.sin(),
        orbit.pitch.sin(),
        orbit.pitch.cos() * orbit.yaw.cos(),
    ) * orbit.radius;
    *camera_transform = Transform::from_translation(offset).looking_at(Vec3::ZERO, Vec3::Y);
}

fn update_fps_counter(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsCounterText>>,
) {
    let Ok(mut text) = query.single_mut() else {
        return;
    };

    if let Some(fps) = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|value| value.smoothed())
    {
        text.0 = format!("FPS: {fps:>3.0}");
    }
}

fn update_speed_readout(
    kart_query: Query<&KartMotion, With<PlayerKart>>,
    mut query: Query<&mut Text, With<SpeedReadoutText>>,
) {
    let Ok(mut text) = query.single_mut() else {
        return;
    };
    let Ok(kart_motion) = kart_query.single() else {
        return;
    };

    text.0 = format!("Speed: {:.2}", kart_motion.velocity.length());
}
