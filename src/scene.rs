use std::f32::consts::PI;

use bevy::{
    color::palettes::css::{BLACK, BLUE, GRAY, RED, SADDLE_BROWN, WHITE},
    prelude::*,
};

use crate::layout_format::{
    FinishLineLayout, PitStopLayout, SignLayout, StandLayout, StartingArcLayout, SurfaceLayout,
    TrackLayout,
};

/// Positions and yaw alignment for the starting-line arc boxes.
///
/// The arc is centred on the z axis and bows upward: the lift term raises the
/// middle boxes by the sagitta of the arc, so a wider arc angle arches higher.
pub fn arc_positions(radius: f32, arc_angle: f32, segments: usize, y: f32) -> Vec<(Vec3, f32)> {
    // Layout files may specify zero segments; avoid a 0/0 NaN fraction.
    let segments = segments.max(1);
    let lift = radius * (1.0 - (arc_angle / 2.0).cos());
    (0..=segments)
        .map(|i| {
            let frac = i as f32 / segments as f32;
            let theta = frac * arc_angle - arc_angle / 2.0;
            let position = Vec3::new(
                radius * theta.sin(),
                y + lift * (frac * PI).sin(),
                radius * theta.cos(),
            );
            // Align each box tangent to the arc.
            (position, PI / 2.0 - theta)
        })
        .collect()
}

/// Marker-box positions around a full circle. The first and last entries
/// coincide, closing the loop visually.
pub fn circle_positions(radius: f32, segments: usize, y: f32) -> Vec<Vec3> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let theta = (i as f32 / segments as f32) * PI * 2.0;
            Vec3::new(radius * theta.cos(), y, radius * theta.sin())
        })
        .collect()
}

/// The scene dressing is deliberately unlit, flat color: only the kart model
/// carries lit materials.
fn flat_color(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        unlit: true,
        ..default()
    }
}

fn textured_panel(texture: Handle<Image>) -> StandardMaterial {
    StandardMaterial {
        base_color_texture: Some(texture),
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    }
}

/// Spectator stand: a concrete base with rows of seats stepping up and back.
pub fn spawn_stand(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    stand: &StandLayout,
) {
    let (x, y, z) = (stand.x, stand.y, stand.z);

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(50.0, 5.0, 50.0))),
        MeshMaterial3d(materials.add(flat_color(GRAY.into()))),
        Transform::from_xyz(x, y - 2.5, z),
    ));

    let seat_mesh = meshes.add(Cuboid::new(2.0, 1.0, 2.0));
    let seat_material = materials.add(flat_color(RED.into()));

    let num_rows = 10;
    let seats_per_row = 25;
    let seat_spacing = 2.5;
    let row_spacing = 1.5;

    for seat in 0..=seats_per_row {
        let i = seat as f32 - seats_per_row as f32 / 2.0;
        for row in 0..num_rows {
            let j = row as f32;
            commands.spawn((
                Mesh3d(seat_mesh.clone()),
                MeshMaterial3d(seat_material.clone()),
                Transform::from_xyz(
                    x + i * seat_spacing,
                    y + j * row_spacing,
                    z - 15.0 + j * row_spacing,
                ),
            ));
        }
    }
}

pub fn spawn_driving_surface(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    surface: &SurfaceLayout,
) {
    let mut material = flat_color(Color::srgb_u8(0x94, 0x92, 0x8e));
    material.double_sided = true;
    material.cull_mode = None;

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(surface.width, surface.height))),
        MeshMaterial3d(materials.add(material)),
        Transform::from_xyz(surface.x, surface.y, surface.z),
    ));
}

pub fn spawn_starting_line_arc(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    arc: &StartingArcLayout,
) {
    let box_mesh = meshes.add(Cuboid::new(0.5, 0.1, 0.5));
    let box_material = materials.add(flat_color(WHITE.into()));

    for (position, yaw) in arc_positions(arc.radius, arc.angle, arc.segments, arc.y) {
        commands.spawn((
            Mesh3d(box_mesh.clone()),
            MeshMaterial3d(box_material.clone()),
            Transform::from_translation(position).with_rotation(Quat::from_rotation_y(yaw)),
        ));
    }
}

/// Signpost with a textured panel on top, facing back along the z axis.
pub fn spawn_sign(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    asset_server: &AssetServer,
    sign: &SignLayout,
) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(0.2, sign.y, 0.2))),
        MeshMaterial3d(materials.add(flat_color(SADDLE_BROWN.into()))),
        Transform::from_xyz(sign.x, sign.y / 2.0, sign.z),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Rectangle::new(sign.width, sign.height))),
        MeshMaterial3d(materials.add(textured_panel(asset_server.load(sign.texture.clone())))),
        Transform::from_xyz(sign.x, sign.y + sign.height / 2.0, sign.z)
            .with_rotation(Quat::from_rotation_y(PI)),
    ));
}

/// Checkered banner strung between two posts across the track.
pub fn spawn_finish_line(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    asset_server: &AssetServer,
    finish: &FinishLineLayout,
) {
    commands.spawn((
        Mesh3d(meshes.add(Rectangle::new(finish.width, finish.height))),
        MeshMaterial3d(materials.add(textured_panel(asset_server.load(finish.texture.clone())))),
        Transform::from_xyz(finish.x, finish.y + finish.height / 2.0, finish.z)
            .with_rotation(Quat::from_rotation_y(PI / 2.0)),
    ));

    let post_mesh = meshes.add(Cuboid::new(0.2, finish.height, 0.2));
    let post_material = materials.add(flat_color(BLACK.into()));

    commands.spawn((
        Mesh3d(post_mesh.clone()),
        MeshMaterial3d(post_material.clone()),
        Transform::from_xyz(
            finish.x,
            finish.y + finish.height / 2.0,
            finish.z - finish.width / 2.0,
        ),
    ));
    commands.spawn((
        Mesh3d(post_mesh),
        MeshMaterial3d(post_material),
        Transform::from_xyz(
            finish.x,
            finish.y + finish.height / 2.0,
            finish.z + finish.width / 2.0,
        ),
    ));
}

/// Pit-stop props: toolbox, a stack of four tires, and a spare part.
pub fn spawn_pit_stop(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    pit: &PitStopLayout,
) {
    let (x, y, z) = (pit.x, pit.y, pit.z);

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(2.0, 1.0, 1.0))),
        MeshMaterial3d(materials.add(flat_color(BLUE.into()))),
        Transform::from_xyz(x, y, z),
    ));

    let tire_mesh = meshes.add(Cylinder::new(0.5, 0.3));
    let tire_material = materials.add(flat_color(BLACK.into()));
    for i in 0..4 {
        commands.spawn((
            Mesh3d(tire_mesh.clone()),
            MeshMaterial3d(tire_material.clone()),
            Transform::from_xyz(x + 2.0, y + i as f32 * 0.35, z),
        ));
    }

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(1.0, 0.5, 0.5))),
        MeshMaterial3d(materials.add(flat_color(Color::srgb_u8(0x88, 0x88, 0x88)))),
        Transform::from_xyz(x + 4.0, y, z),
    ));
}

pub fn spawn_circular_track(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    track: &TrackLayout,
) {
    let marker_mesh = meshes.add(Cuboid::new(1.0, 0.1, 1.0));
    let marker_material = materials.add(flat_color(Color::srgb_u8(0x00, 0x77, 0x00)));

    for position in circle_positions(track.radius, track.segments, track.y) {
        commands.spawn((
            Mesh3d(marker_mesh.clone()),
            MeshMaterial3d(marker_material.clone()),
            Transform::from_translation(position),
        ));
    }
}
