//! # Flight
//!
//! Turning an edited polyline into a flyable trajectory: export the
//! waypoints, round the corners, then animate a marker along the result at
//! constant ground speed. F starts a flight from the current editor path.

use bevy::prelude::*;
use constants::render_settings::{
    FLY_MARKER_COLOR, RENDER_SCALE, TRAJECTORY_COLOR, VERTEX_MARKER_SIZE,
};

use crate::editor::input::EditorHandle;
use crate::geodesy::{Coordinate, ellipsoid};

pub mod corner;
pub mod fly;

pub use corner::{CornerRounding, round_corners};
pub use fly::FlyPath;

/// The in-progress flight, if any.
#[derive(Resource, Default)]
pub struct FlyState {
    pub path: Option<FlyPath>,
    pub elapsed_s: f64,
}

#[derive(Component)]
pub struct FlyMarker;

fn to_render(c: &Coordinate) -> Vec3 {
    (ellipsoid::geodetic_to_ecef(c) * RENDER_SCALE).as_vec3()
}

/// F: export the edited path, round its corners and start flying.
pub fn start_flight_system(
    keys: Res<ButtonInput<KeyCode>>,
    editor: Res<EditorHandle>,
    mut fly: ResMut<FlyState>,
) {
    if !keys.just_pressed(KeyCode::KeyF) {
        return;
    }
    let waypoints = editor.0.get_data();
    if waypoints.len() < 2 {
        warn!("flight needs at least two waypoints");
        return;
    }
    match serde_json::to_string(&waypoints) {
        Ok(json) => info!("exported path: {json}"),
        Err(err) => warn!("path export failed: {err}"),
    }

    let rounded = round_corners(&waypoints, CornerRounding::default());
    let Some(path) = FlyPath::build(rounded) else {
        return;
    };
    info!(
        "flying {:.1} km in {:.0} s",
        path.total_distance_m() / 1_000.0,
        path.duration_s()
    );
    fly.path = Some(path);
    fly.elapsed_s = 0.0;
}

/// Advance the flight clock, draw the trajectory and move the marker.
pub fn animate_flight_system(
    time: Res<Time>,
    mut fly: ResMut<FlyState>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut gizmos: Gizmos,
    mut markers: Query<(Entity, &mut Transform), With<FlyMarker>>,
) {
    if fly.path.is_none() {
        for (entity, _) in markers.iter() {
            commands.entity(entity).despawn();
        }
        return;
    }
    fly.elapsed_s += time.delta_secs_f64();

    let elapsed = fly.elapsed_s;
    let mut finished = false;
    if let Some(path) = fly.path.as_ref() {
        let [r, g, b] = TRAJECTORY_COLOR;
        gizmos.linestrip(
            path.waypoints().iter().map(to_render),
            Color::srgb(r, g, b),
        );

        let position = to_render(&path.sample(elapsed));
        if let Ok((_, mut transform)) = markers.single_mut() {
            transform.translation = position;
        } else {
            let [r, g, b] = FLY_MARKER_COLOR;
            commands.spawn((
                Mesh3d(meshes.add(Sphere::new(VERTEX_MARKER_SIZE * 1.4))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: Color::srgb(r, g, b),
                    unlit: true,
                    ..default()
                })),
                Transform::from_translation(position),
                FlyMarker,
            ));
        }
        finished = path.is_finished(elapsed);
    }
    if finished {
        fly.path = None;
    }
}

pub struct FlightPlugin;

impl Plugin for FlightPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FlyState>()
            .add_systems(Update, (start_flight_system, animate_flight_system).chain());
    }
}
