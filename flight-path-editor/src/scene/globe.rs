//! Globe mesh, lighting and camera spawn.

use bevy::prelude::*;
use constants::geodesy::{WGS84_SEMI_MAJOR_M, WGS84_SEMI_MINOR_M};
use constants::render_settings::{GLOBE_STYLE, RENDER_SCALE};

/// Tag for the globe surface entity.
#[derive(Component)]
pub struct Globe;

/// Spawn the ellipsoid, a light and the orbit camera. The mesh is a unit
/// sphere scaled by the WGS84 semi-axes, so ECEF × RENDER_SCALE positions
/// land exactly on its surface.
pub fn setup_globe(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let radii = Vec3::new(
        (WGS84_SEMI_MAJOR_M * RENDER_SCALE) as f32,
        (WGS84_SEMI_MAJOR_M * RENDER_SCALE) as f32,
        (WGS84_SEMI_MINOR_M * RENDER_SCALE) as f32,
    );
    let [r, g, b] = GLOBE_STYLE.base_color;

    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(1.0).mesh().uv(96, 48))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(r, g, b),
            emissive: LinearRgba::new(
                r * GLOBE_STYLE.emissive_boost,
                g * GLOBE_STYLE.emissive_boost,
                b * GLOBE_STYLE.emissive_boost,
                1.0,
            ),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_scale(radii),
        Globe,
        GLOBE_STYLE,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.6,
            0.4,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(250.0, 0.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
    ));
}
