//! Orbit camera around the globe and the projector snapshot built from it.
//!
//! The camera is a yaw/pitch/distance orbit around the globe centre,
//! driven by mouse drags and the scroll wheel, gated by the editor's
//! [`NavigationPermissions`]. Each frame [`refresh_projector`] snapshots
//! the camera into the [`GlobeProjector`] resource so the editor can do
//! all of its projection math on plain f64 state without touching the
//! render world.

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::math::{DVec2, DVec3};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::geodesy::{WGS84_SEMI_MAJOR_M, WGS84_SEMI_MINOR_M};
use constants::render_settings::RENDER_SCALE;

use crate::editor::handles::{NavigationPermissions, ScreenProjector};

const MIN_CAMERA_DISTANCE_M: f64 = 6_600_000.0;
const MAX_CAMERA_DISTANCE_M: f64 = 80_000_000.0;
const ROTATE_SPEED: f64 = 0.004;
const ZOOM_STEP: f64 = 0.92;

/// Orbit state in ECEF metres, Z up through the poles.
#[derive(Resource)]
pub struct GlobeCamera {
    pub yaw_rad: f64,
    pub pitch_rad: f64,
    pub distance_m: f64,
}

impl Default for GlobeCamera {
    fn default() -> Self {
        Self {
            yaw_rad: 0.5,
            pitch_rad: 0.7,
            distance_m: 25_000_000.0,
        }
    }
}

impl GlobeCamera {
    /// Camera position in ECEF metres.
    pub fn position_m(&self) -> DVec3 {
        let (sin_pitch, cos_pitch) = self.pitch_rad.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw_rad.sin_cos();
        DVec3::new(cos_pitch * cos_yaw, cos_pitch * sin_yaw, sin_pitch) * self.distance_m
    }
}

/// Mouse orbit control. Left-drag rotates around the globe, right-drag
/// tilts, the wheel zooms; rotation and tilt respect the permissions the
/// editor currently grants.
pub fn camera_controller(
    mut orbit: ResMut<GlobeCamera>,
    projector: Res<GlobeProjector>,
    mouse: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    mut cameras: Query<&mut Transform, With<Camera3d>>,
) {
    let nav = projector.navigation();
    let delta = motion.delta;

    if mouse.pressed(MouseButton::Left) && nav.rotate {
        orbit.yaw_rad -= delta.x as f64 * ROTATE_SPEED;
    }
    if mouse.pressed(MouseButton::Right) && nav.tilt {
        orbit.pitch_rad = (orbit.pitch_rad + delta.y as f64 * ROTATE_SPEED)
            .clamp(-1.45, 1.45);
    }
    if scroll.delta.y.abs() > f32::EPSILON {
        let factor = ZOOM_STEP.powf(scroll.delta.y as f64);
        orbit.distance_m =
            (orbit.distance_m * factor).clamp(MIN_CAMERA_DISTANCE_M, MAX_CAMERA_DISTANCE_M);
    }

    let Ok(mut transform) = cameras.single_mut() else {
        return;
    };
    let position = (orbit.position_m() * RENDER_SCALE).as_vec3();
    *transform = Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Z);
}

/// Per-frame camera snapshot implementing [`ScreenProjector`] over ECEF
/// metres.
#[derive(Resource)]
pub struct GlobeProjector {
    position_m: DVec3,
    forward: DVec3,
    right: DVec3,
    up: DVec3,
    tan_half_fov_y: f64,
    viewport_px: DVec2,
    nav: NavigationPermissions,
}

impl Default for GlobeProjector {
    fn default() -> Self {
        Self {
            position_m: DVec3::new(25_000_000.0, 0.0, 0.0),
            forward: -DVec3::X,
            right: DVec3::Y,
            up: DVec3::Z,
            tan_half_fov_y: (std::f64::consts::FRAC_PI_4 / 2.0).tan(),
            viewport_px: DVec2::new(1280.0, 720.0),
            nav: NavigationPermissions::ENABLED,
        }
    }
}

/// Copy the camera pose and projection into the projector snapshot.
pub fn refresh_projector(
    mut projector: ResMut<GlobeProjector>,
    cameras: Query<(&GlobalTransform, &Projection), With<Camera3d>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Ok((transform, projection)) = cameras.single() else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };

    projector.position_m = transform.translation().as_dvec3() / RENDER_SCALE;
    projector.forward = transform.forward().as_vec3().as_dvec3();
    projector.right = transform.right().as_vec3().as_dvec3();
    projector.up = transform.up().as_vec3().as_dvec3();
    if let Projection::Perspective(perspective) = projection {
        projector.tan_half_fov_y = (perspective.fov as f64 / 2.0).tan();
    }
    projector.viewport_px = DVec2::new(window.width() as f64, window.height() as f64);
}

/// Smallest positive ray parameter where `origin + t × dir` meets the WGS84
/// ellipsoid, in the same units as `origin`.
fn intersect_ellipsoid(origin_m: DVec3, dir: DVec3) -> Option<f64> {
    let scale = DVec3::new(
        1.0 / WGS84_SEMI_MAJOR_M,
        1.0 / WGS84_SEMI_MAJOR_M,
        1.0 / WGS84_SEMI_MINOR_M,
    );
    let o = origin_m * scale;
    let d = dir * scale;

    let a = d.length_squared();
    let b = 2.0 * o.dot(d);
    let c = o.length_squared() - 1.0;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let near = (-b - sqrt_d) / (2.0 * a);
    let far = (-b + sqrt_d) / (2.0 * a);
    if near > 0.0 {
        Some(near)
    } else if far > 0.0 {
        Some(far)
    } else {
        None
    }
}

impl GlobeProjector {
    fn ray_direction(&self, screen: DVec2) -> DVec3 {
        let aspect = self.viewport_px.x / self.viewport_px.y;
        let ndc_x = 2.0 * screen.x / self.viewport_px.x - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / self.viewport_px.y;
        (self.forward
            + self.right * (ndc_x * self.tan_half_fov_y * aspect)
            + self.up * (ndc_y * self.tan_half_fov_y))
            .normalize()
    }
}

impl ScreenProjector for GlobeProjector {
    fn pick_ground(&self, screen: DVec2) -> Option<DVec3> {
        let dir = self.ray_direction(screen);
        let t = intersect_ellipsoid(self.position_m, dir)?;
        Some(self.position_m + dir * t)
    }

    fn world_to_screen(&self, world: DVec3) -> Option<DVec2> {
        let to_point = world - self.position_m;
        let depth = to_point.dot(self.forward);
        if depth <= 0.0 {
            return None;
        }
        // Points on the far side of the globe are not pickable.
        let distance = to_point.length();
        if let Some(t) = intersect_ellipsoid(self.position_m, to_point / distance) {
            if t < distance - 1.0 {
                return None;
            }
        }

        let aspect = self.viewport_px.x / self.viewport_px.y;
        let ndc_x = to_point.dot(self.right) / (depth * self.tan_half_fov_y * aspect);
        let ndc_y = to_point.dot(self.up) / (depth * self.tan_half_fov_y);
        Some(DVec2::new(
            (ndc_x + 1.0) / 2.0 * self.viewport_px.x,
            (1.0 - ndc_y) / 2.0 * self.viewport_px.y,
        ))
    }

    fn metres_per_pixel(&self, world: DVec3) -> f64 {
        let distance = (world - self.position_m).length();
        distance * 2.0 * self.tan_half_fov_y / self.viewport_px.y
    }

    fn navigation(&self) -> NavigationPermissions {
        self.nav
    }

    fn set_navigation(&mut self, nav: NavigationPermissions) {
        self.nav = nav;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::{Coordinate, ellipsoid};

    fn looking_down_x() -> GlobeProjector {
        GlobeProjector::default()
    }

    #[test]
    fn centre_ray_hits_the_near_surface() {
        let projector = looking_down_x();
        let centre = projector.viewport_px / 2.0;
        let hit = projector.pick_ground(centre).unwrap();
        // Nearest surface point straight ahead is the sub-camera point on
        // the equator at longitude 0.
        assert!((hit.x - WGS84_SEMI_MAJOR_M).abs() < 1.0, "x {}", hit.x);
        assert!(hit.y.abs() < 1.0);
        assert!(hit.z.abs() < 1.0);
    }

    #[test]
    fn default_pose_right_axis_points_east() {
        // A camera on the +X axis looking at the origin with +Z up has
        // right = forward × up = +Y, so points east of the sub-camera
        // meridian land on the right half of the screen.
        let projector = looking_down_x();
        let east = ellipsoid::surface_ecef(&Coordinate::on_surface(10.0, 0.0));
        let screen = projector.world_to_screen(east).unwrap();
        assert!(
            screen.x > projector.viewport_px.x / 2.0,
            "east point at screen x {}",
            screen.x
        );
    }

    #[test]
    fn off_globe_ray_misses() {
        let projector = looking_down_x();
        assert!(projector.pick_ground(DVec2::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn surface_point_round_trips_through_screen() {
        let projector = looking_down_x();
        let world = ellipsoid::surface_ecef(&Coordinate::on_surface(10.0, 20.0));
        let screen = projector.world_to_screen(world).unwrap();
        let reprojected = projector.pick_ground(screen).unwrap();
        assert!((reprojected - world).length() < 10.0);
    }

    #[test]
    fn far_side_point_is_rejected() {
        let projector = looking_down_x();
        let world = ellipsoid::surface_ecef(&Coordinate::on_surface(180.0, 0.0));
        assert!(projector.world_to_screen(world).is_none());
    }

    #[test]
    fn behind_camera_point_is_rejected() {
        let projector = looking_down_x();
        let world = DVec3::new(50_000_000.0, 0.0, 0.0);
        assert!(projector.world_to_screen(world).is_none());
    }

    #[test]
    fn intersect_prefers_the_near_root() {
        let origin = DVec3::new(2.0 * WGS84_SEMI_MAJOR_M, 0.0, 0.0);
        let t = intersect_ellipsoid(origin, -DVec3::X).unwrap();
        assert!((t - WGS84_SEMI_MAJOR_M).abs() < 1.0);
    }

    #[test]
    fn orbit_position_respects_distance() {
        let orbit = GlobeCamera {
            yaw_rad: 0.3,
            pitch_rad: -0.9,
            distance_m: 10_000_000.0,
        };
        assert!((orbit.position_m().length() - 10_000_000.0).abs() < 1e-3);
    }
}
