//! # Globe Scene
//!
//! The rendered world the editor sits on: the ellipsoid mesh, an orbit
//! camera, and the [`GlobeProjector`] snapshot that bridges the render
//! world and the editor's f64 ECEF math.

use bevy::prelude::*;

pub mod camera;
pub mod globe;

pub use camera::{GlobeCamera, GlobeProjector};

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GlobeCamera>()
            .init_resource::<GlobeProjector>()
            .add_systems(Startup, globe::setup_globe)
            .add_systems(Update, camera::camera_controller)
            .add_systems(PreUpdate, camera::refresh_projector);
    }
}
