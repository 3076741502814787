//! Visual settings for the globe scene and editor renderables.

use bevy::prelude::*;

/// Surface styling for the globe mesh, attached to the globe entity so
/// debug tooling can inspect it.
#[derive(Component, Default, Clone, Copy)]
pub struct GlobeStyle {
    pub base_color: [f32; 3],
    pub emissive_boost: f32,
}

pub const GLOBE_STYLE: GlobeStyle = GlobeStyle {
    base_color: [0.07, 0.16, 0.24],
    emissive_boost: 0.15,
};

/// Render units per metre. ECEF positions are in metres; multiplying by
/// this shrinks the globe into f32 range for rendering, and the projector
/// divides by it to get back to metres.
pub const RENDER_SCALE: f64 = 1.0e-5;

/// Radius of vertex marker spheres, render units.
pub const VERTEX_MARKER_SIZE: f32 = 0.35;

/// Radius of the insertion-preview marker sphere, render units.
pub const PREVIEW_MARKER_SIZE: f32 = 0.28;

/// Cross-section of line cuboids, render units.
pub const LINE_WIDTH: f32 = 0.08;

/// Ground-clamped renderables are lifted off the surface along the local
/// normal to avoid z-fighting with the globe mesh, render units.
pub const GROUND_LIFT: f32 = 0.06;

/// Colours as linear RGB triples; converted at the spawn site.
pub const ANCHOR_MARKER_COLOR: [f32; 3] = [1.0, 0.85, 0.1];
pub const GROUND_MARKER_COLOR: [f32; 3] = [0.9, 0.45, 0.05];
pub const PREVIEW_MARKER_COLOR: [f32; 3] = [0.2, 1.0, 0.4];
pub const SEGMENT_ANCHOR_COLOR: [f32; 3] = [1.0, 0.85, 0.1];
pub const SEGMENT_GROUND_COLOR: [f32; 3] = [1.0, 0.55, 0.0];
pub const HEIGHT_INDICATOR_COLOR: [f32; 3] = [0.65, 0.65, 0.75];
pub const TRAJECTORY_COLOR: [f32; 3] = [1.0, 0.15, 0.15];
pub const FLY_MARKER_COLOR: [f32; 3] = [0.95, 0.95, 1.0];
