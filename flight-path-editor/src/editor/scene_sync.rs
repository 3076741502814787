//! Rebuild render entities from the renderable ledger every frame.
//!
//! The ledger is the source of truth; entities carrying [`EditorVisual`]
//! are despawned and respawned wholesale each frame, so structural edits
//! (insert, delete, segment rebuilds) need no per-entity bookkeeping.

use bevy::math::DVec3;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, SystemCursorIcon};
use bevy::winit::cursor::CursorIcon;
use constants::render_settings::{
    ANCHOR_MARKER_COLOR, GROUND_LIFT, GROUND_MARKER_COLOR, HEIGHT_INDICATOR_COLOR, LINE_WIDTH,
    PREVIEW_MARKER_COLOR, PREVIEW_MARKER_SIZE, RENDER_SCALE, SEGMENT_ANCHOR_COLOR,
    SEGMENT_GROUND_COLOR, VERTEX_MARKER_SIZE,
};

use crate::scene::GlobeProjector;

use super::handles::{CursorHint, LineStyle, MarkerIcon, ScreenProjector};
use super::ledger::RenderableLedger;

/// Tag for every entity spawned from the ledger.
#[derive(Component)]
pub struct EditorVisual;

/// Tag for the tooltip UI node.
#[derive(Component)]
pub struct TooltipNode;

fn to_render(p: DVec3) -> Vec3 {
    (p * RENDER_SCALE).as_vec3()
}

/// Render position lifted slightly off the surface along the local normal,
/// so ground-clamped visuals do not z-fight with the globe mesh.
fn lifted(p: DVec3) -> Vec3 {
    let r = to_render(p);
    r + r.normalize_or_zero() * GROUND_LIFT
}

fn unlit(materials: &mut Assets<StandardMaterial>, rgb: [f32; 3]) -> Handle<StandardMaterial> {
    materials.add(StandardMaterial {
        base_color: Color::srgb(rgb[0], rgb[1], rgb[2]),
        unlit: true,
        ..default()
    })
}

pub fn sync_editor_visuals(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    ledger: Res<RenderableLedger>,
    existing: Query<Entity, With<EditorVisual>>,
) {
    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    for marker in ledger.markers.values() {
        if !marker.visible {
            continue;
        }
        let (size, color) = match marker.icon {
            MarkerIcon::Vertex => (VERTEX_MARKER_SIZE, ANCHOR_MARKER_COLOR),
            MarkerIcon::GroundVertex => (VERTEX_MARKER_SIZE, GROUND_MARKER_COLOR),
            MarkerIcon::InsertPreview => (PREVIEW_MARKER_SIZE, PREVIEW_MARKER_COLOR),
        };
        let position = if marker.clamp_to_ground {
            lifted(marker.position)
        } else {
            to_render(marker.position)
        };
        commands.spawn((
            Mesh3d(meshes.add(Sphere::new(size))),
            MeshMaterial3d(unlit(&mut materials, color)),
            Transform::from_translation(position),
            EditorVisual,
        ));
    }

    for line in ledger.lines.values() {
        if !line.visible {
            continue;
        }
        let Some([a, b]) = ledger.resolve_line_ends(line) else {
            continue;
        };
        let color = match line.style {
            LineStyle::SegmentAnchor => SEGMENT_ANCHOR_COLOR,
            LineStyle::SegmentGround => SEGMENT_GROUND_COLOR,
            LineStyle::HeightIndicator => HEIGHT_INDICATOR_COLOR,
        };
        let (start, end) = match line.style {
            // Ground lines hug the surface; lift both ends.
            LineStyle::SegmentGround => (lifted(a), lifted(b)),
            _ => (to_render(a), to_render(b)),
        };
        let span = end - start;
        let length = span.length();
        if length <= f32::EPSILON {
            continue;
        }
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(LINE_WIDTH, length, LINE_WIDTH))),
            MeshMaterial3d(unlit(&mut materials, color)),
            Transform {
                translation: start + span / 2.0,
                rotation: Quat::from_rotation_arc(Vec3::Y, span / length),
                ..default()
            },
            EditorVisual,
        ));
    }
}

/// Project visible labels to the viewport and rebuild their UI nodes.
pub fn sync_tooltip_nodes(
    mut commands: Commands,
    ledger: Res<RenderableLedger>,
    projector: Res<GlobeProjector>,
    existing: Query<Entity, With<TooltipNode>>,
) {
    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    for label in ledger.labels.values() {
        if !label.visible || label.text.is_empty() {
            continue;
        }
        let Some(screen) = projector.world_to_screen(label.position) else {
            continue;
        };
        commands.spawn((
            Text::new(label.text.clone()),
            TextFont {
                font_size: 14.0,
                ..default()
            },
            TextColor(Color::srgb(1.0, 1.0, 1.0)),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(screen.x as f32 + 14.0),
                top: Val::Px(screen.y as f32 - 24.0),
                padding: UiRect::axes(Val::Px(6.0), Val::Px(2.0)),
                ..default()
            },
            TooltipNode,
        ));
    }
}

pub fn apply_cursor_hint(
    mut commands: Commands,
    ledger: Res<RenderableLedger>,
    windows: Query<Entity, With<PrimaryWindow>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let icon = match ledger.cursor {
        CursorHint::Pointer => SystemCursorIcon::Pointer,
        CursorHint::Default => SystemCursorIcon::Default,
    };
    commands.entity(window).insert(CursorIcon::System(icon));
}
