//! # Geo Editor
//!
//! Interactive polyline editing on the globe. Click to append waypoints,
//! click a segment to insert between its endpoints, left-drag a vertex to
//! move it, right-drag an anchor to raise or lower it, double-click an
//! anchor to delete it. All interaction state lives in [`geo_editor::GeoEditor`],
//! which is pure over the [`handles::ScreenProjector`] and
//! [`handles::RenderableSink`] traits; the Bevy systems in [`input`] and
//! [`scene_sync`] adapt it to the window and the render world.

use bevy::prelude::*;

pub mod geo_editor;
pub mod handles;
pub mod input;
pub mod ledger;
pub mod scene_sync;
pub mod store;

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<input::EditorHandle>()
            .init_resource::<ledger::RenderableLedger>()
            .add_systems(
                Update,
                (input::editor_mode_system, input::editor_input_system).chain(),
            )
            .add_systems(
                PostUpdate,
                (
                    scene_sync::sync_editor_visuals,
                    scene_sync::sync_tooltip_nodes,
                    scene_sync::apply_cursor_hint,
                ),
            );
    }
}
