//! Pump window pointer and keyboard input into the editor state machine.
//!
//! Winit has no double-click event, so one is derived here: two left
//! releases inside [`DOUBLE_CLICK_WINDOW_S`] and [`DOUBLE_CLICK_RADIUS_PX`]
//! fire `double_click` after the second `left_up`.
//!
//! Button releases can arrive on a frame where the cursor is outside the
//! window (no cursor position). They are dispatched anyway, at the last
//! known cursor position; dropping them would leave a drag armed with no
//! button held and navigation still suppressed.

use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::editor::{DOUBLE_CLICK_RADIUS_PX, DOUBLE_CLICK_WINDOW_S};

use crate::scene::GlobeProjector;

use super::geo_editor::{EditorMode, GeoEditor};
use super::handles::{RenderableSink, ScreenProjector};
use super::ledger::RenderableLedger;

/// The editor instance as an ECS resource.
#[derive(Resource, Default)]
pub struct EditorHandle(pub GeoEditor);

/// One frame's worth of pointer input.
pub struct PointerFrame {
    /// `None` while the cursor is outside the window.
    pub cursor: Option<Vec2>,
    pub left_down: bool,
    pub left_up: bool,
    pub right_down: bool,
    pub right_up: bool,
    pub now_s: f32,
}

/// Pump state carried across frames: the last known cursor position and the
/// double-click tracker.
#[derive(Default)]
pub struct PumpState {
    last_cursor: Vec2,
    clicks: ClickTracker,
}

/// Rolling state for double-click derivation.
#[derive(Default)]
struct ClickTracker {
    armed: bool,
    last_release_at: f32,
    last_release_pos: Vec2,
}

/// E toggles line editing on and off.
pub fn editor_mode_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut editor: ResMut<EditorHandle>,
    mut projector: ResMut<GlobeProjector>,
    mut ledger: ResMut<RenderableLedger>,
) {
    if !keys.just_pressed(KeyCode::KeyE) {
        return;
    }
    let next = if editor.0.is_active() {
        EditorMode::Off
    } else {
        EditorMode::Line3d
    };
    editor
        .0
        .set_mode(next, &mut *projector, &mut *ledger);
    info!("editor mode: {:?}", editor.0.mode());
}

pub fn editor_input_system(
    mut editor: ResMut<EditorHandle>,
    mut projector: ResMut<GlobeProjector>,
    mut ledger: ResMut<RenderableLedger>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time>,
    mut state: Local<PumpState>,
) {
    if !editor.0.is_active() {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let frame = PointerFrame {
        cursor: window.cursor_position(),
        left_down: mouse.just_pressed(MouseButton::Left),
        left_up: mouse.just_released(MouseButton::Left),
        right_down: mouse.just_pressed(MouseButton::Right),
        right_up: mouse.just_released(MouseButton::Right),
        now_s: time.elapsed_secs(),
    };
    pump_pointer_frame(&mut editor.0, &frame, &mut state, &mut *projector, &mut *ledger);
}

/// Dispatch one frame of pointer input to the editor. Moves and presses
/// need a cursor inside the window; releases always go through, using the
/// last known position, so drags cannot outlive their button.
pub fn pump_pointer_frame<P: ScreenProjector, S: RenderableSink>(
    editor: &mut GeoEditor,
    frame: &PointerFrame,
    state: &mut PumpState,
    projector: &mut P,
    sink: &mut S,
) {
    if let Some(cursor) = frame.cursor {
        state.last_cursor = cursor;
    }
    let cursor = state.last_cursor;
    let screen = DVec2::new(cursor.x as f64, cursor.y as f64);

    if frame.cursor.is_some() {
        editor.pointer_moved(screen, projector, sink);
        if frame.left_down {
            editor.left_down(screen, projector, sink);
        }
        if frame.right_down {
            editor.right_down(screen, projector, sink);
        }
    }
    if frame.left_up {
        editor.left_up(screen, projector, sink);
        fire_double_click(editor, screen, cursor, frame.now_s, &mut state.clicks, projector, sink);
    }
    if frame.right_up {
        editor.right_up(screen, projector, sink);
    }
}

fn fire_double_click<P: ScreenProjector, S: RenderableSink>(
    editor: &mut GeoEditor,
    screen: DVec2,
    cursor: Vec2,
    now_s: f32,
    clicks: &mut ClickTracker,
    projector: &mut P,
    sink: &mut S,
) {
    let is_double = clicks.armed
        && now_s - clicks.last_release_at <= DOUBLE_CLICK_WINDOW_S
        && cursor.distance(clicks.last_release_pos) <= DOUBLE_CLICK_RADIUS_PX;
    if is_double {
        editor.double_click(screen, projector, sink);
        clicks.armed = false;
    } else {
        clicks.armed = true;
        clicks.last_release_at = now_s;
        clicks.last_release_pos = cursor;
    }
}
