//! The interactive line-editing state machine.
//!
//! Pointer events come in as screen coordinates; the editor resolves them
//! against the vertex store through a [`ScreenProjector`] and writes every
//! visual consequence through a [`RenderableSink`]. All logic is synchronous
//! and single-threaded: each event is fully processed before the next one,
//! and drags only advance on further pointer-move events.
//!
//! Event handling in one picture:
//! ```text
//! pointer event ─► GeoEditor ─reads─► ScreenProjector + PickState
//!                      │
//!                      └─mutates─► VertexStore ─writes─► RenderableSink
//! ```

use bevy::log::{debug, info};
use bevy::math::DVec2;
use constants::editor::{CLICK_PIXEL_TOLERANCE, FLAT_HEIGHT_EPSILON_M};

use crate::geodesy::{Coordinate, arc, ellipsoid};

use super::handles::{
    CursorHint, HandleKind, MarkerIcon, NavigationPermissions, RenderableId, RenderableSink,
    ScreenProjector,
};
use super::store::{ActiveDrag, PickState, VertexStore};

/// Editing modes the host can request. `Off` tears the editor down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Off,
    Line3d,
}

/// The transient renderables the editor owns directly (everything else
/// belongs to the vertex store).
#[derive(Debug, Clone, Copy)]
struct Feedback {
    preview_marker: RenderableId,
    tooltip: RenderableId,
}

/// The geo editor: one reusable instance, activated and deactivated by the
/// host via [`GeoEditor::set_mode`].
#[derive(Default)]
pub struct GeoEditor {
    mode: EditorMode,
    store: VertexStore,
    pick: PickState,
    feedback: Option<Feedback>,
    /// Candidate coordinate for the insertion preview: surface position on
    /// the hovered segment with the interpolated anchor height.
    preview_candidate: Option<Coordinate>,
}

impl GeoEditor {
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode != EditorMode::Off
    }

    /// Anchor coordinates in sequence order. Pure read; returns an empty
    /// sequence when the store is empty or the editor is off.
    pub fn get_data(&self) -> Vec<Coordinate> {
        self.store.waypoints().iter().map(|w| w.anchor).collect()
    }

    /// Switch editing mode. Any mode other than `Off` activates line
    /// editing; `Off` removes every renderable the editor owns and restores
    /// navigation, idempotently and regardless of in-progress drags.
    pub fn set_mode<P: ScreenProjector, S: RenderableSink>(
        &mut self,
        mode: EditorMode,
        projector: &mut P,
        sink: &mut S,
    ) {
        if mode == self.mode {
            return;
        }
        match mode {
            EditorMode::Off => self.deactivate(projector, sink),
            EditorMode::Line3d => self.activate(sink),
        }
    }

    fn activate<S: RenderableSink>(&mut self, sink: &mut S) {
        let preview_marker = sink.add_marker(
            bevy::math::DVec3::ZERO,
            MarkerIcon::InsertPreview,
            true,
        );
        sink.set_visible(preview_marker, false);
        let tooltip = sink.add_label(bevy::math::DVec3::ZERO, "");
        sink.set_visible(tooltip, false);
        self.feedback = Some(Feedback {
            preview_marker,
            tooltip,
        });
        self.pick = PickState::default();
        self.preview_candidate = None;
        self.mode = EditorMode::Line3d;
        info!("geo editor activated");
    }

    fn deactivate<P: ScreenProjector, S: RenderableSink>(
        &mut self,
        projector: &mut P,
        sink: &mut S,
    ) {
        self.store.clear(sink);
        if let Some(feedback) = self.feedback.take() {
            sink.remove(feedback.preview_marker);
            sink.remove(feedback.tooltip);
        }
        self.pick = PickState::default();
        self.preview_candidate = None;
        sink.set_cursor(CursorHint::Default);
        projector.set_navigation(NavigationPermissions::ENABLED);
        self.mode = EditorMode::Off;
        info!("geo editor deactivated");
    }

    pub fn pointer_moved<P: ScreenProjector, S: RenderableSink>(
        &mut self,
        screen: DVec2,
        projector: &mut P,
        sink: &mut S,
    ) {
        if !self.is_active() {
            return;
        }
        match self.pick.drag {
            ActiveDrag::Translate => self.drag_translate(screen, projector, sink),
            ActiveDrag::Altitude {
                press_screen_y,
                start_height_m,
            } => self.drag_altitude(screen, press_screen_y, start_height_m, projector, sink),
            ActiveDrag::None => self.resolve_hover(screen, projector, sink),
        }
    }

    pub fn left_down<P: ScreenProjector, S: RenderableSink>(
        &mut self,
        screen: DVec2,
        projector: &mut P,
        _sink: &mut S,
    ) {
        if !self.is_active() {
            return;
        }
        self.pick.press_screen = Some(screen);
        if self.pick.hovered_waypoint.is_some() {
            // Dragging a vertex must not pan the camera.
            let mut nav = projector.navigation();
            nav.rotate = false;
            projector.set_navigation(nav);
            self.pick.drag = ActiveDrag::Translate;
        }
    }

    pub fn left_up<P: ScreenProjector, S: RenderableSink>(
        &mut self,
        screen: DVec2,
        projector: &mut P,
        sink: &mut S,
    ) {
        if !self.is_active() {
            return;
        }
        let pressed = self.pick.press_screen.take();
        let was_translate = self.pick.drag == ActiveDrag::Translate;
        self.pick.drag = ActiveDrag::None;

        // Rotation comes back on release no matter how the press resolved.
        let mut nav = projector.navigation();
        nav.rotate = true;
        projector.set_navigation(nav);

        if was_translate || self.pick.hovered_waypoint.is_some() {
            // Any drag already happened during move events.
            return;
        }

        let is_click = pressed
            .is_some_and(|press| press.distance(screen) <= CLICK_PIXEL_TOLERANCE);
        if !is_click {
            return;
        }

        if let Some(lower) = self.pick.hovered_segment {
            self.commit_insertion(lower, sink);
        } else {
            self.append_waypoint(screen, projector, sink);
        }
        self.resolve_hover(screen, projector, sink);
    }

    pub fn right_down<P: ScreenProjector, S: RenderableSink>(
        &mut self,
        screen: DVec2,
        projector: &mut P,
        _sink: &mut S,
    ) {
        if !self.is_active() {
            return;
        }
        let Some((index, HandleKind::Anchor)) = self.pick.hovered_waypoint else {
            return;
        };
        let Some(waypoint) = self.store.waypoint(index) else {
            return;
        };
        self.pick.drag = ActiveDrag::Altitude {
            press_screen_y: screen.y,
            start_height_m: waypoint.anchor.height_m,
        };
        let mut nav = projector.navigation();
        nav.tilt = false;
        projector.set_navigation(nav);
    }

    pub fn right_up<P: ScreenProjector, S: RenderableSink>(
        &mut self,
        _screen: DVec2,
        projector: &mut P,
        _sink: &mut S,
    ) {
        if !self.is_active() {
            return;
        }
        if matches!(self.pick.drag, ActiveDrag::Altitude { .. }) {
            self.pick.drag = ActiveDrag::None;
        }
        let mut nav = projector.navigation();
        nav.tilt = true;
        projector.set_navigation(nav);
    }

    /// Remove the hovered waypoint. Only anchor handles accept deletion.
    pub fn double_click<P: ScreenProjector, S: RenderableSink>(
        &mut self,
        screen: DVec2,
        projector: &mut P,
        sink: &mut S,
    ) {
        if !self.is_active() {
            return;
        }
        let Some((index, HandleKind::Anchor)) = self.pick.hovered_waypoint else {
            return;
        };
        self.store.remove(index, sink);
        debug!("removed waypoint {index}");
        self.pick.clear_hover();
        // Indices shifted; re-resolve so the pick state matches the new
        // sequence before the next event.
        self.resolve_hover(screen, projector, sink);
    }

    fn resolve_hover<P: ScreenProjector, S: RenderableSink>(
        &mut self,
        screen: DVec2,
        projector: &mut P,
        sink: &mut S,
    ) {
        self.pick.clear_hover();
        let candidates = self.store.pick_candidates();
        for id in projector.drill_pick(screen, &candidates) {
            match self.store.classify(id) {
                Some((index, kind @ (HandleKind::Anchor | HandleKind::Ground))) => {
                    self.pick.hovered_waypoint = Some((index, kind));
                    break;
                }
                Some((lower, HandleKind::SegmentGround))
                    if self.pick.hovered_segment.is_none() =>
                {
                    self.pick.hovered_segment = Some(lower);
                }
                _ => {}
            }
        }
        // Waypoint hover wins over segment hover.
        if self.pick.hovered_waypoint.is_some() {
            self.pick.hovered_segment = None;
        }

        let hovering = self.pick.hovered_waypoint.is_some() || self.pick.hovered_segment.is_some();
        sink.set_cursor(if hovering {
            CursorHint::Pointer
        } else {
            CursorHint::Default
        });

        match (self.pick.hovered_waypoint, self.pick.hovered_segment) {
            (Some((index, _)), _) => {
                self.hide_preview(sink);
                if let Some(anchor) = self.store.waypoint(index).map(|w| w.anchor) {
                    self.show_tooltip(&anchor, sink);
                }
            }
            (None, Some(lower)) => self.update_preview(lower, screen, projector, sink),
            (None, None) => {
                self.hide_preview(sink);
                self.hide_tooltip(sink);
            }
        }
    }

    /// Place the insertion preview on the hovered segment: the point on the
    /// A→B geodesic at the same surface distance as the raw cursor ground
    /// position, with height interpolated between the endpoint anchors.
    fn update_preview<P: ScreenProjector, S: RenderableSink>(
        &mut self,
        lower: usize,
        screen: DVec2,
        projector: &mut P,
        sink: &mut S,
    ) {
        let (Some(a), Some(b)) = (
            self.store.waypoint(lower).map(|w| w.anchor),
            self.store.waypoint(lower + 1).map(|w| w.anchor),
        ) else {
            self.hide_preview(sink);
            return;
        };
        let Some(ground_world) = projector.pick_ground(screen) else {
            self.hide_preview(sink);
            return;
        };

        let cursor = ellipsoid::ecef_to_geodetic(ground_world).ground();
        let total = arc::surface_distance_m(&a.ground(), &b.ground());
        if total <= f64::EPSILON {
            self.hide_preview(sink);
            return;
        }
        let along = arc::surface_distance_m(&a.ground(), &cursor).min(total);
        let on_arc = arc::point_at_distance(&a.ground(), &b.ground(), along);
        let height = arc::lerp(a.height_m, b.height_m, along / total);
        let candidate = on_arc.with_height(height);

        self.preview_candidate = Some(candidate);
        if let Some(feedback) = self.feedback {
            sink.set_position(feedback.preview_marker, ellipsoid::surface_ecef(&candidate));
            sink.set_visible(feedback.preview_marker, true);
        }
        self.show_tooltip(&candidate, sink);
    }

    fn commit_insertion<S: RenderableSink>(&mut self, lower: usize, sink: &mut S) {
        let Some(candidate) = self.preview_candidate.take() else {
            return;
        };
        self.store.insert(lower + 1, candidate, sink);
        self.hide_preview(sink);
        debug!("inserted waypoint at index {}", lower + 1);
    }

    /// Append at the raw cursor ground position, inheriting the previous
    /// last waypoint's height so a fresh point does not drop to the ground.
    fn append_waypoint<P: ScreenProjector, S: RenderableSink>(
        &mut self,
        screen: DVec2,
        projector: &mut P,
        sink: &mut S,
    ) {
        let Some(ground_world) = projector.pick_ground(screen) else {
            return;
        };
        let ground = ellipsoid::ecef_to_geodetic(ground_world).ground();
        let height = self
            .store
            .waypoints()
            .last()
            .map_or(0.0, |w| w.anchor.height_m);
        self.store.push(ground.with_height(height), sink);
        debug!("appended waypoint {}", self.store.len() - 1);
    }

    fn drag_translate<P: ScreenProjector, S: RenderableSink>(
        &mut self,
        screen: DVec2,
        projector: &mut P,
        sink: &mut S,
    ) {
        let Some((index, kind)) = self.pick.hovered_waypoint else {
            return;
        };
        let Some(anchor) = self.store.waypoint(index).map(|w| w.anchor) else {
            return;
        };
        let Some(ground_world) = projector.pick_ground(screen) else {
            return;
        };
        let target = ellipsoid::ecef_to_geodetic(ground_world).ground();

        let moved = match kind {
            // Ground handle: anchor follows in longitude/latitude, height
            // stays where the user set it.
            HandleKind::Ground => target.with_height(anchor.height_m),
            // Anchor handle: horizontal drag only while the point sits on
            // the ground, so a mid-altitude point cannot be nudged sideways
            // by accident.
            HandleKind::Anchor if anchor.height_m.abs() <= FLAT_HEIGHT_EPSILON_M => target,
            _ => return,
        };
        self.store.set_anchor(index, moved, sink);
        self.show_tooltip(&moved, sink);
    }

    fn drag_altitude<P: ScreenProjector, S: RenderableSink>(
        &mut self,
        screen: DVec2,
        press_screen_y: f64,
        start_height_m: f64,
        projector: &mut P,
        sink: &mut S,
    ) {
        let Some((index, HandleKind::Anchor)) = self.pick.hovered_waypoint else {
            return;
        };
        let Some(anchor) = self.store.waypoint(index).map(|w| w.anchor) else {
            return;
        };
        // Screen y grows downward; pulling the pointer up raises the point.
        let delta_px = press_screen_y - screen.y;
        let scale = projector.metres_per_pixel(ellipsoid::geodetic_to_ecef(&anchor));
        let height = (start_height_m + delta_px * scale).max(0.0);
        let moved = anchor.with_height(height);
        self.store.set_anchor(index, moved, sink);
        self.show_tooltip(&moved, sink);
    }

    fn show_tooltip<S: RenderableSink>(&self, coordinate: &Coordinate, sink: &mut S) {
        let Some(feedback) = self.feedback else {
            return;
        };
        sink.set_position(feedback.tooltip, ellipsoid::geodetic_to_ecef(coordinate));
        sink.set_label_text(feedback.tooltip, &tooltip_text(coordinate));
        sink.set_visible(feedback.tooltip, true);
    }

    fn hide_tooltip<S: RenderableSink>(&self, sink: &mut S) {
        if let Some(feedback) = self.feedback {
            sink.set_visible(feedback.tooltip, false);
        }
    }

    fn hide_preview<S: RenderableSink>(&mut self, sink: &mut S) {
        self.preview_candidate = None;
        if let Some(feedback) = self.feedback {
            sink.set_visible(feedback.preview_marker, false);
        }
    }
}

/// Latitude/longitude to two decimals, height appended when the point is
/// off the ground.
fn tooltip_text(c: &Coordinate) -> String {
    if c.height_m.abs() > FLAT_HEIGHT_EPSILON_M {
        format!("{:.2}°, {:.2}°, {:.0} m", c.lat_deg, c.lon_deg, c.height_m)
    } else {
        format!("{:.2}°, {:.2}°", c.lat_deg, c.lon_deg)
    }
}
