//! Collaborator contracts for the geo editor.
//!
//! The editor core never talks to the renderer or the camera directly. It
//! consumes two traits: [`ScreenProjector`] (screen ↔ world projection,
//! drill picking, navigation permissions) and [`RenderableSink`] (markers,
//! lines, labels addressed by opaque identity tokens). Production
//! implementations live in `scene::camera` and `editor::ledger`; the tests
//! substitute a deterministic projector.

use bevy::math::{DVec2, DVec3};
use constants::editor::{SEGMENT_PICK_RADIUS_PX, VERTEX_PICK_RADIUS_PX};

/// Opaque identity of one renderable, allocated by the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderableId(pub(crate) u64);

/// Which role a renderable plays for the editor. Resolved by structured
/// lookup in the vertex store, never by parsing an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Anchor,
    Ground,
    HeightIndicator,
    SegmentAnchor,
    SegmentGround,
}

/// Marker appearance selector; the scene-sync layer maps this to a mesh and
/// material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerIcon {
    Vertex,
    GroundVertex,
    InsertPreview,
}

/// Line appearance selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    SegmentAnchor,
    SegmentGround,
    HeightIndicator,
}

/// One end of a line: a live reference to a marker (re-evaluated whenever
/// the line is drawn, so marker moves carry the line along) or a fixed
/// position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineEnd {
    Marker(RenderableId),
    Fixed(DVec3),
}

/// Cursor affordance the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Pointer,
}

/// Which globe-navigation inputs are currently allowed. The editor suppresses
/// rotation during a vertex drag and tilt during an altitude drag, and must
/// restore both on release or deactivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationPermissions {
    pub rotate: bool,
    pub tilt: bool,
}

impl NavigationPermissions {
    pub const ENABLED: Self = Self {
        rotate: true,
        tilt: true,
    };
}

impl Default for NavigationPermissions {
    fn default() -> Self {
        Self::ENABLED
    }
}

/// Pickable geometry the editor offers to `drill_pick`: a marker position or
/// a ground segment between two positions (ECEF metres).
#[derive(Debug, Clone, Copy)]
pub enum PickShape {
    Point(DVec3),
    Arc(DVec3, DVec3),
}

#[derive(Debug, Clone, Copy)]
pub struct PickCandidate {
    pub id: RenderableId,
    pub shape: PickShape,
}

/// Screen ↔ world projection and navigation control.
pub trait ScreenProjector {
    /// Project a screen point onto the globe surface. `None` when the cursor
    /// points off the globe.
    fn pick_ground(&self, screen: DVec2) -> Option<DVec3>;

    /// Screen position of a world point, `None` when it is not visible.
    fn world_to_screen(&self, world: DVec3) -> Option<DVec2>;

    /// World metres covered by one screen pixel at the given point. Accounts
    /// for perspective: farther points move more per pixel.
    fn metres_per_pixel(&self, world: DVec3) -> f64;

    fn navigation(&self) -> NavigationPermissions;
    fn set_navigation(&mut self, nav: NavigationPermissions);

    /// Renderables under a screen point, front-to-back: markers within the
    /// vertex pick radius first (closest to the cursor wins), then segment
    /// arcs within the line pick radius. The geometry comes from the caller
    /// so handle classification stays in the store.
    fn drill_pick(&self, screen: DVec2, candidates: &[PickCandidate]) -> Vec<RenderableId> {
        let mut markers: Vec<(f64, RenderableId)> = Vec::new();
        let mut arcs: Vec<(f64, RenderableId)> = Vec::new();

        for candidate in candidates {
            match candidate.shape {
                PickShape::Point(world) => {
                    let Some(p) = self.world_to_screen(world) else {
                        continue;
                    };
                    let d = p.distance(screen);
                    if d <= VERTEX_PICK_RADIUS_PX {
                        markers.push((d, candidate.id));
                    }
                }
                PickShape::Arc(a, b) => {
                    let (Some(pa), Some(pb)) = (self.world_to_screen(a), self.world_to_screen(b))
                    else {
                        continue;
                    };
                    let d = point_segment_distance(screen, pa, pb);
                    if d <= SEGMENT_PICK_RADIUS_PX {
                        arcs.push((d, candidate.id));
                    }
                }
            }
        }

        markers.sort_by(|x, y| x.0.total_cmp(&y.0));
        arcs.sort_by(|x, y| x.0.total_cmp(&y.0));
        markers
            .into_iter()
            .chain(arcs)
            .map(|(_, id)| id)
            .collect()
    }
}

/// Distance from `p` to the screen-space segment `a`–`b`.
fn point_segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Renderable output channel. All positions are ECEF metres.
pub trait RenderableSink {
    fn add_marker(&mut self, position: DVec3, icon: MarkerIcon, clamp_to_ground: bool)
    -> RenderableId;
    fn add_line(&mut self, ends: [LineEnd; 2], style: LineStyle) -> RenderableId;
    fn add_label(&mut self, position: DVec3, text: &str) -> RenderableId;
    fn remove(&mut self, id: RenderableId);

    fn set_position(&mut self, id: RenderableId, position: DVec3);
    fn position(&self, id: RenderableId) -> Option<DVec3>;
    fn set_visible(&mut self, id: RenderableId, visible: bool);
    fn set_label_text(&mut self, id: RenderableId, text: &str);
    fn set_cursor(&mut self, cursor: CursorHint);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(10.0, 0.0);
        assert_eq!(point_segment_distance(DVec2::new(-5.0, 0.0), a, b), 5.0);
        assert_eq!(point_segment_distance(DVec2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(point_segment_distance(DVec2::new(13.0, 4.0), a, b), 5.0);
    }
}
