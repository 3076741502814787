//! Ordered waypoint storage and transient pick state.
//!
//! Waypoints live in a plain vector; segments carry no identity of their
//! own and are rebuilt as projections of the current order whenever the
//! sequence changes. Handle classification is a structured lookup over the
//! stored renderable ids, so the editor never inspects identifier strings.

use bevy::math::DVec2;

use crate::geodesy::{Coordinate, ellipsoid};

use super::handles::{
    HandleKind, LineEnd, LineStyle, MarkerIcon, PickCandidate, PickShape, RenderableId,
    RenderableSink,
};

/// One user-placed vertex: the anchor coordinate plus the renderables bound
/// 1:1 to it. The ground position is always the anchor's surface projection,
/// so only the anchor coordinate is stored.
#[derive(Debug, Clone)]
pub struct Waypoint {
    pub anchor: Coordinate,
    pub anchor_handle: RenderableId,
    pub ground_handle: RenderableId,
    pub height_indicator: RenderableId,
}

impl Waypoint {
    pub fn ground(&self) -> Coordinate {
        self.anchor.ground()
    }
}

/// The renderable pair for one segment between consecutive waypoints.
#[derive(Debug, Clone, Copy)]
pub struct SegmentHandles {
    pub anchor_line: RenderableId,
    pub ground_line: RenderableId,
}

/// Ordered waypoint sequence plus the derived segment renderables.
#[derive(Default)]
pub struct VertexStore {
    waypoints: Vec<Waypoint>,
    segments: Vec<SegmentHandles>,
}

impl VertexStore {
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoint(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Insert a waypoint at `index`, creating its markers and height
    /// indicator, then rebuild the segment lines.
    pub fn insert(&mut self, index: usize, anchor: Coordinate, sink: &mut impl RenderableSink) {
        let anchor_handle = sink.add_marker(
            ellipsoid::geodetic_to_ecef(&anchor),
            MarkerIcon::Vertex,
            false,
        );
        let ground_handle = sink.add_marker(
            ellipsoid::surface_ecef(&anchor),
            MarkerIcon::GroundVertex,
            true,
        );
        let height_indicator = sink.add_line(
            [LineEnd::Marker(ground_handle), LineEnd::Marker(anchor_handle)],
            LineStyle::HeightIndicator,
        );
        self.waypoints.insert(
            index,
            Waypoint {
                anchor,
                anchor_handle,
                ground_handle,
                height_indicator,
            },
        );
        self.rebuild_segments(sink);
    }

    pub fn push(&mut self, anchor: Coordinate, sink: &mut impl RenderableSink) {
        self.insert(self.waypoints.len(), anchor, sink);
    }

    /// Remove the waypoint at `index` together with its renderables.
    pub fn remove(&mut self, index: usize, sink: &mut impl RenderableSink) {
        if index >= self.waypoints.len() {
            return;
        }
        let waypoint = self.waypoints.remove(index);
        sink.remove(waypoint.anchor_handle);
        sink.remove(waypoint.ground_handle);
        sink.remove(waypoint.height_indicator);
        self.rebuild_segments(sink);
    }

    /// Replace the anchor coordinate of waypoint `index` and move its
    /// markers. Segment lines follow automatically through their live
    /// marker ends.
    pub fn set_anchor(&mut self, index: usize, anchor: Coordinate, sink: &mut impl RenderableSink) {
        let Some(waypoint) = self.waypoints.get_mut(index) else {
            return;
        };
        waypoint.anchor = anchor;
        sink.set_position(waypoint.anchor_handle, ellipsoid::geodetic_to_ecef(&anchor));
        sink.set_position(waypoint.ground_handle, ellipsoid::surface_ecef(&anchor));
    }

    /// Drop every renderable owned by the store and empty the sequence.
    pub fn clear(&mut self, sink: &mut impl RenderableSink) {
        for waypoint in self.waypoints.drain(..) {
            sink.remove(waypoint.anchor_handle);
            sink.remove(waypoint.ground_handle);
            sink.remove(waypoint.height_indicator);
        }
        for segment in self.segments.drain(..) {
            sink.remove(segment.anchor_line);
            sink.remove(segment.ground_line);
        }
    }

    /// Which waypoint or segment a renderable id belongs to.
    pub fn classify(&self, id: RenderableId) -> Option<(usize, HandleKind)> {
        for (i, waypoint) in self.waypoints.iter().enumerate() {
            if id == waypoint.anchor_handle {
                return Some((i, HandleKind::Anchor));
            }
            if id == waypoint.ground_handle {
                return Some((i, HandleKind::Ground));
            }
            if id == waypoint.height_indicator {
                return Some((i, HandleKind::HeightIndicator));
            }
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if id == segment.anchor_line {
                return Some((i, HandleKind::SegmentAnchor));
            }
            if id == segment.ground_line {
                return Some((i, HandleKind::SegmentGround));
            }
        }
        None
    }

    /// Pickable geometry for drill picking: vertex markers plus the ground
    /// segment lines (only the ground line accepts insertion clicks).
    pub fn pick_candidates(&self) -> Vec<PickCandidate> {
        let mut candidates = Vec::with_capacity(self.waypoints.len() * 2 + self.segments.len());
        for waypoint in &self.waypoints {
            candidates.push(PickCandidate {
                id: waypoint.anchor_handle,
                shape: PickShape::Point(ellipsoid::geodetic_to_ecef(&waypoint.anchor)),
            });
            candidates.push(PickCandidate {
                id: waypoint.ground_handle,
                shape: PickShape::Point(ellipsoid::surface_ecef(&waypoint.anchor)),
            });
        }
        for (i, segment) in self.segments.iter().enumerate() {
            let a = ellipsoid::surface_ecef(&self.waypoints[i].anchor);
            let b = ellipsoid::surface_ecef(&self.waypoints[i + 1].anchor);
            candidates.push(PickCandidate {
                id: segment.ground_line,
                shape: PickShape::Arc(a, b),
            });
        }
        candidates
    }

    /// Discard all segment renderables and recreate `count - 1` pairs bound
    /// to the current order. Lines reference markers, not positions, so
    /// later waypoint moves need no further rebuilds.
    fn rebuild_segments(&mut self, sink: &mut impl RenderableSink) {
        for segment in self.segments.drain(..) {
            sink.remove(segment.anchor_line);
            sink.remove(segment.ground_line);
        }
        for pair in self.waypoints.windows(2) {
            let anchor_line = sink.add_line(
                [
                    LineEnd::Marker(pair[0].anchor_handle),
                    LineEnd::Marker(pair[1].anchor_handle),
                ],
                LineStyle::SegmentAnchor,
            );
            let ground_line = sink.add_line(
                [
                    LineEnd::Marker(pair[0].ground_handle),
                    LineEnd::Marker(pair[1].ground_handle),
                ],
                LineStyle::SegmentGround,
            );
            self.segments.push(SegmentHandles {
                anchor_line,
                ground_line,
            });
        }
    }
}

/// Which drag, if any, the editor is in the middle of.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ActiveDrag {
    #[default]
    None,
    Translate,
    Altitude {
        press_screen_y: f64,
        start_height_m: f64,
    },
}

/// What is currently under the cursor and which drag is running. Discarded
/// wholesale on deactivation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PickState {
    /// Waypoint index plus the handle kind that was hit. Takes priority
    /// over segment hover.
    pub hovered_waypoint: Option<(usize, HandleKind)>,
    /// Lower waypoint index of the hovered ground segment line.
    pub hovered_segment: Option<usize>,
    pub drag: ActiveDrag,
    pub press_screen: Option<DVec2>,
}

impl PickState {
    pub fn clear_hover(&mut self) {
        self.hovered_waypoint = None;
        self.hovered_segment = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::ledger::RenderableLedger;

    fn coord(lon: f64, lat: f64, h: f64) -> Coordinate {
        Coordinate::new(lon, lat, h)
    }

    #[test]
    fn push_builds_handles_and_segments() {
        let mut sink = RenderableLedger::default();
        let mut store = VertexStore::default();
        store.push(coord(30.0, 60.0, 0.0), &mut sink);
        store.push(coord(31.0, 60.0, 0.0), &mut sink);
        store.push(coord(32.0, 60.0, 0.0), &mut sink);

        assert_eq!(store.len(), 3);
        assert_eq!(store.segment_count(), 2);
        // 2 markers + 1 height indicator per waypoint, 2 lines per segment.
        assert_eq!(sink.markers.len(), 6);
        assert_eq!(sink.lines.len(), 3 + 4);
    }

    #[test]
    fn insert_mid_sequence_keeps_order() {
        let mut sink = RenderableLedger::default();
        let mut store = VertexStore::default();
        store.push(coord(30.0, 60.0, 0.0), &mut sink);
        store.push(coord(31.0, 60.0, 0.0), &mut sink);
        store.insert(1, coord(30.5, 60.0, 0.0), &mut sink);

        let lons: Vec<f64> = store.waypoints().iter().map(|w| w.anchor.lon_deg).collect();
        assert_eq!(lons, vec![30.0, 30.5, 31.0]);
        assert_eq!(store.segment_count(), 2);
    }

    #[test]
    fn remove_drops_renderables_and_shrinks_segments() {
        let mut sink = RenderableLedger::default();
        let mut store = VertexStore::default();
        store.push(coord(30.0, 60.0, 0.0), &mut sink);
        store.push(coord(31.0, 60.0, 100.0), &mut sink);
        store.push(coord(32.0, 60.0, 0.0), &mut sink);
        store.remove(1, &mut sink);

        assert_eq!(store.len(), 2);
        assert_eq!(store.segment_count(), 1);
        assert_eq!(sink.markers.len(), 4);
        assert_eq!(sink.lines.len(), 2 + 2);
    }

    #[test]
    fn classify_resolves_every_handle_kind() {
        let mut sink = RenderableLedger::default();
        let mut store = VertexStore::default();
        store.push(coord(30.0, 60.0, 0.0), &mut sink);
        store.push(coord(31.0, 60.0, 0.0), &mut sink);

        let w = store.waypoint(1).unwrap().clone();
        assert_eq!(store.classify(w.anchor_handle), Some((1, HandleKind::Anchor)));
        assert_eq!(store.classify(w.ground_handle), Some((1, HandleKind::Ground)));
        assert_eq!(
            store.classify(w.height_indicator),
            Some((1, HandleKind::HeightIndicator))
        );
        assert_eq!(store.classify(RenderableId(9_999)), None);
    }

    #[test]
    fn set_anchor_moves_markers_in_place() {
        let mut sink = RenderableLedger::default();
        let mut store = VertexStore::default();
        store.push(coord(30.0, 60.0, 500.0), &mut sink);
        store.set_anchor(0, coord(30.2, 60.1, 500.0), &mut sink);

        let w = store.waypoint(0).unwrap();
        let anchor_pos = sink.markers.get(&w.anchor_handle).unwrap().position;
        let expected = ellipsoid::geodetic_to_ecef(&coord(30.2, 60.1, 500.0));
        assert!((anchor_pos - expected).length() < 1e-6);
    }

    #[test]
    fn clear_leaves_no_renderables() {
        let mut sink = RenderableLedger::default();
        let mut store = VertexStore::default();
        store.push(coord(30.0, 60.0, 0.0), &mut sink);
        store.push(coord(31.0, 60.0, 0.0), &mut sink);
        store.clear(&mut sink);

        assert!(store.is_empty());
        assert_eq!(store.segment_count(), 0);
        assert!(sink.markers.is_empty());
        assert!(sink.lines.is_empty());
    }
}
