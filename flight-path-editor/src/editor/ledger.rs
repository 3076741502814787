//! In-memory record store for editor renderables.
//!
//! The editor core writes markers, lines and labels here through the
//! [`RenderableSink`] trait; the Bevy scene-sync systems read the records
//! each frame and rebuild entities from them. Records are plain mutable
//! data, so the editor can retarget a line end or move a marker without
//! touching the render world.

use bevy::math::DVec3;
use bevy::platform::collections::HashMap;
use bevy::prelude::Resource;

use super::handles::{CursorHint, LineEnd, LineStyle, MarkerIcon, RenderableId, RenderableSink};

#[derive(Debug, Clone)]
pub struct MarkerRecord {
    pub position: DVec3,
    pub icon: MarkerIcon,
    pub clamp_to_ground: bool,
    pub visible: bool,
}

#[derive(Debug, Clone)]
pub struct LineRecord {
    pub ends: [LineEnd; 2],
    pub style: LineStyle,
    pub visible: bool,
}

#[derive(Debug, Clone)]
pub struct LabelRecord {
    pub position: DVec3,
    pub text: String,
    pub visible: bool,
}

/// Everything the editor currently wants drawn.
#[derive(Resource, Default)]
pub struct RenderableLedger {
    next_id: u64,
    pub markers: HashMap<RenderableId, MarkerRecord>,
    pub lines: HashMap<RenderableId, LineRecord>,
    pub labels: HashMap<RenderableId, LabelRecord>,
    pub cursor: CursorHint,
}

impl RenderableLedger {
    fn allocate(&mut self) -> RenderableId {
        self.next_id += 1;
        RenderableId(self.next_id)
    }

    /// A line end as a concrete position: fixed ends directly, marker ends
    /// through the marker's current record. `None` when a marker end
    /// references a removed marker.
    pub fn resolve_end(&self, end: &LineEnd) -> Option<DVec3> {
        match end {
            LineEnd::Fixed(p) => Some(*p),
            LineEnd::Marker(id) => self.markers.get(id).map(|m| m.position),
        }
    }

    pub fn resolve_line_ends(&self, line: &LineRecord) -> Option<[DVec3; 2]> {
        Some([
            self.resolve_end(&line.ends[0])?,
            self.resolve_end(&line.ends[1])?,
        ])
    }
}

impl RenderableSink for RenderableLedger {
    fn add_marker(
        &mut self,
        position: DVec3,
        icon: MarkerIcon,
        clamp_to_ground: bool,
    ) -> RenderableId {
        let id = self.allocate();
        self.markers.insert(
            id,
            MarkerRecord {
                position,
                icon,
                clamp_to_ground,
                visible: true,
            },
        );
        id
    }

    fn add_line(&mut self, ends: [LineEnd; 2], style: LineStyle) -> RenderableId {
        let id = self.allocate();
        self.lines.insert(
            id,
            LineRecord {
                ends,
                style,
                visible: true,
            },
        );
        id
    }

    fn add_label(&mut self, position: DVec3, text: &str) -> RenderableId {
        let id = self.allocate();
        self.labels.insert(
            id,
            LabelRecord {
                position,
                text: text.to_owned(),
                visible: true,
            },
        );
        id
    }

    fn remove(&mut self, id: RenderableId) {
        self.markers.remove(&id);
        self.lines.remove(&id);
        self.labels.remove(&id);
    }

    fn set_position(&mut self, id: RenderableId, position: DVec3) {
        if let Some(marker) = self.markers.get_mut(&id) {
            marker.position = position;
        } else if let Some(label) = self.labels.get_mut(&id) {
            label.position = position;
        }
    }

    fn position(&self, id: RenderableId) -> Option<DVec3> {
        self.markers
            .get(&id)
            .map(|m| m.position)
            .or_else(|| self.labels.get(&id).map(|l| l.position))
    }

    fn set_visible(&mut self, id: RenderableId, visible: bool) {
        if let Some(marker) = self.markers.get_mut(&id) {
            marker.visible = visible;
        } else if let Some(line) = self.lines.get_mut(&id) {
            line.visible = visible;
        } else if let Some(label) = self.labels.get_mut(&id) {
            label.visible = visible;
        }
    }

    fn set_label_text(&mut self, id: RenderableId, text: &str) {
        if let Some(label) = self.labels.get_mut(&id) {
            text.clone_into(&mut label.text);
        }
    }

    fn set_cursor(&mut self, cursor: CursorHint) {
        self.cursor = cursor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_across_kinds() {
        let mut ledger = RenderableLedger::default();
        let m = ledger.add_marker(DVec3::ZERO, MarkerIcon::Vertex, true);
        let l = ledger.add_line([LineEnd::Marker(m), LineEnd::Fixed(DVec3::X)], LineStyle::SegmentGround);
        let t = ledger.add_label(DVec3::Y, "a");
        assert_ne!(m, l);
        assert_ne!(l, t);
        assert_ne!(m, t);
    }

    #[test]
    fn marker_ends_track_marker_moves() {
        let mut ledger = RenderableLedger::default();
        let m = ledger.add_marker(DVec3::new(1.0, 0.0, 0.0), MarkerIcon::Vertex, true);
        let line = ledger.add_line(
            [LineEnd::Marker(m), LineEnd::Fixed(DVec3::ZERO)],
            LineStyle::SegmentAnchor,
        );
        ledger.set_position(m, DVec3::new(5.0, 5.0, 0.0));
        let record = ledger.lines.get(&line).unwrap();
        let ends = ledger.resolve_line_ends(record).unwrap();
        assert_eq!(ends[0], DVec3::new(5.0, 5.0, 0.0));
        assert_eq!(ends[1], DVec3::ZERO);
    }

    #[test]
    fn line_with_removed_marker_end_does_not_resolve() {
        let mut ledger = RenderableLedger::default();
        let m = ledger.add_marker(DVec3::X, MarkerIcon::Vertex, true);
        let line = ledger.add_line(
            [LineEnd::Marker(m), LineEnd::Fixed(DVec3::ZERO)],
            LineStyle::SegmentAnchor,
        );
        ledger.remove(m);
        let record = ledger.lines.get(&line).unwrap();
        assert!(ledger.resolve_line_ends(record).is_none());
    }

    #[test]
    fn remove_clears_the_record() {
        let mut ledger = RenderableLedger::default();
        let t = ledger.add_label(DVec3::ZERO, "tip");
        ledger.set_label_text(t, "updated");
        assert_eq!(ledger.labels.get(&t).unwrap().text, "updated");
        ledger.remove(t);
        assert!(ledger.labels.is_empty());
    }

    #[test]
    fn visibility_toggles_per_record() {
        let mut ledger = RenderableLedger::default();
        let m = ledger.add_marker(DVec3::ZERO, MarkerIcon::InsertPreview, true);
        assert!(ledger.markers.get(&m).unwrap().visible);
        ledger.set_visible(m, false);
        assert!(!ledger.markers.get(&m).unwrap().visible);
    }
}
