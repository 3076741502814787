//! Pointer-interaction thresholds for the geo editor.

/// Maximum screen distance between left-down and left-up for the release to
/// count as a click rather than a drag, in pixels.
pub const CLICK_PIXEL_TOLERANCE: f64 = 2.0;

/// Drill-pick radius around a vertex marker, in pixels.
pub const VERTEX_PICK_RADIUS_PX: f64 = 8.0;

/// Drill-pick radius around a ground segment line, in pixels.
pub const SEGMENT_PICK_RADIUS_PX: f64 = 6.0;

/// A waypoint at or below this height counts as lying on the ground, which
/// is the precondition for dragging its anchor handle horizontally.
pub const FLAT_HEIGHT_EPSILON_M: f64 = 1e-3;

/// Two left releases within this interval and radius are reported as a
/// double click by the input pump.
pub const DOUBLE_CLICK_WINDOW_S: f32 = 0.35;
pub const DOUBLE_CLICK_RADIUS_PX: f32 = 4.0;
