//! Defaults for corner rounding and fly-path playback.

/// Default shoulder distance for rounding a path corner, metres. Callers of
/// `round_corners` can pass their own radius per export.
pub const DEFAULT_CORNER_RADIUS_M: f64 = 3_000.0;

/// Bezier parameter step when sampling a rounded corner. A step of 0.025
/// yields 41 samples per corner including both shoulders.
pub const CORNER_SAMPLE_STEP: f64 = 0.025;

/// Constant travel speed used for fly-path timing, metres per second.
pub const FLY_SPEED_MPS: f64 = 100.0;
