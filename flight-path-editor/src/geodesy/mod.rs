//! # Geodesy
//!
//! Geographic positions and the conversions the editor needs.
//!
//! ## Pipeline
//! ```text
//! Geographic (WGS84)        →  ECEF cartesian        →  Render space
//!   lon/lat degrees, height     x/y/z metres (f64)      metres × RENDER_SCALE (f32)
//! ```
//!
//! All editor math runs on f64 ECEF metres; only the scene-sync layer
//! converts to render units.

pub mod arc;
pub mod ellipsoid;

pub use ellipsoid::Coordinate;
