//! Shared tunables for the flight-path editor.
//!
//! Keeping thresholds and defaults in one crate makes it obvious which
//! numbers are interaction policy rather than algorithm.

pub mod editor;
pub mod flight;
pub mod geodesy;
pub mod render_settings;
