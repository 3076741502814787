//! WGS84 reference ellipsoid parameters.

/// Semi-major axis (equatorial radius), metres.
pub const WGS84_SEMI_MAJOR_M: f64 = 6_378_137.0;

/// Semi-minor axis (polar radius), metres.
pub const WGS84_SEMI_MINOR_M: f64 = 6_356_752.314_245_179;
