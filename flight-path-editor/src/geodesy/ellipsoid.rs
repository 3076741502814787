//! WGS84 geodetic ↔ ECEF cartesian conversions.

use bevy::math::DVec3;
use constants::geodesy::{WGS84_SEMI_MAJOR_M, WGS84_SEMI_MINOR_M};
use serde::{Deserialize, Serialize};

/// First eccentricity squared of the WGS84 ellipsoid.
const E2: f64 = 1.0
    - (WGS84_SEMI_MINOR_M * WGS84_SEMI_MINOR_M) / (WGS84_SEMI_MAJOR_M * WGS84_SEMI_MAJOR_M);

/// A geographic position: longitude/latitude in degrees, height above the
/// ellipsoid in metres. This is the shape `get_data()` exports and the
/// flight modules consume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub height_m: f64,
}

impl Coordinate {
    pub fn new(lon_deg: f64, lat_deg: f64, height_m: f64) -> Self {
        Self {
            lon_deg,
            lat_deg,
            height_m,
        }
    }

    /// Position on the ellipsoid surface (height 0).
    pub fn on_surface(lon_deg: f64, lat_deg: f64) -> Self {
        Self::new(lon_deg, lat_deg, 0.0)
    }

    /// Same longitude/latitude at a different height.
    pub fn with_height(&self, height_m: f64) -> Self {
        Self::new(self.lon_deg, self.lat_deg, height_m)
    }

    /// The surface projection of this coordinate.
    pub fn ground(&self) -> Self {
        self.with_height(0.0)
    }
}

/// Geodetic → ECEF, metres.
pub fn geodetic_to_ecef(c: &Coordinate) -> DVec3 {
    let lon = c.lon_deg.to_radians();
    let lat = c.lat_deg.to_radians();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    // Prime vertical radius of curvature.
    let n = WGS84_SEMI_MAJOR_M / (1.0 - E2 * sin_lat * sin_lat).sqrt();

    DVec3::new(
        (n + c.height_m) * cos_lat * cos_lon,
        (n + c.height_m) * cos_lat * sin_lon,
        (n * (1.0 - E2) + c.height_m) * sin_lat,
    )
}

/// ECEF → geodetic via fixed-point iteration on the latitude. Converges to
/// sub-millimetre in a handful of rounds for any point outside the core.
pub fn ecef_to_geodetic(p: DVec3) -> Coordinate {
    let lon = p.y.atan2(p.x);
    let axial = (p.x * p.x + p.y * p.y).sqrt();

    if axial < 1e-9 {
        // On the polar axis the longitude is arbitrary.
        let height = p.z.abs() - WGS84_SEMI_MINOR_M;
        let lat = if p.z >= 0.0 { 90.0 } else { -90.0 };
        return Coordinate::new(lon.to_degrees(), lat, height);
    }

    let mut lat = (p.z / (axial * (1.0 - E2))).atan();
    let mut height = 0.0;
    for _ in 0..6 {
        let sin_lat = lat.sin();
        let n = WGS84_SEMI_MAJOR_M / (1.0 - E2 * sin_lat * sin_lat).sqrt();
        height = axial / lat.cos() - n;
        lat = (p.z / (axial * (1.0 - E2 * n / (n + height)))).atan();
    }

    Coordinate::new(lon.to_degrees(), lat.to_degrees(), height)
}

/// ECEF position of the surface projection of `c`.
pub fn surface_ecef(c: &Coordinate) -> DVec3 {
    geodetic_to_ecef(&c.ground())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(c: &Coordinate, lon: f64, lat: f64, h: f64) {
        assert!((c.lon_deg - lon).abs() < 1e-7, "lon {} vs {}", c.lon_deg, lon);
        assert!((c.lat_deg - lat).abs() < 1e-7, "lat {} vs {}", c.lat_deg, lat);
        assert!((c.height_m - h).abs() < 1e-3, "height {} vs {}", c.height_m, h);
    }

    #[test]
    fn equator_prime_meridian_is_semi_major() {
        let p = geodetic_to_ecef(&Coordinate::on_surface(0.0, 0.0));
        assert!((p.x - WGS84_SEMI_MAJOR_M).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
        assert!(p.z.abs() < 1e-6);
    }

    #[test]
    fn round_trip_mid_latitude() {
        let c = Coordinate::new(30.0, 60.0, 0.0);
        assert_close(&ecef_to_geodetic(geodetic_to_ecef(&c)), 30.0, 60.0, 0.0);
    }

    #[test]
    fn round_trip_with_height() {
        let c = Coordinate::new(-122.42, 37.77, 12_500.0);
        assert_close(
            &ecef_to_geodetic(geodetic_to_ecef(&c)),
            -122.42,
            37.77,
            12_500.0,
        );
    }

    #[test]
    fn round_trip_southern_hemisphere() {
        let c = Coordinate::new(151.2, -33.87, 300.0);
        assert_close(&ecef_to_geodetic(geodetic_to_ecef(&c)), 151.2, -33.87, 300.0);
    }

    #[test]
    fn pole_height() {
        let c = ecef_to_geodetic(DVec3::new(0.0, 0.0, WGS84_SEMI_MINOR_M + 100.0));
        assert!((c.lat_deg - 90.0).abs() < 1e-9);
        assert!((c.height_m - 100.0).abs() < 1e-6);
    }

    #[test]
    fn surface_projection_drops_height() {
        let c = Coordinate::new(10.0, 45.0, 9_000.0);
        let g = ecef_to_geodetic(surface_ecef(&c));
        assert_close(&g, 10.0, 45.0, 0.0);
    }
}
