//! Geodesic arcs between geographic coordinates.
//!
//! Surface distance and point-at-surface-distance come from the `geo`
//! crate's ellipsoidal algorithms; heights are interpolated linearly by the
//! fraction of surface distance travelled.

use geo::{Distance, Geodesic, InterpolatePoint, Point};

use super::Coordinate;

fn to_point(c: &Coordinate) -> Point<f64> {
    Point::new(c.lon_deg, c.lat_deg)
}

/// Great-circle surface distance between two coordinates, metres. Heights
/// are ignored.
pub fn surface_distance_m(a: &Coordinate, b: &Coordinate) -> f64 {
    Geodesic::distance(to_point(a), to_point(b))
}

/// Linear interpolation.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// The coordinate at `distance_m` along the geodesic from `a` towards `b`.
/// Height is lerped by the fraction of the total surface distance; a
/// degenerate arc returns `a` unchanged.
pub fn point_at_distance(a: &Coordinate, b: &Coordinate, distance_m: f64) -> Coordinate {
    let total = surface_distance_m(a, b);
    if total <= f64::EPSILON {
        return *a;
    }
    let p = Geodesic::point_at_distance_between(to_point(a), to_point(b), distance_m);
    let t = distance_m / total;
    Coordinate::new(p.x(), p.y(), lerp(a.height_m, b.height_m, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_longitude_at_60n() {
        let a = Coordinate::on_surface(30.0, 60.0);
        let b = Coordinate::on_surface(31.0, 60.0);
        let d = surface_distance_m(&a, &b);
        // Roughly cos(60°) × one degree of longitude at the equator.
        assert!(d > 54_000.0 && d < 57_000.0, "distance {d}");
    }

    #[test]
    fn midpoint_of_parallel_arc() {
        let a = Coordinate::on_surface(30.0, 60.0);
        let b = Coordinate::on_surface(31.0, 60.0);
        let d = surface_distance_m(&a, &b);
        let mid = point_at_distance(&a, &b, d / 2.0);
        // Geodesic midpoint, not the arithmetic mean: longitude is halfway,
        // latitude bulges slightly poleward of the 60° parallel.
        assert!((mid.lon_deg - 30.5).abs() < 1e-3, "lon {}", mid.lon_deg);
        assert!(mid.lat_deg >= 60.0 && mid.lat_deg < 60.01, "lat {}", mid.lat_deg);
    }

    #[test]
    fn full_distance_reaches_far_endpoint() {
        let a = Coordinate::new(10.0, 45.0, 1_000.0);
        let b = Coordinate::new(12.0, 46.0, 3_000.0);
        let d = surface_distance_m(&a, &b);
        let end = point_at_distance(&a, &b, d);
        assert!((end.lon_deg - b.lon_deg).abs() < 1e-6);
        assert!((end.lat_deg - b.lat_deg).abs() < 1e-6);
        assert!((end.height_m - 3_000.0).abs() < 1e-6);
    }

    #[test]
    fn height_lerps_with_surface_fraction() {
        let a = Coordinate::new(0.0, 0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0, 10_000.0);
        let d = surface_distance_m(&a, &b);
        let q = point_at_distance(&a, &b, d * 0.25);
        assert!((q.height_m - 2_500.0).abs() < 1.0);
    }

    #[test]
    fn degenerate_arc_returns_start() {
        let a = Coordinate::new(5.0, 5.0, 42.0);
        let p = point_at_distance(&a, &a, 100.0);
        assert_eq!(p, a);
    }
}
