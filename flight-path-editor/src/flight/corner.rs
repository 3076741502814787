//! Corner rounding for exported paths.
//!
//! Each interior vertex is replaced by a quadratic bezier arc between a
//! shoulder point on the incoming segment and one on the outgoing segment,
//! with the vertex itself as the control point. The bezier is evaluated by
//! de Casteljau over geodesic interpolation, so samples stay on great-circle
//! arcs and heights follow along.

use constants::flight::{CORNER_SAMPLE_STEP, DEFAULT_CORNER_RADIUS_M};

use crate::geodesy::{Coordinate, arc};

/// Rounding parameters. The radius is a target: at tight vertices it is
/// clamped to half the shorter adjacent segment so shoulders never cross
/// neighbouring corners.
#[derive(Debug, Clone, Copy)]
pub struct CornerRounding {
    pub radius_m: f64,
}

impl Default for CornerRounding {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_CORNER_RADIUS_M,
        }
    }
}

/// Geodesic interpolation by fraction of surface distance.
fn interpolate(a: &Coordinate, b: &Coordinate, t: f64) -> Coordinate {
    let d = arc::surface_distance_m(a, b);
    arc::point_at_distance(a, b, d * t)
}

/// Quadratic bezier sample over geodesic arcs.
fn bezier(entry: &Coordinate, control: &Coordinate, exit: &Coordinate, t: f64) -> Coordinate {
    let q0 = interpolate(entry, control, t);
    let q1 = interpolate(control, exit, t);
    interpolate(&q0, &q1, t)
}

/// Replace every interior vertex of `path` with a rounded arc. Paths with
/// fewer than three vertices come back unchanged.
pub fn round_corners(path: &[Coordinate], rounding: CornerRounding) -> Vec<Coordinate> {
    if path.len() < 3 {
        return path.to_vec();
    }

    let steps = (1.0 / CORNER_SAMPLE_STEP).round() as usize;
    let mut out = Vec::with_capacity(2 + (path.len() - 2) * (steps + 1));
    out.push(path[0]);

    for window in path.windows(3) {
        let [prev, corner, next] = [&window[0], &window[1], &window[2]];
        let d_in = arc::surface_distance_m(prev, corner);
        let d_out = arc::surface_distance_m(corner, next);
        let radius = rounding.radius_m.min(d_in / 2.0).min(d_out / 2.0);
        if radius <= f64::EPSILON {
            out.push(*corner);
            continue;
        }

        let entry = arc::point_at_distance(prev, corner, d_in - radius);
        let exit = arc::point_at_distance(corner, next, radius);
        for k in 0..=steps {
            let t = k as f64 / steps as f64;
            out.push(bezier(&entry, corner, &exit, t));
        }
    }

    out.push(path[path.len() - 1]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right_angle_path() -> Vec<Coordinate> {
        vec![
            Coordinate::on_surface(30.0, 0.0),
            Coordinate::on_surface(31.0, 0.0),
            Coordinate::on_surface(31.0, 1.0),
        ]
    }

    #[test]
    fn short_paths_pass_through() {
        let path = vec![
            Coordinate::on_surface(30.0, 0.0),
            Coordinate::on_surface(31.0, 0.0),
        ];
        assert_eq!(round_corners(&path, CornerRounding::default()), path);
    }

    #[test]
    fn endpoints_are_preserved() {
        let path = right_angle_path();
        let rounded = round_corners(&path, CornerRounding::default());
        assert_eq!(rounded.first(), path.first());
        assert_eq!(rounded.last(), path.last());
        assert!(rounded.len() > path.len());
    }

    #[test]
    fn corner_vertex_is_cut() {
        let path = right_angle_path();
        let rounded = round_corners(&path, CornerRounding { radius_m: 20_000.0 });
        // No sample lands on the original corner; the arc stays inside it.
        let corner = path[1];
        for c in &rounded[1..rounded.len() - 1] {
            let d = arc::surface_distance_m(c, &corner);
            assert!(d > 1_000.0, "sample {c:?} too close to the corner");
        }
    }

    #[test]
    fn arc_starts_and_ends_on_the_segments() {
        let path = right_angle_path();
        let r = 20_000.0;
        let rounded = round_corners(&path, CornerRounding { radius_m: r });
        let first_arc = rounded[1];
        let last_arc = rounded[rounded.len() - 2];
        // Entry shoulder sits on the incoming parallel, exit on the
        // outgoing meridian, each a radius short of the corner.
        assert!(first_arc.lat_deg.abs() < 1e-6, "lat {}", first_arc.lat_deg);
        assert!(
            (arc::surface_distance_m(&first_arc, &path[1]) - r).abs() < 10.0
        );
        assert!((last_arc.lon_deg - 31.0).abs() < 1e-6);
        assert!(
            (arc::surface_distance_m(&last_arc, &path[1]) - r).abs() < 10.0
        );
    }

    #[test]
    fn radius_clamps_to_half_the_shorter_segment() {
        let path = vec![
            Coordinate::on_surface(30.0, 0.0),
            Coordinate::on_surface(30.1, 0.0),
            Coordinate::on_surface(30.1, 5.0),
        ];
        let rounded = round_corners(&path, CornerRounding { radius_m: 1.0e6 });
        // The incoming segment is ~11 km, so the shoulder can sit at most
        // ~5.5 km before the corner; the arc must begin past the segment
        // midpoint, never behind the previous vertex.
        let first_arc = rounded[1];
        let d_in = arc::surface_distance_m(&path[0], &path[1]);
        let d = arc::surface_distance_m(&first_arc, &path[1]);
        assert!(d <= d_in / 2.0 + 10.0, "shoulder {d} of {d_in}");
    }

    #[test]
    fn heights_carry_through_the_arc() {
        let path = vec![
            Coordinate::new(30.0, 0.0, 1_000.0),
            Coordinate::new(31.0, 0.0, 1_000.0),
            Coordinate::new(31.0, 1.0, 1_000.0),
        ];
        let rounded = round_corners(&path, CornerRounding::default());
        for c in &rounded {
            assert!((c.height_m - 1_000.0).abs() < 1.0, "height {}", c.height_m);
        }
    }
}
