//! Timing and sampling of a flight along a rounded path.

use constants::flight::FLY_SPEED_MPS;

use crate::geodesy::{Coordinate, arc};

/// A flyable path: waypoints plus cumulative surface distance, sampled by
/// elapsed time at a constant ground speed. The clock is clamped, so
/// sampling past the end holds the final waypoint.
#[derive(Debug, Clone)]
pub struct FlyPath {
    waypoints: Vec<Coordinate>,
    cumulative_m: Vec<f64>,
    total_m: f64,
}

impl FlyPath {
    /// `None` when fewer than two waypoints are given.
    pub fn build(waypoints: Vec<Coordinate>) -> Option<Self> {
        if waypoints.len() < 2 {
            return None;
        }
        let mut cumulative_m = Vec::with_capacity(waypoints.len());
        let mut total_m = 0.0;
        cumulative_m.push(0.0);
        for pair in waypoints.windows(2) {
            total_m += arc::surface_distance_m(&pair[0], &pair[1]);
            cumulative_m.push(total_m);
        }
        Some(Self {
            waypoints,
            cumulative_m,
            total_m,
        })
    }

    pub fn waypoints(&self) -> &[Coordinate] {
        &self.waypoints
    }

    pub fn total_distance_m(&self) -> f64 {
        self.total_m
    }

    pub fn duration_s(&self) -> f64 {
        self.total_m / FLY_SPEED_MPS
    }

    pub fn is_finished(&self, elapsed_s: f64) -> bool {
        elapsed_s >= self.duration_s()
    }

    /// Position after `elapsed_s` seconds of flight, clamped to the ends.
    pub fn sample(&self, elapsed_s: f64) -> Coordinate {
        let along = (elapsed_s * FLY_SPEED_MPS).clamp(0.0, self.total_m);

        // Index of the segment containing `along`.
        let upper = self
            .cumulative_m
            .partition_point(|&d| d < along)
            .max(1)
            .min(self.waypoints.len() - 1);
        let lower = upper - 1;

        arc::point_at_distance(
            &self.waypoints[lower],
            &self.waypoints[upper],
            along - self.cumulative_m[lower],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> FlyPath {
        FlyPath::build(vec![
            Coordinate::new(30.0, 0.0, 0.0),
            Coordinate::new(31.0, 0.0, 1_000.0),
            Coordinate::new(32.0, 0.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn needs_two_waypoints() {
        assert!(FlyPath::build(vec![]).is_none());
        assert!(FlyPath::build(vec![Coordinate::on_surface(0.0, 0.0)]).is_none());
    }

    #[test]
    fn duration_follows_distance_and_speed() {
        let p = path();
        assert!((p.duration_s() - p.total_distance_m() / FLY_SPEED_MPS).abs() < 1e-9);
        // Two degrees along the equator is roughly 222 km.
        assert!(p.total_distance_m() > 220_000.0 && p.total_distance_m() < 225_000.0);
    }

    #[test]
    fn sample_clamps_at_both_ends() {
        let p = path();
        let start = p.sample(-5.0);
        assert!((start.lon_deg - 30.0).abs() < 1e-9);
        let end = p.sample(p.duration_s() + 100.0);
        assert!((end.lon_deg - 32.0).abs() < 1e-6);
        assert!(end.height_m.abs() < 1e-6);
    }

    #[test]
    fn sample_crosses_segment_boundaries() {
        let p = path();
        // Halfway through the flight sits at the shared waypoint.
        let mid = p.sample(p.duration_s() / 2.0);
        assert!((mid.lon_deg - 31.0).abs() < 1e-3, "lon {}", mid.lon_deg);
        assert!((mid.height_m - 1_000.0).abs() < 5.0, "h {}", mid.height_m);
    }

    #[test]
    fn progress_is_monotonic_in_longitude() {
        let p = path();
        let mut last = f64::MIN;
        for i in 0..=20 {
            let c = p.sample(p.duration_s() * i as f64 / 20.0);
            assert!(c.lon_deg >= last - 1e-9, "lon went backwards at {i}");
            last = c.lon_deg;
        }
    }

    #[test]
    fn finish_flag_matches_duration() {
        let p = path();
        assert!(!p.is_finished(p.duration_s() * 0.9));
        assert!(p.is_finished(p.duration_s()));
    }
}
