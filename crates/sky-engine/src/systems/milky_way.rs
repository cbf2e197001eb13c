//! Milky Way haze: samples along the galactic equator, stroked as a few
//! wide translucent bands.

use glam::Vec2;

use crate::core::astronomy::{equatorial_to_horizontal_at, galactic_to_equatorial};
use crate::sim::frame::MilkyWayPoint;
use crate::systems::vector::{VectorColor, VectorState};

/// Consecutive samples farther apart than this are not joined (px).
const MAX_JOIN_DISTANCE: f32 = 260.0;

/// (width px, r, g, b, alpha), drawn in order.
const HAZE_STROKES: [(f32, u8, u8, u8, f64); 3] = [
    (78.0, 85, 120, 255, 0.055),
    (42.0, 210, 215, 255, 0.045),
    (18.0, 255, 215, 160, 0.035),
];

/// Sample the galactic plane (b = 0) every `step_deg` of longitude.
pub fn sample_plane(step_deg: f64, latitude: f64, lst_degrees: f64) -> Vec<MilkyWayPoint> {
    let step = if step_deg.is_finite() && step_deg > 0.0 { step_deg } else { 4.0 };
    let count = (360.0 / step).ceil() as usize;
    (0..count)
        .map(|i| {
            let (ra, dec) = galactic_to_equatorial(i as f64 * step, 0.0);
            MilkyWayPoint::new(equatorial_to_horizontal_at(ra, dec, latitude, lst_degrees))
        })
        .collect()
}

/// Split the samples into drawable runs, breaking at hidden points and at
/// jumps where the projection wraps across the screen. The samples form a
/// closed ring, so the last sample joins back onto the first under the same
/// rules.
pub fn band_runs(points: &[MilkyWayPoint]) -> Vec<Vec<Vec2>> {
    let mut runs: Vec<Vec<Vec2>> = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();

    for p in points {
        let joins = current
            .last()
            .is_some_and(|last| last.distance(p.pos) <= MAX_JOIN_DISTANCE);
        if (!p.visible || !joins) && !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
        if p.visible {
            current.push(p.pos);
        }
    }

    let wraps = match (points.first(), points.last()) {
        (Some(first), Some(last)) => {
            points.len() > 2 && first.visible && last.visible && last.pos.distance(first.pos) <= MAX_JOIN_DISTANCE
        }
        _ => false,
    };
    if wraps {
        if runs.is_empty() {
            if let Some(&start) = current.first() {
                current.push(start);
            }
        } else {
            let mut head = runs.remove(0);
            current.append(&mut head);
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs.retain(|run| run.len() > 1);
    runs
}

/// Stroke the band into the haze layer.
pub fn draw_haze(layer: &mut VectorState, points: &[MilkyWayPoint]) {
    let runs = band_runs(points);
    for (width, r, g, b, a) in HAZE_STROKES {
        let color = VectorColor::rgba8(r, g, b, a);
        for run in &runs {
            layer.stroke_polyline(run, width, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f32, visible: bool) -> MilkyWayPoint {
        MilkyWayPoint {
            altitude: 10.0,
            azimuth: 0.0,
            visible,
            pos: Vec2::new(x, 0.0),
        }
    }

    #[test]
    fn samples_cover_full_circle() {
        let points = sample_plane(4.0, 51.4779, 100.0);
        assert_eq!(points.len(), 90);
        for p in &points {
            assert!((-90.0..=90.0).contains(&p.altitude));
        }
    }

    #[test]
    fn runs_break_on_hidden_points() {
        let points = [
            point(-10.0, false),
            point(0.0, true),
            point(10.0, true),
            point(20.0, false),
            point(30.0, true),
            point(40.0, true),
        ];
        let runs = band_runs(&points);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 2);
    }

    #[test]
    fn runs_break_on_wraparound_jump() {
        let points = [point(0.0, true), point(10.0, true), point(400.0, true), point(410.0, true)];
        let runs = band_runs(&points);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1], vec![Vec2::new(400.0, 0.0), Vec2::new(410.0, 0.0)]);
    }

    #[test]
    fn isolated_points_are_dropped() {
        let points = [point(0.0, true), point(10.0, false), point(400.0, true)];
        assert!(band_runs(&points).is_empty());
    }

    #[test]
    fn unbroken_ring_is_closed() {
        let points: Vec<MilkyWayPoint> = (0..12)
            .map(|i| {
                let a = i as f32 * std::f32::consts::TAU / 12.0;
                MilkyWayPoint {
                    altitude: 10.0,
                    azimuth: 0.0,
                    visible: true,
                    pos: Vec2::new(a.cos(), a.sin()) * 100.0,
                }
            })
            .collect();
        let runs = band_runs(&points);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 13);
        assert_eq!(runs[0].first(), runs[0].last());
    }

    #[test]
    fn trailing_run_joins_the_first() {
        // The lone last sample would be dropped without the wrap join.
        let points = [
            point(0.0, true),
            point(10.0, true),
            point(20.0, false),
            point(300.0, true),
            point(-10.0, true),
        ];
        let runs = band_runs(&points);
        assert_eq!(
            runs,
            vec![vec![Vec2::new(-10.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)]]
        );
    }

    #[test]
    fn wrap_respects_join_distance() {
        let points = [point(0.0, true), point(100.0, true), point(200.0, true), point(300.0, true)];
        let runs = band_runs(&points);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 4);
    }

    #[test]
    fn haze_draws_three_layers() {
        let points = [point(0.0, true), point(50.0, true)];
        let mut layer = VectorState::new();
        draw_haze(&mut layer, &points);
        let alphas: std::collections::BTreeSet<u32> = layer.vertices().iter().map(|v| (v.a * 1000.0).round() as u32).collect();
        assert_eq!(alphas.len(), 3);
    }
}
