//! Screen-space hit testing against the current frame.
//!
//! Hover resolves body → star → constellation; a click resolves
//! body → constellation. Only above-horizon entities are ever hit.

use glam::Vec2;

use crate::api::config::SkyConfig;
use crate::catalog::constellation::Constellation;
use crate::sim::frame::{FrameStar, Scene};
use crate::systems::render::body_radius;

/// Pixel tolerances for each hit tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRadii {
    pub body: f32,
    pub body_click_padding: f32,
    pub star: f32,
    pub constellation_margin: f32,
    pub constellation_star: f32,
    pub constellation_line: f32,
}

impl HitRadii {
    pub fn from_config(config: &SkyConfig) -> Self {
        Self {
            body: config.body_hit_radius,
            body_click_padding: config.body_click_padding,
            star: config.star_hit_radius,
            constellation_margin: config.constellation_margin,
            constellation_star: config.constellation_star_radius,
            constellation_line: config.constellation_line_radius,
        }
    }
}

impl Default for HitRadii {
    fn default() -> Self {
        Self::from_config(&SkyConfig::default())
    }
}

/// What the pointer is over. Indices point into the frame arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    Body(usize),
    Star(usize),
    Constellation(usize),
}

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Body(usize),
    Constellation(usize),
}

/// Distance from `p` to the segment `a`-`b`; degenerate segments fall back
/// to the distance to `a`.
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= 1e-6 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn visible_members<'a>(c: &'a Constellation, stars: &'a [FrameStar]) -> impl Iterator<Item = &'a FrameStar> + 'a {
    c.stars.iter().filter_map(|&i| stars.get(i)).filter(|s| s.visible)
}

fn visible_segments<'a>(c: &'a Constellation, stars: &'a [FrameStar]) -> impl Iterator<Item = (Vec2, Vec2)> + 'a {
    c.segments().filter_map(|(a, b)| match (stars.get(a), stars.get(b)) {
        (Some(s), Some(t)) if s.visible && t.visible => Some((s.pos, t.pos)),
        _ => None,
    })
}

/// Whether `p` is on a constellation: inside the margin-expanded bounding
/// box of its visible stars, and near one of them or near a visible line.
pub fn point_in_constellation(p: Vec2, c: &Constellation, stars: &[FrameStar], radii: &HitRadii) -> bool {
    let mut members = visible_members(c, stars).peekable();
    if members.peek().is_none() {
        return false;
    }

    let (mut min, mut max) = (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY));
    let mut near_star = false;
    for s in members {
        min = min.min(s.pos);
        max = max.max(s.pos);
        near_star |= p.distance(s.pos) < radii.constellation_star;
    }
    let margin = Vec2::splat(radii.constellation_margin);
    if p.cmplt(min - margin).any() || p.cmpgt(max + margin).any() {
        return false;
    }
    if near_star {
        return true;
    }

    visible_segments(c, stars).any(|(a, b)| distance_to_segment(p, a, b) <= radii.constellation_line)
}

/// Resolve the hover target at `p`.
pub fn hover_at(
    p: Vec2,
    scene: &Scene,
    radii: &HitRadii,
    show_solar_system: bool,
    show_all_stars: bool,
) -> Option<HoverTarget> {
    if show_solar_system {
        if let Some(i) = scene
            .bodies
            .iter()
            .position(|b| b.visible && p.distance(b.pos) < radii.body)
        {
            return Some(HoverTarget::Body(i));
        }
    }

    if let Some(i) = scene
        .stars
        .iter()
        .position(|s| s.visible && (show_all_stars || s.named) && p.distance(s.pos) < radii.star)
    {
        return Some(HoverTarget::Star(i));
    }

    scene
        .constellations
        .iter()
        .position(|c| point_in_constellation(p, c, scene.stars, radii))
        .map(HoverTarget::Constellation)
}

/// Resolve a click at `p`. Bodies are hit within their drawn radius plus
/// padding; stars are not click targets.
pub fn click_at(
    p: Vec2,
    scene: &Scene,
    radii: &HitRadii,
    show_solar_system: bool,
    dome_radius: f64,
) -> Option<ClickTarget> {
    if show_solar_system {
        let hit = scene.bodies.iter().position(|b| {
            let r = body_radius(b, dome_radius) + radii.body_click_padding;
            b.visible && p.distance_squared(b.pos) <= r * r
        });
        if let Some(i) = hit {
            return Some(ClickTarget::Body(i));
        }
    }

    scene
        .constellations
        .iter()
        .position(|c| point_in_constellation(p, c, scene.stars, radii))
        .map(ClickTarget::Constellation)
}

/// Where a popover for `c` should attach: the mean of its visible segment
/// midpoints, else of its visible stars, else of all its stars.
pub fn constellation_anchor(c: &Constellation, stars: &[FrameStar]) -> Vec2 {
    let midpoints: Vec<Vec2> = visible_segments(c, stars).map(|(a, b)| (a + b) * 0.5).collect();
    if !midpoints.is_empty() {
        return mean(&midpoints);
    }
    let visible: Vec<Vec2> = visible_members(c, stars).map(|s| s.pos).collect();
    if !visible.is_empty() {
        return mean(&visible);
    }
    let all: Vec<Vec2> = c.stars.iter().filter_map(|&i| stars.get(i)).map(|s| s.pos).collect();
    mean(&all)
}

fn mean(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::ZERO;
    }
    points.iter().copied().sum::<Vec2>() / points.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{BodyKind, SolarBody};
    use crate::catalog::star::CatalogStar;
    use crate::core::astronomy::Horizontal;
    use crate::sim::frame::FrameBody;

    fn star_at(index: usize, x: f32, y: f32, named: bool, visible: bool) -> FrameStar {
        let mut cat = CatalogStar::new(index as u32 + 1, 0.0, 0.0, 2.0);
        if named {
            cat = cat.named("Star");
        }
        let mut s = FrameStar::new(
            index,
            &cat,
            Horizontal { altitude: 30.0, azimuth: 0.0, visible: true },
        );
        s.pos = Vec2::new(x, y);
        s.visible = visible;
        s
    }

    fn bar() -> Constellation {
        // Two stars 200 px apart on a horizontal line.
        Constellation {
            key: "Ori".into(),
            name: "Orion".into(),
            section: Some("projects".into()),
            path: None,
            stars: vec![0, 1],
            connections: vec![(0, 1)],
        }
    }

    fn planet(x: f32, y: f32) -> FrameBody {
        let mut b = FrameBody::new(SolarBody {
            name: "Mars".into(),
            kind: BodyKind::Planet,
            ra: 0.0,
            dec: 0.0,
            altitude: 20.0,
            azimuth: 0.0,
            visible: true,
            magnitude: None,
            phase_fraction: None,
        });
        b.pos = Vec2::new(x, y);
        b.visible = true;
        b
    }

    #[test]
    fn segment_distance() {
        let a = Vec2::ZERO;
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(distance_to_segment(Vec2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(Vec2::new(-4.0, 3.0), a, b), 5.0);
        assert_eq!(distance_to_segment(Vec2::new(3.0, 4.0), a, a), 5.0);
    }

    #[test]
    fn click_near_segment_midpoint_selects_constellation() {
        let stars = vec![star_at(0, 100.0, 300.0, false, true), star_at(1, 300.0, 300.0, false, true)];
        let constellations = vec![bar()];
        let scene = Scene { stars: &stars, constellations: &constellations, bodies: &[], milky_way: &[] };

        let p = Vec2::new(200.0, 305.0);
        assert_eq!(click_at(p, &scene, &HitRadii::default(), true, 400.0), Some(ClickTarget::Constellation(0)));
        assert_eq!(constellation_anchor(&constellations[0], &stars), Vec2::new(200.0, 300.0));
    }

    #[test]
    fn nearby_named_star_does_not_steal_constellation() {
        // Star 2 is named and visible, 40 px below the click point.
        let stars = vec![
            star_at(0, 100.0, 300.0, false, true),
            star_at(1, 300.0, 300.0, false, true),
            star_at(2, 200.0, 345.0, true, true),
        ];
        let constellations = vec![bar()];
        let scene = Scene { stars: &stars, constellations: &constellations, bodies: &[], milky_way: &[] };
        let radii = HitRadii::default();

        let p = Vec2::new(200.0, 305.0);
        assert_eq!(p.distance(stars[2].pos), 40.0);
        assert_eq!(click_at(p, &scene, &radii, true, 400.0), Some(ClickTarget::Constellation(0)));
        for show_all_stars in [false, true] {
            assert_eq!(
                hover_at(p, &scene, &radii, true, show_all_stars),
                Some(HoverTarget::Constellation(0)),
                "show_all_stars = {show_all_stars}"
            );
        }
        // right on top of it, the star wins the hover but never the click
        let on_star = Vec2::new(200.0, 340.0);
        assert_eq!(hover_at(on_star, &scene, &radii, true, false), Some(HoverTarget::Star(2)));
        assert!(click_at(on_star, &scene, &radii, true, 400.0).is_none());
    }

    #[test]
    fn far_from_lines_and_stars_misses() {
        let stars = vec![star_at(0, 100.0, 300.0, false, true), star_at(1, 300.0, 300.0, false, true)];
        let constellations = vec![bar()];
        let scene = Scene { stars: &stars, constellations: &constellations, bodies: &[], milky_way: &[] };
        // Inside the box, 20 px off the line, far from both stars.
        assert!(click_at(Vec2::new(200.0, 320.0), &scene, &HitRadii::default(), true, 400.0).is_none());
        // Outside the box.
        assert!(click_at(Vec2::new(200.0, 400.0), &scene, &HitRadii::default(), true, 400.0).is_none());
    }

    #[test]
    fn hidden_stars_do_not_count() {
        let stars = vec![star_at(0, 100.0, 300.0, false, true), star_at(1, 300.0, 300.0, false, false)];
        let c = bar();
        let radii = HitRadii::default();
        // No visible segment, so only the star proximity test applies.
        assert!(!point_in_constellation(Vec2::new(200.0, 300.0), &c, &stars, &radii));
        assert!(point_in_constellation(Vec2::new(110.0, 300.0), &c, &stars, &radii));
        // Anchor falls back to the visible star.
        assert_eq!(constellation_anchor(&c, &stars), Vec2::new(100.0, 300.0));
    }

    #[test]
    fn anchor_uses_all_stars_when_none_visible() {
        let stars = vec![star_at(0, 0.0, 0.0, false, false), star_at(1, 10.0, 20.0, false, false)];
        assert_eq!(constellation_anchor(&bar(), &stars), Vec2::new(5.0, 10.0));
    }

    #[test]
    fn hover_priority_body_then_star_then_constellation() {
        let stars = vec![star_at(0, 100.0, 300.0, true, true), star_at(1, 300.0, 300.0, false, true)];
        let constellations = vec![bar()];
        let bodies = vec![planet(100.0, 305.0)];
        let radii = HitRadii::default();
        let scene = Scene { stars: &stars, constellations: &constellations, bodies: &bodies, milky_way: &[] };

        let p = Vec2::new(100.0, 302.0);
        assert_eq!(hover_at(p, &scene, &radii, true, false), Some(HoverTarget::Body(0)));
        assert_eq!(hover_at(p, &scene, &radii, false, false), Some(HoverTarget::Star(0)));

        // Unnamed star only hovers with show-all-stars; otherwise the constellation wins.
        let q = Vec2::new(300.0, 302.0);
        assert_eq!(hover_at(q, &scene, &radii, false, false), Some(HoverTarget::Constellation(0)));
        assert_eq!(hover_at(q, &scene, &radii, false, true), Some(HoverTarget::Star(1)));
    }

    #[test]
    fn click_skips_stars_and_pads_bodies() {
        let stars = vec![star_at(0, 500.0, 500.0, true, true)];
        let bodies = vec![planet(100.0, 100.0)];
        let scene = Scene { stars: &stars, constellations: &[], bodies: &bodies, milky_way: &[] };
        let radii = HitRadii::default();

        // Mars is drawn at 4 px; a click 11 px away still hits with 8 px padding.
        assert_eq!(click_at(Vec2::new(111.0, 100.0), &scene, &radii, true, 400.0), Some(ClickTarget::Body(0)));
        assert!(click_at(Vec2::new(113.0, 100.0), &scene, &radii, true, 400.0).is_none());
        assert!(click_at(Vec2::new(111.0, 100.0), &scene, &radii, false, 400.0).is_none());
        assert!(click_at(Vec2::new(500.0, 500.0), &scene, &radii, true, 400.0).is_none());
    }
}
