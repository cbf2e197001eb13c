//! Frame composition: turns the per-frame entity arrays into two vertex
//! layers.
//!
//! The host clears to [`BACKGROUND`], blends the `haze` layer additively,
//! then draws the `sky` layer with normal alpha blending.

use std::collections::BTreeSet;
use std::f32::consts::PI;

use glam::Vec2;

use crate::api::types::BodyKind;
use crate::catalog::constellation::Constellation;
use crate::ephemeris::bodies::{body_visuals, MOON_ANGULAR_DIAMETER, SUN_ANGULAR_DIAMETER};
use crate::sim::frame::{FrameBody, FrameStar, Scene};
use crate::systems::appearance::draw_brightness;
use crate::systems::milky_way::draw_haze;
use crate::systems::pulse::Highlight;
use crate::systems::vector::{VectorColor, VectorState};

/// Clear colour, `rgba(0, 0, 5, 1)`.
pub const BACKGROUND: VectorColor = VectorColor::rgb(0.0, 0.0, 5.0 / 255.0);

pub const CONSTELLATION_BLUE: [u8; 3] = [74, 158, 255];
const WHITE8: [u8; 3] = [255, 255, 255];

const MOON_DARK: [u8; 3] = [20, 26, 34];
const MOON_LIT: [u8; 3] = [233, 236, 239];
const MOON_ALPHA: f64 = 0.95;
/// Half-width of the soft terminator band, as a fraction of the disc radius.
const TERMINATOR_SOFTNESS: f32 = 0.09;
/// Segments used for lit-region arcs.
const ARC_STEPS: usize = 32;

/// View state that changes how the scene is drawn.
#[derive(Clone, Copy)]
pub struct DrawOptions<'a> {
    /// Animation clock for twinkle, ms.
    pub t_ms: f64,
    pub star_brightness: f64,
    /// Current projection radius (horizon distance from center), px.
    pub dome_radius: f64,
    pub show_all_constellations: bool,
    pub show_solar_system: bool,
    pub show_milky_way: bool,
    pub hovered: Option<&'a str>,
    pub selected: &'a BTreeSet<String>,
    pub pulse: Option<&'a Highlight>,
}

/// The two output layers.
#[derive(Default)]
pub struct SkyCanvas {
    pub sky: VectorState,
    pub haze: VectorState,
}

impl SkyCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.sky.clear();
        self.haze.clear();
    }

    /// Rebuild both layers. Order: haze, stars, constellations, bodies.
    pub fn draw(&mut self, scene: &Scene, opts: &DrawOptions) {
        self.clear();

        if opts.show_milky_way && scene.milky_way.len() > 1 {
            draw_haze(&mut self.haze, scene.milky_way);
        }

        draw_stars(&mut self.sky, scene.stars, opts.star_brightness, opts.t_ms);

        let pulse_key = opts.pulse.map(|h| h.key.as_str());
        for c in constellations_to_draw(
            scene.constellations,
            opts.show_all_constellations,
            opts.hovered,
            opts.selected,
            pulse_key,
        ) {
            let hovered = opts.hovered == Some(c.key.as_str());
            let selected = opts.selected.contains(&c.key);
            let pulse = match opts.pulse {
                Some(h) if h.key == c.key => h.alpha,
                _ => 0.0,
            };
            draw_constellation(&mut self.sky, c, scene.stars, constellation_style(hovered, selected, pulse));
        }

        if opts.show_solar_system {
            draw_bodies(&mut self.sky, scene.bodies, opts.dome_radius);
        }
    }
}

/// Visible stars as tinted discs, with a faint glow on the brightest.
pub fn draw_stars(layer: &mut VectorState, stars: &[FrameStar], brightness_mul: f64, t_ms: f64) {
    for star in stars.iter().filter(|s| s.visible) {
        let brightness = draw_brightness(star.base_alpha, brightness_mul, star.altitude, &star.twinkle, t_ms);
        layer.fill_circle(star.pos, star.size, VectorColor::from_rgb8(star.rgb, brightness));

        if star.mag < 1.5 && brightness > 0.7 {
            layer.fill_circle(star.pos, star.size * 2.5, VectorColor::from_rgb8(star.rgb, brightness * 0.15));
        }
    }
}

/// Constellations shown under the visibility policy: everything when
/// show-all is on, otherwise the union of hovered, selected and pulsing.
pub fn constellations_to_draw<'a>(
    all: &'a [Constellation],
    show_all: bool,
    hovered: Option<&str>,
    selected: &BTreeSet<String>,
    pulse_key: Option<&str>,
) -> Vec<&'a Constellation> {
    if show_all {
        return all.iter().collect();
    }
    all.iter()
        .filter(|c| {
            let key = c.key.as_str();
            hovered == Some(key) || pulse_key == Some(key) || selected.contains(key)
        })
        .collect()
}

/// How one constellation is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstellationStyle {
    pub color: [u8; 3],
    pub alpha: f64,
    pub star_radius: f32,
    /// Glow around each star: colour and alpha, drawn at 3× the star radius.
    pub glow: Option<([u8; 3], f64)>,
    pub line_width: f32,
}

/// Style for a constellation. Hover wins over selection; the pulse only
/// adds alpha when the constellation is not hovered.
pub fn constellation_style(hovered: bool, selected: bool, pulse: f64) -> ConstellationStyle {
    if hovered {
        return ConstellationStyle {
            color: WHITE8,
            alpha: 1.0,
            star_radius: 5.0,
            glow: Some((WHITE8, 0.2)),
            line_width: 2.0,
        };
    }

    let (base, cap) = if selected { (0.35, 0.75) } else { (0.22, 0.65) };
    ConstellationStyle {
        color: CONSTELLATION_BLUE,
        alpha: (base + pulse).min(cap),
        star_radius: if selected { 5.0 } else { 4.0 },
        glow: selected.then_some((CONSTELLATION_BLUE, 0.18)),
        line_width: if selected || pulse > 0.0 { 2.0 } else { 1.5 },
    }
}

/// Stars and stick-figure lines; only above-horizon stars are drawn, and a
/// line only when both ends are up.
pub fn draw_constellation(layer: &mut VectorState, c: &Constellation, stars: &[FrameStar], style: ConstellationStyle) {
    let color = VectorColor::from_rgb8(style.color, style.alpha);

    for star in c.stars.iter().filter_map(|&i| stars.get(i)).filter(|s| s.visible) {
        layer.fill_circle(star.pos, style.star_radius, color);
        if let Some((glow_rgb, glow_alpha)) = style.glow {
            layer.fill_circle(star.pos, style.star_radius * 3.0, VectorColor::from_rgb8(glow_rgb, glow_alpha));
        }
    }

    for (a, b) in c.segments() {
        if let (Some(s), Some(t)) = (stars.get(a), stars.get(b)) {
            if s.visible && t.visible {
                layer.stroke_segment(s.pos, t.pos, style.line_width, color);
            }
        }
    }
}

/// On-screen radius of a body. The Sun and Moon scale with the projection
/// (boosted ×6 and clamped to 8-18 px); planets use their fixed size.
pub fn body_radius(body: &FrameBody, dome_radius: f64) -> f32 {
    let angular = match body.name() {
        "Sun" => SUN_ANGULAR_DIAMETER,
        "Moon" => MOON_ANGULAR_DIAMETER,
        other => return body_visuals(other).radius_px,
    };
    let px_per_deg = dome_radius / 90.0;
    ((angular / 2.0) * px_per_deg * 6.0).clamp(8.0, 18.0) as f32
}

/// Visible solar bodies. The Moon gets a phase disc when it has a phase.
pub fn draw_bodies(layer: &mut VectorState, bodies: &[FrameBody], dome_radius: f64) {
    let sun_pos = bodies
        .iter()
        .find(|b| b.visible && b.kind() == BodyKind::Sun)
        .map(|b| b.pos);

    for body in bodies.iter().filter(|b| b.visible) {
        let r = body_radius(body, dome_radius);

        if body.kind() == BodyKind::Moon {
            if let Some(phase) = body.body.phase_fraction.filter(|f| f.is_finite()) {
                let toward_sun = sun_pos.map_or(0.0, |s| (s.y - body.pos.y).atan2(s.x - body.pos.x));
                draw_moon(layer, body.pos, r, phase, toward_sun);
                continue;
            }
        }

        let rgb = body_visuals(body.name()).color;
        layer.fill_circle(body.pos, r, VectorColor::from_rgb8(rgb, 0.95));
        layer.fill_circle(body.pos, r * 2.2, VectorColor::from_rgb8(rgb, 0.12));
    }
}

/// Dark disc, lit side toward `angle`, soft terminator, rim and halo.
fn draw_moon(layer: &mut VectorState, center: Vec2, r: f32, phase: f64, angle: f32) {
    let phase = phase.clamp(0.0, 1.0) as f32;
    layer.fill_circle(center, r, VectorColor::from_rgb8(MOON_DARK, MOON_ALPHA));

    // Terminator at x = (1 - 2f)r in the sun-aligned frame: full ⇒ -r, new ⇒ +r.
    let terminator_x = (1.0 - 2.0 * phase) * r;
    let soft = TERMINATOR_SOFTNESS * r;

    // Two stacked layers so the band between them sits at half strength and
    // the fully lit side composites back to MOON_ALPHA.
    let first = MOON_ALPHA / 2.0;
    let second = (MOON_ALPHA - first) / (1.0 - first);
    for (cut, alpha) in [(terminator_x - soft, first), (terminator_x + soft, second)] {
        let region = lit_region(center, r, cut, angle);
        layer.fill_polygon(&region, VectorColor::from_rgb8(MOON_LIT, alpha));
    }

    layer.stroke_circle(center, r, 1.0, VectorColor::WHITE.with_alpha(0.15));
    layer.fill_circle(center, r * 2.1, VectorColor::from_rgb8(MOON_LIT, 0.09));
}

/// Part of the disc with local `x > cut`, rotated by `angle` about the center.
/// Empty when the cut lies outside the disc on the far side.
pub fn lit_region(center: Vec2, r: f32, cut: f32, angle: f32) -> Vec<Vec2> {
    if r <= 0.0 || cut >= r {
        return Vec::new();
    }
    let half = if cut <= -r { PI } else { (cut / r).acos() };
    let rotation = Vec2::from_angle(angle);

    (0..=ARC_STEPS)
        .map(|k| {
            let theta = -half + 2.0 * half * k as f32 / ARC_STEPS as f32;
            center + rotation.rotate(Vec2::new(r * theta.cos(), r * theta.sin()))
        })
        .collect()
}
