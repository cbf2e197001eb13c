//! Star appearance: size, brightness, tint and twinkle.
//!
//! Everything per-star here is a pure function of the star id (and
//! magnitude), so a recompute never reshuffles how a star looks.

use std::f64::consts::TAU;

use crate::api::types::StarId;
use crate::systems::hash::hash01;

/// Magnitude assumed for entries without a usable one.
const FALLBACK_MAG: f64 = 6.0;

/// Relative flux `10^(-0.4·mag)`.
#[inline]
pub fn intensity(mag: f64) -> f64 {
    let mag = if mag.is_finite() { mag } else { FALLBACK_MAG };
    10f64.powf(-0.4 * mag)
}

/// Opacity before extinction, twinkle and the user multiplier.
pub fn base_alpha(mag: f64) -> f64 {
    (0.08 + 0.95 * intensity(mag)).clamp(0.05, 1.0)
}

/// Disc radius in pixels.
pub fn star_size(mag: f64) -> f32 {
    (0.8 + 3.2 * intensity(mag).sqrt()).clamp(0.6, 4.2) as f32
}

/// Horizon dimming factor in [0.55, 1].
#[inline]
pub fn extinction(altitude: f64) -> f64 {
    let alt_factor = (altitude / 90.0).clamp(0.0, 1.0);
    0.55 + 0.45 * alt_factor.sqrt()
}

/// Per-star sinusoidal flicker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Twinkle {
    /// Angular frequency, radians per millisecond.
    pub omega: f64,
    /// Phase offset, radians.
    pub phase: f64,
    /// Zenith amplitude; scintillation near the horizon is added at draw time.
    pub amplitude: f64,
}

impl Twinkle {
    /// Deterministic twinkle parameters for a star.
    pub fn for_star(id: StarId) -> Self {
        let roll = hash01(id.0, 10);
        let roll2 = hash01(id.0, 11);
        let hz = if roll < 0.02 {
            4.0 + roll2 * 6.0
        } else if roll < 0.1 {
            1.5 + roll2 * 2.5
        } else {
            0.2 + roll2 * 1.2
        };

        Self {
            omega: TAU * hz / 1000.0,
            phase: hash01(id.0, 12) * TAU,
            amplitude: 0.04 + hash01(id.0, 13) * 0.03,
        }
    }

    /// Amplitude at `altitude`, stronger toward the horizon.
    pub fn amplitude_at(&self, altitude: f64) -> f64 {
        let alt_factor = (altitude / 90.0).clamp(0.0, 1.0);
        (self.amplitude + 0.12 * (1.0 - alt_factor)).clamp(0.03, 0.22)
    }

    /// Multiplicative brightness term `1 + amp·sin(ω·t + φ)`.
    pub fn factor(&self, altitude: f64, t_ms: f64) -> f64 {
        1.0 + self.amplitude_at(altitude) * (t_ms * self.omega + self.phase).sin()
    }
}

/// Final star opacity in [0, 1].
pub fn draw_brightness(base_alpha: f64, brightness_mul: f64, altitude: f64, twinkle: &Twinkle, t_ms: f64) -> f64 {
    let mul = brightness_mul.clamp(0.2, 3.0);
    (base_alpha * mul * extinction(altitude) * twinkle.factor(altitude, t_ms)).clamp(0.0, 1.0)
}

/// Approximate black-body colour for a temperature (Tanner Helland fit).
pub fn temperature_to_rgb(kelvin: f64) -> [u8; 3] {
    let t = kelvin.clamp(1000.0, 40_000.0) / 100.0;

    let (r, g, b) = if t <= 66.0 {
        let b = if t <= 19.0 { 0.0 } else { 138.517_731_223_1 * (t - 10.0).ln() - 305.044_792_730_7 };
        (255.0, 99.470_802_586_1 * t.ln() - 161.119_568_166_1, b)
    } else {
        (
            329.698_727_446 * (t - 60.0).powf(-0.133_204_759_2),
            288.122_169_528_3 * (t - 60.0).powf(-0.075_514_849_2),
            255.0,
        )
    };

    let channel = |v: f64| v.clamp(0.0, 255.0).round() as u8;
    [channel(r), channel(g), channel(b)]
}

/// Subtle, stable tint: mostly white with mild blue or yellow.
pub fn star_rgb(id: StarId, mag: f64) -> [u8; 3] {
    let u = hash01(id.0, 1);
    let v = hash01(id.0, 2);

    let m = if mag.is_finite() { mag } else { FALLBACK_MAG };
    let sat = (0.22 - 0.015 * (1.5 - m)).clamp(0.14, 0.24);

    let kelvin = if u < 0.14 {
        9000.0 + v * 4000.0
    } else if u < 0.72 {
        5600.0 + v * 1400.0
    } else if u < 0.98 {
        4700.0 + v * 900.0
    } else {
        4100.0 + v * 500.0
    };

    let tint = temperature_to_rgb(kelvin);
    tint.map(|c| (255.0 * (1.0 - sat) + c as f64 * sat).round() as u8)
}
