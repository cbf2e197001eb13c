use serde::Deserialize;

use crate::core::projection::ProjectionMode;

/// Tunables for a sky view. Every field has a default, so a host may pass
/// a partial JSON object (or nothing at all).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkyConfig {
    /// Simulated milliseconds between full astronomy recomputes (default: 2000).
    pub recompute_interval_ms: f64,
    /// Upper bound on the frame delta fed to animations (default: 50).
    pub max_frame_dt_ms: f64,
    /// Projection blend smoothing time constant (default: 220).
    pub blend_tau_ms: f64,
    /// Time-offset easing time constant (default: 140).
    pub time_offset_tau_ms: f64,
    /// Duration of the reset-view ease (default: 1200).
    pub reset_duration_ms: f64,

    /// Synthetic filler stars added to the catalog (default: 2950).
    pub filler_star_count: u32,
    /// First filler id; raised above the highest real id when needed (default: 1_000_000).
    pub filler_id_base: u32,
    /// Seed for the filler star generator.
    pub filler_seed: u64,

    /// Pointer travel before a press becomes a drag, px (default: 4).
    pub drag_threshold_px: f32,
    /// Fraction of a half-turn per viewport dimension a drag covers (default: 0.55).
    pub drag_scale: f64,

    /// Delay from view start to the first constellation pulse (default: 5000).
    pub pulse_first_delay_ms: f64,
    /// Cadence of constellation pulses (default: 10000).
    pub pulse_interval_ms: f64,
    /// Minimum pulse length (default: 4100).
    pub pulse_duration_ms: f64,
    /// Random extra pulse length (default: 700).
    pub pulse_duration_jitter_ms: f64,
    /// Minimum pulse peak alpha (default: 0.12).
    pub pulse_amplitude: f64,
    /// Random extra pulse peak alpha (default: 0.14).
    pub pulse_amplitude_jitter: f64,

    /// Galactic longitude step for Milky Way samples, degrees (default: 4).
    pub milky_way_step_deg: f64,

    /// Hover radius around solar bodies, px (default: 18).
    pub body_hit_radius: f32,
    /// Added to a body's drawn radius for click hits, px (default: 8).
    pub body_click_padding: f32,
    /// Hit radius around stars, px (default: 15).
    pub star_hit_radius: f32,
    /// Bounding-box margin for constellation hover, px (default: 40).
    pub constellation_margin: f32,
    /// Distance to a constellation star that still counts as a hit, px (default: 30).
    pub constellation_star_radius: f32,
    /// Distance to a constellation line that still counts as a hit, px (default: 10).
    pub constellation_line_radius: f32,

    /// Initial projection mode.
    #[serde(with = "projection_mode_name")]
    pub projection: ProjectionMode,
    pub show_all_constellations: bool,
    pub show_all_stars: bool,
    pub show_solar_system: bool,
    pub show_milky_way: bool,
    /// Star brightness multiplier, clamped to [0.2, 3] (default: 1).
    pub star_brightness: f64,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            recompute_interval_ms: 2000.0,
            max_frame_dt_ms: 50.0,
            blend_tau_ms: 220.0,
            time_offset_tau_ms: 140.0,
            reset_duration_ms: 1200.0,
            filler_star_count: 2950,
            filler_id_base: 1_000_000,
            filler_seed: 0x5eed_57a2,
            drag_threshold_px: 4.0,
            drag_scale: 0.55,
            pulse_first_delay_ms: 5000.0,
            pulse_interval_ms: 10_000.0,
            pulse_duration_ms: 4100.0,
            pulse_duration_jitter_ms: 700.0,
            pulse_amplitude: 0.12,
            pulse_amplitude_jitter: 0.14,
            milky_way_step_deg: 4.0,
            body_hit_radius: 18.0,
            body_click_padding: 8.0,
            star_hit_radius: 15.0,
            constellation_margin: 40.0,
            constellation_star_radius: 30.0,
            constellation_line_radius: 10.0,
            projection: ProjectionMode::Fill,
            show_all_constellations: false,
            show_all_stars: false,
            show_solar_system: true,
            show_milky_way: false,
            star_brightness: 1.0,
        }
    }
}

impl SkyConfig {
    /// Parse a (possibly partial) config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }
}

mod projection_mode_name {
    use serde::{Deserialize, Deserializer};

    use crate::core::projection::ProjectionMode;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<ProjectionMode, D::Error> {
        let name = String::deserialize(d)?;
        ProjectionMode::from_name(&name)
            .ok_or_else(|| serde::de::Error::unknown_variant(&name, &["fill", "accurate"]))
    }
}
