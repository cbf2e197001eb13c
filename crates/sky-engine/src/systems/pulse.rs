//! Constellation pulse scheduler.
//!
//! On a fixed cadence one eligible constellation is highlighted with a
//! short triangular smoothstep envelope. Picks come from a hash of a
//! monotonically increasing counter, so a run is reproducible.

use crate::api::config::SkyConfig;
use crate::extensions::easing::Easing;
use crate::systems::hash::{hash01, hash_str32};

/// Timing and strength of the pulse cycle, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseTiming {
    pub first_delay_ms: f64,
    pub interval_ms: f64,
    pub duration_ms: f64,
    pub duration_jitter_ms: f64,
    pub amplitude: f64,
    pub amplitude_jitter: f64,
}

impl PulseTiming {
    pub fn from_config(config: &SkyConfig) -> Self {
        Self {
            first_delay_ms: config.pulse_first_delay_ms,
            interval_ms: config.pulse_interval_ms,
            duration_ms: config.pulse_duration_ms,
            duration_jitter_ms: config.pulse_duration_jitter_ms,
            amplitude: config.pulse_amplitude,
            amplitude_jitter: config.pulse_amplitude_jitter,
        }
    }
}

impl Default for PulseTiming {
    fn default() -> Self {
        Self::from_config(&SkyConfig::default())
    }
}

/// Highlight to apply this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    /// Constellation abbreviation.
    pub key: String,
    /// Extra line/star alpha.
    pub alpha: f64,
}

#[derive(Debug, Clone)]
struct ActivePulse {
    key: String,
    start_ms: f64,
    duration_ms: f64,
    amplitude: f64,
}

/// Triangular envelope eased by smoothstep, peak 1 at `t = 0.5`.
pub fn envelope(t: f64) -> f64 {
    let tri = if t < 0.5 { t / 0.5 } else { (1.0 - t) / 0.5 };
    Easing::Smoothstep.apply(tri)
}

#[derive(Debug, Clone)]
pub struct PulseScheduler {
    timing: PulseTiming,
    seed: u32,
    active: Option<ActivePulse>,
    next_at_ms: Option<f64>,
    pick_count: u32,
    enabled: bool,
}

impl PulseScheduler {
    pub fn new(timing: PulseTiming) -> Self {
        Self {
            timing,
            seed: hash_str32("pulse"),
            active: None,
            next_at_ms: None,
            pick_count: 0,
            enabled: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Stop pulsing for the rest of the view's life.
    pub fn disable(&mut self) {
        if self.enabled {
            log::debug!("constellation pulse disabled");
        }
        self.enabled = false;
        self.active = None;
    }

    /// Key of the constellation currently pulsing.
    pub fn active_key(&self) -> Option<&str> {
        self.active.as_ref().map(|p| p.key.as_str())
    }

    /// Number of picks so far.
    pub fn pick_count(&self) -> u32 {
        self.pick_count
    }

    /// Advance the cycle to `now_ms`.
    ///
    /// `eligible` is only evaluated when a pick is due; it returns the keys
    /// of constellations with at least one fully visible connection.
    pub fn tick(&mut self, now_ms: f64, eligible: impl FnOnce() -> Vec<String>) -> Option<Highlight> {
        if !self.enabled {
            return None;
        }
        let next_at = *self.next_at_ms.get_or_insert(now_ms + self.timing.first_delay_ms);

        if let Some(active) = &self.active {
            let t = (now_ms - active.start_ms) / active.duration_ms;
            if t < 1.0 {
                return Some(Highlight {
                    key: active.key.clone(),
                    alpha: envelope(t) * active.amplitude,
                });
            }
            self.active = None;
        }

        if now_ms < next_at {
            return None;
        }

        let candidates = eligible();
        if candidates.is_empty() {
            self.next_at_ms = Some(now_ms + self.timing.first_delay_ms);
            return None;
        }

        self.pick_count = self.pick_count.wrapping_add(1);
        let pc = self.pick_count;
        let u = hash01(self.seed, 10u32.wrapping_add(pc));
        let idx = ((u * candidates.len() as f64) as usize).min(candidates.len() - 1);

        let pulse = ActivePulse {
            key: candidates[idx].clone(),
            start_ms: now_ms,
            duration_ms: self.timing.duration_ms + hash01(self.seed, 20u32.wrapping_add(pc)) * self.timing.duration_jitter_ms,
            amplitude: self.timing.amplitude + hash01(self.seed, 30u32.wrapping_add(pc)) * self.timing.amplitude_jitter,
        };
        log::debug!("pulse #{pc}: {} for {:.0}ms", pulse.key, pulse.duration_ms);

        let highlight = Highlight {
            key: pulse.key.clone(),
            alpha: 0.0,
        };
        self.active = Some(pulse);
        self.next_at_ms = Some(now_ms + self.timing.interval_ms);
        Some(highlight)
    }
}

impl Default for PulseScheduler {
    fn default() -> Self {
        Self::new(PulseTiming::default())
    }
}
