//! Explicit simulation state owned by the sky view.

use std::collections::BTreeSet;

use crate::api::config::SkyConfig;
use crate::api::types::GeoLocation;
use crate::core::projection::ProjectionState;
use crate::interaction::hit_test::HoverTarget;
use crate::interaction::pointer::wrap_longitude;
use crate::interaction::reset::TimeOffsetEasing;
use crate::sim::frame::{FrameBody, FrameStar, MilkyWayPoint};
use crate::systems::pulse::{Highlight, PulseScheduler, PulseTiming};

pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// Where and when the sky is observed from.
#[derive(Debug, Clone)]
pub struct ObserverState {
    detected: GeoLocation,
    custom: Option<GeoLocation>,
    time_offset: TimeOffsetEasing,
}

impl ObserverState {
    pub fn new(time_offset_tau_ms: f64) -> Self {
        Self {
            detected: GeoLocation::GREENWICH,
            custom: None,
            time_offset: TimeOffsetEasing::new(time_offset_tau_ms),
        }
    }

    /// Effective location: the user's override, else the detected one.
    pub fn location(&self) -> GeoLocation {
        self.custom.unwrap_or(self.detected)
    }

    pub fn detected(&self) -> GeoLocation {
        self.detected
    }

    pub fn custom(&self) -> Option<GeoLocation> {
        self.custom
    }

    /// Non-finite positions are replaced by Greenwich.
    pub fn set_detected(&mut self, location: GeoLocation) {
        self.detected = if location.is_finite() {
            location
        } else {
            log::warn!("ignoring non-finite detected location {location:?}, using Greenwich");
            GeoLocation::GREENWICH
        };
    }

    /// Override the location. Latitude is clamped, longitude wrapped into
    /// [-180, 180); non-finite overrides are ignored.
    pub fn set_custom(&mut self, location: Option<GeoLocation>) {
        self.custom = match location {
            Some(l) if l.is_finite() => Some(GeoLocation {
                latitude: l.latitude.clamp(-90.0, 90.0),
                longitude: wrap_longitude(l.longitude),
            }),
            Some(l) => {
                log::debug!("ignoring non-finite custom location {l:?}");
                self.custom
            }
            None => None,
        };
    }

    pub fn time_offset_mut(&mut self) -> &mut TimeOffsetEasing {
        &mut self.time_offset
    }

    /// Current time offset, hours.
    pub fn time_offset_hours(&self) -> f64 {
        self.time_offset.current()
    }

    /// Simulated wall clock for a real wall clock reading.
    pub fn simulated_ms(&self, wall_ms: f64) -> f64 {
        wall_ms + self.time_offset.current() * MS_PER_HOUR
    }
}

/// Display switches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Toggles {
    pub show_all_constellations: bool,
    pub show_all_stars: bool,
    pub show_solar_system: bool,
    pub show_milky_way: bool,
    /// Already clamped to [0.2, 3].
    pub star_brightness: f64,
}

impl Toggles {
    pub fn from_config(config: &SkyConfig) -> Self {
        Self {
            show_all_constellations: config.show_all_constellations,
            show_all_stars: config.show_all_stars,
            show_solar_system: config.show_solar_system,
            show_milky_way: config.show_milky_way,
            star_brightness: clamp_brightness(config.star_brightness),
        }
    }
}

pub fn clamp_brightness(mul: f64) -> f64 {
    if mul.is_finite() {
        mul.clamp(0.2, 3.0)
    } else {
        1.0
    }
}

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        let sane = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: sane(width),
            height: sane(height),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Entities derived by the last astronomy recompute.
#[derive(Debug, Clone, Default)]
pub struct FrameData {
    /// Parallel to the catalog.
    pub stars: Vec<FrameStar>,
    pub bodies: Vec<FrameBody>,
    pub milky_way: Vec<MilkyWayPoint>,
}

/// Everything that changes while a view runs.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub observer: ObserverState,
    pub toggles: Toggles,
    pub projection: ProjectionState,
    pub viewport: Viewport,
    pub frame: FrameData,
    pub hover: Option<HoverTarget>,
    /// Host-selected constellation keys.
    pub selected: BTreeSet<String>,
    pub pulse: PulseScheduler,
    /// Pulse highlight for the current frame.
    pub highlight: Option<Highlight>,
}

impl SimulationState {
    pub fn new(config: &SkyConfig) -> Self {
        let mut projection = ProjectionState::new(config.blend_tau_ms);
        projection.set_mode(config.projection);
        projection.settle();

        Self {
            observer: ObserverState::new(config.time_offset_tau_ms),
            toggles: Toggles::from_config(config),
            projection,
            viewport: Viewport::default(),
            frame: FrameData::default(),
            hover: None,
            selected: BTreeSet::new(),
            pulse: PulseScheduler::new(PulseTiming::from_config(config)),
            highlight: None,
        }
    }
}
