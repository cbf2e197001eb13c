//! Animated return to the detected location and the present time, plus the
//! smoothing applied to time-offset changes.

use crate::api::types::GeoLocation;
use crate::extensions::easing::{approach, ease, Easing};

/// Values closer than this are considered equal.
const SETTLE_EPSILON: f64 = 1e-6;

/// Observer parameters at one point of a reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResetFrame {
    pub location: GeoLocation,
    pub time_offset_hours: f64,
    /// The animation has reached its target.
    pub done: bool,
}

/// Cubic in-out ease of (lat, lon, offset) toward (target, 0).
#[derive(Debug, Clone)]
pub struct ResetAnimation {
    from: GeoLocation,
    from_offset: f64,
    to: GeoLocation,
    duration_ms: f64,
    start_ms: Option<f64>,
}

impl ResetAnimation {
    /// `None` when already at the target: the caller should snap instead.
    pub fn start(from: GeoLocation, from_offset: f64, to: GeoLocation, duration_ms: f64) -> Option<Self> {
        let at_target = (from.latitude - to.latitude).abs() < SETTLE_EPSILON
            && (from.longitude - to.longitude).abs() < SETTLE_EPSILON
            && from_offset.abs() < SETTLE_EPSILON;
        if at_target {
            return None;
        }
        Some(Self {
            from,
            from_offset,
            to,
            duration_ms,
            start_ms: None,
        })
    }

    /// Sample at `now_ms`. The clock starts on the first sample.
    pub fn sample(&mut self, now_ms: f64) -> ResetFrame {
        let start = *self.start_ms.get_or_insert(now_ms);
        let p = if self.duration_ms > 0.0 {
            ((now_ms - start) / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };
        if p >= 1.0 {
            return ResetFrame {
                location: self.to,
                time_offset_hours: 0.0,
                done: true,
            };
        }

        ResetFrame {
            location: GeoLocation {
                latitude: ease(self.from.latitude, self.to.latitude, p, Easing::CubicInOut),
                longitude: ease(self.from.longitude, self.to.longitude, p, Easing::CubicInOut),
            },
            time_offset_hours: ease(self.from_offset, 0.0, p, Easing::CubicInOut),
            done: false,
        }
    }
}

/// Exponential approach of the time offset toward the user's target.
#[derive(Debug, Clone)]
pub struct TimeOffsetEasing {
    current: f64,
    target: f64,
    tau_ms: f64,
}

impl TimeOffsetEasing {
    /// Offsets closer than this snap onto the target (hours).
    pub const SNAP: f64 = 0.001;

    pub fn new(tau_ms: f64) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            tau_ms,
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn set_target(&mut self, hours: f64) {
        if hours.is_finite() {
            self.target = hours;
        }
    }

    /// Set both current and target, skipping the animation.
    pub fn jump(&mut self, hours: f64) {
        if hours.is_finite() {
            self.current = hours;
            self.target = hours;
        }
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Advance by `dt_ms`. Returns `true` when the offset changed.
    pub fn step(&mut self, dt_ms: f64) -> bool {
        if self.is_settled() {
            return false;
        }
        let next = approach(self.current, self.target, dt_ms, self.tau_ms);
        self.current = if (self.target - next).abs() < Self::SNAP { self.target } else { next };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_at_target_is_immediate() {
        let here = GeoLocation::new(40.0, -74.0);
        assert!(ResetAnimation::start(here, 0.0, here, 1200.0).is_none());
        assert!(ResetAnimation::start(here, 2.0, here, 1200.0).is_some());
    }

    #[test]
    fn reset_eases_to_target() {
        let from = GeoLocation::new(-30.0, 100.0);
        let to = GeoLocation::new(40.0, -74.0);
        let mut anim = ResetAnimation::start(from, 6.0, to, 1200.0).unwrap();

        let first = anim.sample(1000.0);
        assert_eq!(first.location, from);
        assert_eq!(first.time_offset_hours, 6.0);
        assert!(!first.done);

        let mid = anim.sample(1600.0);
        assert!((mid.location.latitude - 5.0).abs() < 1e-9);
        assert!((mid.time_offset_hours - 3.0).abs() < 1e-9);

        // Cubic in-out is slow at the start.
        let early = anim.sample(1120.0);
        assert!(early.location.latitude - from.latitude < 0.1 * 70.0);

        let last = anim.sample(2200.0);
        assert!(last.done);
        assert_eq!(last.location, to);
        assert_eq!(last.time_offset_hours, 0.0);
    }

    #[test]
    fn time_offset_approaches_and_snaps() {
        let mut offset = TimeOffsetEasing::new(140.0);
        offset.set_target(5.0);
        let mut prev = 0.0;
        let mut frames = 0;
        while offset.step(16.0) {
            assert!(offset.current() > prev || offset.current() == 5.0);
            assert!(offset.current() <= 5.0);
            prev = offset.current();
            frames += 1;
            assert!(frames < 200, "never settled");
        }
        assert_eq!(offset.current(), 5.0);
        assert!(!offset.step(16.0));
    }

    #[test]
    fn jump_skips_animation() {
        let mut offset = TimeOffsetEasing::new(140.0);
        offset.jump(-3.0);
        assert!(offset.is_settled());
        offset.set_target(f64::NAN);
        assert_eq!(offset.target(), -3.0);
    }
}
