//! Horizontal → screen mapping with an animated blend between two radii.
//!
//! The projection is an azimuthal-equidistant dome centred on the zenith.
//! Only the dome radius changes between modes, so anything whose
//! altitude/azimuth is already known can be re-projected cheaply every frame.

use glam::Vec2;

use crate::extensions::easing::{lerp, smoothing_alpha};

/// Dome radius factor for the "fill" look, applied to `max(width, height)`.
/// Overscaled on purpose: low-altitude objects leave the frame before the
/// true horizon is reached.
pub const FILL_RADIUS_FACTOR: f64 = 0.7;

/// Dome radius factor for the "accurate" look, applied to `min(width, height)`.
/// Fits the whole hemisphere on screen.
pub const ACCURATE_RADIUS_FACTOR: f64 = 0.48;

/// Blend steps smaller than this do not count as a change.
const BLEND_EPSILON: f64 = 1e-5;

/// Dome radius in pixels for a viewport and blend factor.
#[inline]
pub fn dome_radius(width: f32, height: f32, blend: f64) -> f64 {
    let (w, h) = (width as f64, height as f64);
    let fill = w.max(h) * FILL_RADIUS_FACTOR;
    let accurate = w.min(h) * ACCURATE_RADIUS_FACTOR;
    lerp(fill, accurate, blend)
}

/// Map altitude/azimuth (degrees) to a screen position.
///
/// Returns `None` below the horizon or for non-finite input; callers must
/// not draw those. Azimuth 90° (East) maps to +x.
pub fn horizontal_to_screen(altitude: f64, azimuth: f64, width: f32, height: f32, blend: f64) -> Option<Vec2> {
    if !altitude.is_finite() || !azimuth.is_finite() || altitude < 0.0 {
        return None;
    }

    let radius = dome_radius(width, height, blend);
    let r = radius * (1.0 - altitude / 90.0);
    let angle = (azimuth - 90.0).to_radians();

    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    Some(Vec2::new((cx + r * angle.cos()) as f32, (cy + r * angle.sin()) as f32))
}

/// The two screen-mapping modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    /// Overscaled dome that fills the viewport.
    #[default]
    Fill,
    /// Whole hemisphere fitted inside the viewport.
    Accurate,
}

impl ProjectionMode {
    /// Blend value this mode animates toward.
    pub fn target(self) -> f64 {
        match self {
            ProjectionMode::Fill => 0.0,
            ProjectionMode::Accurate => 1.0,
        }
    }

    /// Parse the lowercase name used in host config.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fill" => Some(ProjectionMode::Fill),
            "accurate" => Some(ProjectionMode::Accurate),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Fill => ProjectionMode::Accurate,
            ProjectionMode::Accurate => ProjectionMode::Fill,
        }
    }
}

/// Requested projection mode plus the animated blend factor.
///
/// Mode changes only retarget the blend; [`ProjectionState::step`] moves it.
#[derive(Debug, Clone)]
pub struct ProjectionState {
    mode: ProjectionMode,
    forced: Option<ProjectionMode>,
    blend: f64,
    tau_ms: f64,
}

impl ProjectionState {
    pub fn new(tau_ms: f64) -> Self {
        Self {
            mode: ProjectionMode::Fill,
            forced: None,
            blend: ProjectionMode::Fill.target(),
            tau_ms,
        }
    }

    /// Current blend factor in [0, 1].
    pub fn blend(&self) -> f64 {
        self.blend
    }

    /// The mode chosen by the user.
    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    /// The mode the blend is currently heading for.
    pub fn effective_mode(&self) -> ProjectionMode {
        self.forced.unwrap_or(self.mode)
    }

    pub fn set_mode(&mut self, mode: ProjectionMode) {
        self.mode = mode;
    }

    pub fn toggle(&mut self) {
        self.mode = self.effective_mode().toggled();
    }

    /// Override the user's mode from the host (e.g. scroll-driven).
    /// Releasing an active override returns the view to `Fill`.
    pub fn set_forced(&mut self, forced: Option<ProjectionMode>) {
        if self.forced.is_some() && forced.is_none() {
            self.mode = ProjectionMode::Fill;
        }
        self.forced = forced;
    }

    /// Advance the blend toward the effective mode by exponential smoothing.
    /// Returns `true` when the blend moved enough to require re-projection.
    pub fn step(&mut self, dt_ms: f64) -> bool {
        let target = self.effective_mode().target();
        let next = lerp(self.blend, target, smoothing_alpha(dt_ms, self.tau_ms));
        let moved = (next - self.blend).abs() > BLEND_EPSILON;
        self.blend = next;
        moved
    }

    /// Jump straight to the target. Used when animations are torn down.
    pub fn settle(&mut self) {
        self.blend = self.effective_mode().target();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zenith_maps_to_center() {
        for az in [0.0, 45.0, 90.0, 200.0, 359.9] {
            for blend in [0.0, 0.3, 1.0] {
                let p = horizontal_to_screen(90.0, az, 800.0, 600.0, blend).unwrap();
                assert!((p.x - 400.0).abs() < 1e-3 && (p.y - 300.0).abs() < 1e-3, "p = {p:?}");
            }
        }
    }

    #[test]
    fn east_maps_to_positive_x() {
        let p = horizontal_to_screen(45.0, 90.0, 800.0, 600.0, 1.0).unwrap();
        assert!(p.x > 400.0);
        assert!((p.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn below_horizon_is_not_projected() {
        assert!(horizontal_to_screen(-0.1, 10.0, 800.0, 600.0, 0.0).is_none());
        assert!(horizontal_to_screen(f64::NAN, 10.0, 800.0, 600.0, 0.0).is_none());
        assert!(horizontal_to_screen(10.0, f64::INFINITY, 800.0, 600.0, 0.0).is_none());
    }

    #[test]
    fn horizon_sits_on_dome_radius() {
        let p = horizontal_to_screen(0.0, 180.0, 1000.0, 500.0, 1.0).unwrap();
        // South points down (+y) at r = min(w, h) · 0.48 = 240
        assert!((p.x - 500.0).abs() < 1e-3);
        assert!((p.y - (250.0 + 240.0)).abs() < 1e-3, "p = {p:?}");
    }

    #[test]
    fn radius_endpoints() {
        assert!((dome_radius(1000.0, 500.0, 0.0) - 700.0).abs() < 1e-9);
        assert!((dome_radius(1000.0, 500.0, 1.0) - 240.0).abs() < 1e-9);
    }

    #[test]
    fn toggle_never_snaps_on_first_tick() {
        let mut state = ProjectionState::new(220.0);
        state.set_mode(ProjectionMode::Accurate);
        assert!(state.step(16.0));
        assert!(state.blend() > 0.0 && state.blend() < 1.0, "blend = {}", state.blend());
    }

    #[test]
    fn blend_approaches_monotonically_without_overshoot() {
        let mut state = ProjectionState::new(220.0);
        state.set_mode(ProjectionMode::Accurate);
        let (fill, accurate) = (dome_radius(800.0, 600.0, 0.0), dome_radius(800.0, 600.0, 1.0));
        let mut prev_blend = state.blend();
        let mut prev_radius = fill;
        for _ in 0..300 {
            state.step(16.0);
            let radius = dome_radius(800.0, 600.0, state.blend());
            assert!(state.blend() >= prev_blend && state.blend() <= 1.0);
            assert!(radius <= prev_radius && radius >= accurate);
            prev_blend = state.blend();
            prev_radius = radius;
        }
        assert!(state.blend() > 0.999);
    }

    #[test]
    fn settled_blend_reports_no_change() {
        let mut state = ProjectionState::new(220.0);
        assert!(!state.step(16.0));
    }

    #[test]
    fn releasing_forced_mode_returns_to_fill() {
        let mut state = ProjectionState::new(220.0);
        state.set_mode(ProjectionMode::Accurate);
        state.set_forced(Some(ProjectionMode::Accurate));
        assert_eq!(state.effective_mode(), ProjectionMode::Accurate);
        state.set_forced(None);
        assert_eq!(state.effective_mode(), ProjectionMode::Fill);
    }
}
