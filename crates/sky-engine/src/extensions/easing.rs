// extensions/easing.rs
//
// Easing curves and exponential smoothing for view animations.

/// Easing curve applied to a normalized progress value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Cubic with slow start and end. Used by the view reset.
    CubicInOut,
    /// `u²(3 − 2u)`, used by the constellation pulse envelope.
    Smoothstep,
}

impl Easing {
    /// Map progress `t` (clamped to [0, 1]) through the curve.
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut if t < 0.5 => 4.0 * t * t * t,
            Easing::CubicInOut => 1.0 - (2.0 - 2.0 * t).powi(3) / 2.0,
            Easing::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f64, b: f64, t: f64, easing: Easing) -> f64 {
    lerp(a, b, easing.apply(t))
}

/// Fraction of the remaining distance covered by exponential smoothing
/// over `dt_ms` with time constant `tau_ms`.
#[inline]
pub fn smoothing_alpha(dt_ms: f64, tau_ms: f64) -> f64 {
    if tau_ms <= 0.0 {
        return 1.0;
    }
    1.0 - (-dt_ms.max(0.0) / tau_ms).exp()
}

/// Move `current` toward `target` by exponential smoothing.
/// Never overshoots: the result always lies between `current` and `target`.
#[inline]
pub fn approach(current: f64, target: f64, dt_ms: f64, tau_ms: f64) -> f64 {
    lerp(current, target, smoothing_alpha(dt_ms, tau_ms))
}
