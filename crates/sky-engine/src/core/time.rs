/// Frame-delta clock.
/// Turns host timestamps into a capped per-frame delta for animation smoothing.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Timestamp of the previous frame, if any.
    last_ms: Option<f64>,
    /// Upper bound on a single frame delta.
    max_dt_ms: f64,
}

impl FrameClock {
    pub fn new(max_dt_ms: f64) -> Self {
        Self {
            last_ms: None,
            max_dt_ms,
        }
    }

    /// Record a frame at `now_ms`. Returns the delta since the previous
    /// frame, clamped to [0, max]. The first frame has a zero delta.
    pub fn advance(&mut self, now_ms: f64) -> f64 {
        let dt = match self.last_ms {
            Some(last) if now_ms.is_finite() => (now_ms - last).clamp(0.0, self.max_dt_ms),
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.last_ms = Some(now_ms);
        }
        dt
    }
}

/// Low-frequency recompute scheduler.
/// Due when the simulated clock moved by at least `interval_ms` in either
/// direction since the last recompute, or when explicitly invalidated.
#[derive(Debug, Clone)]
pub struct RecomputeTimer {
    interval_ms: f64,
    last_sim_ms: Option<f64>,
    dirty: bool,
}

impl RecomputeTimer {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_sim_ms: None,
            dirty: true,
        }
    }

    /// Force the next check to report due.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Whether a recompute should run at simulated time `sim_ms`.
    pub fn is_due(&self, sim_ms: f64) -> bool {
        if self.dirty {
            return true;
        }
        match self.last_sim_ms {
            Some(last) => (sim_ms - last).abs() >= self.interval_ms,
            None => true,
        }
    }

    /// Record that a recompute ran at `sim_ms`.
    pub fn mark_done(&mut self, sim_ms: f64) {
        self.last_sim_ms = Some(sim_ms);
        self.dirty = false;
    }
}
