//! Frame driver
//!
//! Turns display-refresh timestamps into clamped frame deltas. The host calls
//! [`FrameClock::tick`] from its vsync callback (or a ~16 ms timer); a stopped
//! clock swallows ticks so a late callback can't advance the simulation.

/// Per-frame delta source
#[derive(Debug, Clone)]
pub struct FrameClock {
    running: bool,
    last_ms: f64,
    max_dt_ms: f32,
}

impl FrameClock {
    pub fn new(max_dt_ms: f32) -> Self {
        Self {
            running: false,
            last_ms: 0.0,
            max_dt_ms,
        }
    }

    /// Begin issuing deltas measured from `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.running = true;
        self.last_ms = now_ms;
    }

    /// Halt ticking (idempotent)
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Delta since the previous tick in ms, clamped to `[0, max_dt_ms]`
    ///
    /// Returns `None` while stopped. Timestamps that go backwards yield 0.
    pub fn tick(&mut self, now_ms: f64) -> Option<f32> {
        if !self.running {
            return None;
        }
        let raw = (now_ms - self.last_ms) as f32;
        self.last_ms = now_ms;
        if !raw.is_finite() {
            return Some(0.0);
        }
        Some(raw.clamp(0.0, self.max_dt_ms))
    }
}
