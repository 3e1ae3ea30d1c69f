/// Variable-rate frame clock.
///
/// The render loop runs at whatever cadence the display gives it and may
/// skip or coalesce frames, so there is no fixed step here: each frame
/// reports its own delta and the clock accumulates wall time for throttle
/// windows and request deadlines.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Milliseconds since the session started.
    now_ms: f64,
    /// Delta of the most recent frame, in seconds.
    last_dt: f32,
    frames: u64,
}

impl FrameClock {
    /// Longest frame delta honoured; a tab returning from the background
    /// reports seconds of delta that should not be replayed at once.
    pub const MAX_FRAME_DT: f32 = 0.25;

    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame of `dt_ms` milliseconds.
    pub fn advance(&mut self, dt_ms: f64) {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        self.now_ms += dt_ms;
        self.last_dt = ((dt_ms / 1000.0) as f32).min(Self::MAX_FRAME_DT);
        self.frames += 1;
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Clamped delta of the last frame, in seconds.
    pub fn dt(&self) -> f32 {
        self.last_dt
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_wall_time() {
        let mut clock = FrameClock::new();
        clock.advance(16.0);
        clock.advance(17.0);
        assert_eq!(clock.now_ms(), 33.0);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn caps_frame_delta() {
        let mut clock = FrameClock::new();
        clock.advance(5000.0);
        assert_eq!(clock.dt(), FrameClock::MAX_FRAME_DT);
        // wall time is still tracked in full for throttle windows
        assert_eq!(clock.now_ms(), 5000.0);
    }

    #[test]
    fn ignores_negative_and_nan() {
        let mut clock = FrameClock::new();
        clock.advance(-3.0);
        clock.advance(f64::NAN);
        assert_eq!(clock.now_ms(), 0.0);
        assert_eq!(clock.frames(), 2);
    }
}
