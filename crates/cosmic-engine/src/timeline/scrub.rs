/// Fixed scroll distance mapped onto timeline progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollWindow {
    /// Scroll distance in pixels between progress 0 and progress 1.
    pub length: f32,
}

impl ScrollWindow {
    pub fn new(length: f32) -> Self {
        Self { length }
    }

    /// `clamp(offset / length, 0, 1)`. A non-positive window is all-or-nothing.
    pub fn progress(&self, offset: f32) -> f32 {
        if !offset.is_finite() {
            return 0.0;
        }
        if self.length <= 0.0 {
            return if offset > 0.0 { 1.0 } else { 0.0 };
        }
        (offset / self.length).clamp(0.0, 1.0)
    }
}

/// Low-pass filter between the scroll target and the applied play-head.
///
/// The play-head closes ~95% of any gap within `lag` seconds
/// (time constant `lag / 3`), so a burst of scroll deltas glides instead
/// of stepping. It never overshoots and snaps once within `SNAP`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrubState {
    target: f32,
    current: f32,
    lag: f32,
}

impl ScrubState {
    const SNAP: f32 = 1e-4;

    pub fn new(lag: f32) -> Self {
        Self {
            target: 0.0,
            current: 0.0,
            lag: lag.max(0.0),
        }
    }

    pub fn set_target(&mut self, progress: f32) {
        self.target = progress.clamp(0.0, 1.0);
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Move the play-head toward the target by one frame of `dt` seconds.
    /// Returns the new play-head.
    pub fn advance(&mut self, dt: f32) -> f32 {
        if self.lag <= 0.0 {
            self.current = self.target;
            return self.current;
        }
        let gap = self.target - self.current;
        if gap.abs() <= Self::SNAP {
            self.current = self.target;
        } else {
            let alpha = 1.0 - (-3.0 * dt.max(0.0) / self.lag).exp();
            self.current += gap * alpha;
        }
        self.current
    }
}
