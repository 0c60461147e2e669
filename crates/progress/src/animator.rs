//! Progress animation - exponential easing toward the target.

/// Eases a continuous value toward the target once per frame.
///
/// The displayed percentage is the floor of that value and never decreases.
#[derive(Debug, Clone)]
pub struct ProgressAnimator {
    internal: f64,
    displayed: u8,
    easing: f64,
    snap_threshold: f64,
}

impl ProgressAnimator {
    /// Create an animator covering `easing` of the remaining gap per frame.
    pub fn new(easing: f64, snap_threshold: f64) -> Self {
        Self {
            internal: 0.0,
            displayed: 0,
            easing: easing.clamp(f64::EPSILON, 1.0),
            snap_threshold: snap_threshold.max(f64::EPSILON),
        }
    }

    /// Advance one frame toward `target` and return the displayed percentage.
    pub fn step(&mut self, target: u8) -> u8 {
        let target = f64::from(target.min(100));

        if self.internal < target {
            self.internal += (target - self.internal) * self.easing;
            if target - self.internal < self.snap_threshold {
                self.internal = target;
            }
            let floored = self.internal.floor().clamp(0.0, 100.0) as u8;
            self.displayed = self.displayed.max(floored);
        }

        self.displayed
    }

    /// Jump straight to 100.
    pub fn force_complete(&mut self) {
        self.internal = 100.0;
        self.displayed = 100;
    }

    /// Current displayed percentage.
    pub fn displayed(&self) -> u8 {
        self.displayed
    }

    /// Whether the displayed percentage has reached 100.
    pub fn is_complete(&self) -> bool {
        self.displayed >= 100
    }
}

impl Default for ProgressAnimator {
    fn default() -> Self {
        Self::new(0.1, 0.5)
    }
}
