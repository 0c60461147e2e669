//! Target estimation.

use endspace_core::LoadSignal;

/// Derives the target percentage from the load ratio and the loading flag.
///
/// While the flag is set the target follows the ratio but never passes the
/// soft cap. Once the flag clears the target is 100 and stays there.
#[derive(Debug, Clone)]
pub struct TargetEstimator {
    target: u8,
    soft_cap: u8,
    released: bool,
}

impl TargetEstimator {
    /// Create an estimator with the given soft cap.
    pub fn new(soft_cap: u8) -> Self {
        Self {
            target: 0,
            soft_cap: soft_cap.min(100),
            released: false,
        }
    }

    /// Run one estimation tick and return the new target.
    pub fn tick(&mut self, signal: LoadSignal, still_loading: bool) -> u8 {
        if !still_loading {
            self.released = true;
        }

        if self.released {
            self.target = 100;
        } else {
            let real = signal.ratio_percent().min(100) as u8;
            self.target = self.target.max(real.min(self.soft_cap));
        }

        self.target
    }

    /// Current target.
    pub fn target(&self) -> u8 {
        self.target
    }

    /// Whether the loading flag has been seen cleared.
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Default for TargetEstimator {
    fn default() -> Self {
        Self::new(95)
    }
}
