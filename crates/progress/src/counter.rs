//! Resource counting - ground truth for the target estimator.

use endspace_core::{LoadSignal, ResourceSnapshot};

/// Counts discovered and loaded resources.
///
/// The total is fixed at mount; completions keep counting past it when the
/// page discovers more resources later. That overshoot is accepted rather than
/// corrected.
#[derive(Debug, Clone)]
pub struct ResourceCounter {
    total: u32,
    loaded: u32,
}

impl ResourceCounter {
    /// Seed the counter from the mount-time snapshot.
    pub fn from_snapshot(snapshot: &ResourceSnapshot) -> Self {
        Self {
            total: snapshot.discovered().max(1),
            loaded: snapshot.complete_images.min(snapshot.images),
        }
    }

    /// Record one resource completion.
    pub fn record_load(&mut self) {
        self.loaded = self.loaded.saturating_add(1);
    }

    /// Current counters.
    pub fn signal(&self) -> LoadSignal {
        LoadSignal::new(self.total, self.loaded)
    }

    /// Loaded over total, floored. May exceed 100.
    pub fn ratio_percent(&self) -> u32 {
        self.signal().ratio_percent()
    }
}

impl Default for ResourceCounter {
    fn default() -> Self {
        Self::from_snapshot(&ResourceSnapshot::empty())
    }
}
