//! Boot report - summary of one mount, produced when the cover unmounts.

use serde::{Deserialize, Serialize};

use crate::id::MountId;
use crate::phase::{Phase, PhaseTransition};
use crate::Time;

/// Record of a finished loading cover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootReport {
    /// Which mount this was
    pub mount_id: MountId,

    /// Wall-clock time of mount
    pub started_at: Time,

    /// Every phase change, in order
    pub transitions: Vec<PhaseTransition>,

    /// Number of renders handed to the host
    pub frames_rendered: u64,

    /// Resource completions delivered by the observer
    pub loads_observed: u32,

    /// Displayed percentage at the end
    pub final_percent: u8,

    /// Whether the safety timer had to force completion
    pub forced_by_safety_timer: bool,

    /// Whether resource observation was available
    pub observer_available: bool,
}

impl BootReport {
    /// Phases visited, starting with `Init`.
    pub fn phases(&self) -> Vec<Phase> {
        std::iter::once(Phase::Init)
            .chain(self.transitions.iter().map(|t| t.to))
            .collect()
    }

    /// When the given phase was entered, in milliseconds since mount.
    pub fn entered_at(&self, phase: Phase) -> Option<u64> {
        if phase == Phase::Init {
            return Some(0);
        }
        self.transitions
            .iter()
            .find(|t| t.to == phase)
            .map(|t| t.at_ms)
    }
}
