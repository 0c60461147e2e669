//! Phase model - the scripted stages of the overlay's exit sequence.

use serde::{Deserialize, Serialize};

/// A visual phase of the loading cover.
///
/// Phases are totally ordered and only ever move forward:
/// ```text
/// Init → Loading → Complete → Sweeping → Fadeout → Unmounted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Just mounted, before the loading text shows
    Init,
    /// Waiting for the displayed percentage to reach 100
    Loading,
    /// Progress finished, "ready" text visible
    Complete,
    /// Sweep overlay covering the screen
    Sweeping,
    /// Whole cover fading out
    Fadeout,
    /// Overlay removed; terminal
    Unmounted,
}

impl Phase {
    /// All phases in sequence order.
    pub const ALL: [Phase; 6] = [
        Phase::Init,
        Phase::Loading,
        Phase::Complete,
        Phase::Sweeping,
        Phase::Fadeout,
        Phase::Unmounted,
    ];

    /// The phase that follows this one, or `None` for the terminal phase.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Init => Some(Phase::Loading),
            Phase::Loading => Some(Phase::Complete),
            Phase::Complete => Some(Phase::Sweeping),
            Phase::Sweeping => Some(Phase::Fadeout),
            Phase::Fadeout => Some(Phase::Unmounted),
            Phase::Unmounted => None,
        }
    }

    /// Whether the overlay is still on screen in this phase.
    pub fn is_visible(self) -> bool {
        self != Phase::Unmounted
    }

    /// Whether this is the terminal phase.
    pub fn is_terminal(self) -> bool {
        self == Phase::Unmounted
    }

    /// Get string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::Loading => "loading",
            Phase::Complete => "complete",
            Phase::Sweeping => "sweeping",
            Phase::Fadeout => "fadeout",
            Phase::Unmounted => "unmounted",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of the phase sequence, timed relative to mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTransition {
    /// Phase being left
    pub from: Phase,

    /// Phase being entered
    pub to: Phase,

    /// Milliseconds since mount
    pub at_ms: u64,
}

impl PhaseTransition {
    /// Create a transition at the given offset from mount.
    pub fn new(from: Phase, to: Phase, at: std::time::Duration) -> Self {
        Self {
            from,
            to,
            at_ms: at.as_millis() as u64,
        }
    }
}
