//! Phase sequencing - the timed exit sequence behind a completion latch.
//!
//! The sequencer is deadline-driven: the caller reports progress and polls
//! with the current offset from mount, and the sequencer answers with the
//! transitions that became due. It owns no timers itself.

use std::time::Duration;

use endspace_core::{Phase, PhaseTransition, TimingConfig};

/// Delays between the phases of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDelays {
    /// Init → Loading
    pub init: Duration,
    /// Latch → Complete
    pub complete: Duration,
    /// Complete → Sweeping
    pub sweep: Duration,
    /// Sweeping → Fadeout
    pub sweeping: Duration,
    /// Fadeout → Unmounted
    pub fadeout: Duration,
}

impl From<&TimingConfig> for PhaseDelays {
    fn from(timing: &TimingConfig) -> Self {
        Self {
            init: timing.init_delay(),
            complete: timing.complete_delay(),
            sweep: timing.sweep_delay(),
            sweeping: timing.sweep_duration(),
            fadeout: timing.fadeout_duration(),
        }
    }
}

impl Default for PhaseDelays {
    fn default() -> Self {
        Self::from(&TimingConfig::default())
    }
}

/// Drives `Init → … → Unmounted` exactly once.
#[derive(Debug, Clone)]
pub struct PhaseSequencer {
    phase: Phase,
    latched: bool,
    pending: Option<(Phase, Duration)>,
    delays: PhaseDelays,
}

impl PhaseSequencer {
    /// Start in `Init` at mount, with `Loading` due after the init delay.
    pub fn new(delays: PhaseDelays) -> Self {
        Self {
            phase: Phase::Init,
            latched: false,
            pending: Some((Phase::Loading, delays.init)),
            delays,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the completion latch has fired.
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// When the next scheduled transition is due.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.map(|(_, at)| at)
    }

    /// Report the displayed percentage.
    ///
    /// The first report of 100 sets the latch and schedules `Complete`. If
    /// that happens during `Init`, `Loading` is entered immediately so the
    /// sequence never skips a phase. Every later report is ignored.
    pub fn observe_progress(&mut self, displayed: u8, now: Duration) -> Option<PhaseTransition> {
        if self.latched || displayed < 100 {
            return None;
        }
        self.latched = true;

        let skipped = if self.phase == Phase::Init {
            Some(self.enter(Phase::Loading, now))
        } else {
            None
        };
        self.pending = Some((Phase::Complete, now + self.delays.complete));
        skipped
    }

    /// Apply every transition due at or before `now`.
    pub fn advance(&mut self, now: Duration) -> Vec<PhaseTransition> {
        let mut fired = Vec::new();

        while let Some((next, due)) = self.pending {
            if due > now {
                break;
            }
            fired.push(self.enter(next, due));
            self.pending = self.schedule_after(next, due);
        }

        fired
    }

    fn enter(&mut self, next: Phase, at: Duration) -> PhaseTransition {
        let transition = PhaseTransition::new(self.phase, next, at);
        self.phase = next;
        transition
    }

    fn schedule_after(&self, entered: Phase, at: Duration) -> Option<(Phase, Duration)> {
        match entered {
            // Loading waits on the latch, not on a timer.
            Phase::Loading if !self.latched => None,
            Phase::Loading => Some((Phase::Complete, at + self.delays.complete)),
            Phase::Complete => Some((Phase::Sweeping, at + self.delays.sweep)),
            Phase::Sweeping => Some((Phase::Fadeout, at + self.delays.sweeping)),
            Phase::Fadeout => Some((Phase::Unmounted, at + self.delays.fadeout)),
            Phase::Init | Phase::Unmounted => None,
        }
    }
}

impl Default for PhaseSequencer {
    fn default() -> Self {
        Self::new(PhaseDelays::default())
    }
}
