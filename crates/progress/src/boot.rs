//! The boot sequence - counter, estimator, animator and sequencer together.

use std::time::Duration;

use endspace_core::{LoadSignal, Phase, PhaseTransition, ResourceSnapshot, TimingConfig};
use serde::Serialize;
use tracing::{debug, trace};

use crate::{PhaseDelays, PhaseSequencer, ProgressAnimator, ResourceCounter, TargetEstimator};

/// Progress numbers at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    /// Value the display is easing toward
    pub target: u8,
    /// Value on screen
    pub displayed: u8,
}

/// Time-injected state of one loading cover.
///
/// Every method takes the offset from mount instead of reading a clock, so a
/// driver decides when things happen and this type decides what happens.
#[derive(Debug, Clone)]
pub struct BootSequence {
    counter: ResourceCounter,
    estimator: TargetEstimator,
    animator: ProgressAnimator,
    sequencer: PhaseSequencer,
    safety_timeout: Duration,
    safety_fired: bool,
}

impl BootSequence {
    /// Build the sequence from the mount-time snapshot.
    pub fn new(snapshot: &ResourceSnapshot, timing: &TimingConfig) -> Self {
        Self {
            counter: ResourceCounter::from_snapshot(snapshot),
            estimator: TargetEstimator::new(timing.soft_cap),
            animator: ProgressAnimator::new(timing.easing, timing.snap_threshold),
            sequencer: PhaseSequencer::new(PhaseDelays::from(timing)),
            safety_timeout: timing.safety_timeout(),
            safety_fired: false,
        }
    }

    /// A resource finished loading.
    pub fn record_load(&mut self) {
        self.counter.record_load();
        trace!(signal = ?self.counter.signal(), "resource loaded");
    }

    /// Estimation tick.
    pub fn estimate(&mut self, still_loading: bool) -> u8 {
        let before = self.estimator.target();
        let target = self.estimator.tick(self.counter.signal(), still_loading);
        if target != before {
            debug!(target, still_loading, "target moved");
        }
        target
    }

    /// Animation frame. Returns any transition caused by reaching 100.
    pub fn animate(&mut self, now: Duration) -> Vec<PhaseTransition> {
        let displayed = self.animator.step(self.estimator.target());
        self.sequencer
            .observe_progress(displayed, now)
            .into_iter()
            .collect()
    }

    /// The safety timer expired. Forces 100 unless completion already latched.
    pub fn fire_safety_timer(&mut self, now: Duration) -> Vec<PhaseTransition> {
        if self.sequencer.is_latched() || self.safety_fired {
            return Vec::new();
        }
        self.safety_fired = true;
        self.animator.force_complete();
        self.sequencer
            .observe_progress(self.animator.displayed(), now)
            .into_iter()
            .collect()
    }

    /// Apply phase transitions due at `now`.
    pub fn advance(&mut self, now: Duration) -> Vec<PhaseTransition> {
        self.sequencer.advance(now)
    }

    /// When the next phase transition is due.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.sequencer.next_deadline()
    }

    /// When the safety timer fires, while it still matters.
    pub fn safety_deadline(&self) -> Option<Duration> {
        if self.sequencer.is_latched() || self.safety_fired {
            None
        } else {
            Some(self.safety_timeout)
        }
    }

    pub fn displayed(&self) -> u8 {
        self.animator.displayed()
    }

    pub fn target(&self) -> u8 {
        self.estimator.target()
    }

    pub fn phase(&self) -> Phase {
        self.sequencer.phase()
    }

    pub fn signal(&self) -> LoadSignal {
        self.counter.signal()
    }

    /// Target and displayed percentages.
    pub fn state(&self) -> ProgressState {
        ProgressState {
            target: self.target(),
            displayed: self.displayed(),
        }
    }

    /// Whether completion was forced by the safety timer.
    pub fn forced_by_safety_timer(&self) -> bool {
        self.safety_fired
    }

    /// Whether the exit sequence has started.
    pub fn is_latched(&self) -> bool {
        self.sequencer.is_latched()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: u64 = 50;
    const FRAME: u64 = 16;

    /// Replays the driver's scheduling at 1ms resolution: ticks before frames,
    /// then the safety timer, then phase deadlines.
    struct Clock {
        boot: BootSequence,
        now: u64,
        history: Vec<(u64, u8)>,
        transitions: Vec<PhaseTransition>,
    }

    impl Clock {
        fn new(snapshot: ResourceSnapshot) -> Self {
            Self {
                boot: BootSequence::new(&snapshot, &TimingConfig::default()),
                now: 0,
                history: Vec::new(),
                transitions: Vec::new(),
            }
        }

        fn run_until(&mut self, end: u64, still_loading: impl Fn(u64) -> bool, loads: &[u64]) {
            while self.now < end {
                self.now += 1;
                let now = Duration::from_millis(self.now);

                let due = loads.iter().filter(|&&at| at == self.now).count();
                for _ in 0..due {
                    self.boot.record_load();
                }
                if self.now % TICK == 0 {
                    self.boot.estimate(still_loading(self.now));
                }
                if self.now % FRAME == 0 {
                    let fired = self.boot.animate(now);
                    self.transitions.extend(fired);
                    self.history.push((self.now, self.boot.displayed()));
                }
                if self.boot.safety_deadline() == Some(now) {
                    let fired = self.boot.fire_safety_timer(now);
                    self.transitions.extend(fired);
                    self.history.push((self.now, self.boot.displayed()));
                }
                if self.boot.next_deadline() == Some(now) {
                    let fired = self.boot.advance(now);
                    self.transitions.extend(fired);
                }
            }
        }

        fn phases(&self) -> Vec<Phase> {
            std::iter::once(Phase::Init)
                .chain(self.transitions.iter().map(|t| t.to))
                .collect()
        }

        fn first_at(&self, percent: u8) -> Option<u64> {
            self.history
                .iter()
                .find(|(_, shown)| *shown >= percent)
                .map(|(at, _)| *at)
        }
    }

    fn assert_monotonic(history: &[(u64, u8)]) {
        for pair in history.windows(2) {
            assert!(
                pair[1].1 >= pair[0].1,
                "displayed regressed from {} to {} at {}ms",
                pair[0].1,
                pair[1].1,
                pair[1].0
            );
        }
    }

    #[test]
    fn test_target_waits_for_first_load_then_caps() {
        let mut boot = BootSequence::new(&ResourceSnapshot::empty(), &TimingConfig::default());
        assert_eq!(boot.signal(), LoadSignal::new(1, 0));
        assert_eq!(boot.estimate(true), 0);
        assert_eq!(boot.estimate(true), 0);

        boot.record_load();
        assert_eq!(boot.estimate(true), 95);
    }

    #[test]
    fn test_flag_clearing_mid_load_completes_once() {
        // Ten resources, four loaded by the time the flag clears at 1000ms.
        let snapshot = ResourceSnapshot {
            images: 10,
            complete_images: 0,
            scripts: 0,
            stylesheets: 0,
        };
        let mut clock = Clock::new(snapshot);
        let loads = [100, 200, 300, 400];
        clock.run_until(3_000, |now| now < 1_000, &loads);

        let before_flag = clock
            .history
            .iter()
            .filter(|(at, _)| *at < 1_000)
            .map(|(_, shown)| *shown)
            .max()
            .unwrap();
        assert!(before_flag <= 40);

        let reached = clock.first_at(100).unwrap();
        assert!(reached > 1_000 && reached < 2_000);
        assert_monotonic(&clock.history);
        assert_eq!(clock.phases(), Phase::ALL.to_vec());
        assert!(!clock.boot.forced_by_safety_timer());
    }

    #[test]
    fn test_safety_timer_forces_completion() {
        let mut clock = Clock::new(ResourceSnapshot::empty());
        clock.run_until(7_000, |_| true, &[]);

        assert_eq!(clock.first_at(100), Some(5_000));
        assert!(clock.boot.forced_by_safety_timer());
        assert_eq!(clock.phases(), Phase::ALL.to_vec());

        let unmounted = clock.transitions.last().unwrap();
        assert_eq!(unmounted.to, Phase::Unmounted);
        assert_eq!(unmounted.at_ms, 5_000 + 100 + 150 + 500 + 400);
    }

    #[test]
    fn test_stall_at_soft_cap_until_flag_clears() {
        let snapshot = ResourceSnapshot {
            images: 2,
            complete_images: 2,
            scripts: 0,
            stylesheets: 0,
        };
        let mut clock = Clock::new(snapshot);
        clock.run_until(3_000, |now| now < 4_000, &[]);

        assert_eq!(clock.boot.target(), 95);
        assert_eq!(clock.boot.displayed(), 95);
        assert_eq!(clock.boot.phase(), Phase::Loading);

        clock.run_until(6_000, |now| now < 4_000, &[]);
        assert!(!clock.boot.forced_by_safety_timer());
        assert_monotonic(&clock.history);
        assert_eq!(clock.phases(), Phase::ALL.to_vec());
    }

    #[test]
    fn test_safety_timer_noop_after_natural_completion() {
        let mut clock = Clock::new(ResourceSnapshot::empty());
        clock.run_until(2_000, |_| false, &[]);
        assert!(clock.boot.is_latched());
        assert_eq!(clock.boot.safety_deadline(), None);
        assert!(clock.boot.fire_safety_timer(Duration::from_millis(5_000)).is_empty());
        assert!(!clock.boot.forced_by_safety_timer());
    }

    #[test]
    fn test_random_load_patterns_stay_monotonic() {
        // Deterministic spread of load times and flag deadlines.
        for seed in 1u64..20 {
            let loads: Vec<u64> = (1..=seed * 3).map(|i| (i * 37 * seed) % 4_000 + 1).collect();
            let clear_at = 500 + seed * 311;
            let mut clock = Clock::new(ResourceSnapshot {
                images: (seed as u32) * 2,
                complete_images: seed as u32 / 2,
                scripts: 3,
                stylesheets: 1,
            });
            clock.run_until(8_000, |now| now < clear_at, &loads);

            assert_monotonic(&clock.history);
            assert!(clock.first_at(100).unwrap() <= 5_000);
            assert_eq!(clock.phases(), Phase::ALL.to_vec());
        }
    }

    #[test]
    fn test_state_serializes() {
        let boot = BootSequence::new(&ResourceSnapshot::empty(), &TimingConfig::default());
        let json = serde_json::to_value(boot.state()).unwrap();
        assert_eq!(json["target"], 0);
        assert_eq!(json["displayed"], 0);
    }
}
