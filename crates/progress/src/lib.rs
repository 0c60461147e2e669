//! Boot progress engine.
//!
//! Resource counting, target estimation, progress easing and the phase
//! sequence of the loading cover. Everything here is pure state driven by the
//! caller's clock.

#![warn(missing_docs)]

pub mod counter;
pub mod estimator;
pub mod animator;
pub mod sequencer;
pub mod boot;

pub use counter::ResourceCounter;
pub use estimator::TargetEstimator;
pub use animator::ProgressAnimator;
pub use sequencer::{PhaseDelays, PhaseSequencer};
pub use boot::{BootSequence, ProgressState};
