//! Endspace loading cover data models.
//!
//! This crate defines the plain data shared by the progress engine and the
//! cover driver: phases, load signals, configuration and the render model.

#![warn(missing_docs)]

// Identity
mod id;

// Sequence and signals
mod phase;
mod signal;

// Display
mod config;
mod frame;
mod report;

// Re-exports
pub use id::MountId;
pub use phase::{Phase, PhaseTransition};
pub use signal::{LoadSignal, ResourceEntry, ResourceKind, ResourceSnapshot};
pub use config::{ConfigError, OverlayConfig, PhaseLabels, TimingConfig, DEFAULT_SITE_NAME};
pub use frame::OverlayFrame;
pub use report::BootReport;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
