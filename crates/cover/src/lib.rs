//! Loading cover runtime.
//!
//! Mounts the boot progress engine on tokio: one task owns the estimation
//! interval, the animation frames, the safety timer, the phase timers and the
//! resource observer, and tears all of them down together.

#![warn(missing_docs)]

pub mod flag;
pub mod source;
pub mod host;
pub mod cover;

pub use flag::{loading_flag, LoadingFlag, LoadingFlagReader};
pub use source::{ObserveError, ResourceFeed, ResourceSource, StaticDocument};
pub use host::{OverlayHost, Recording, RecordingHost};
pub use cover::{CoverError, CoverHandle, LoadingCover};
