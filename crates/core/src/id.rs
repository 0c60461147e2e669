//! Unique identifiers for overlay mounts.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for one mount of the loading cover.
///
/// Every mount gets a fresh id; it tags the tracing span and the final report
/// so interleaved logs from a remount can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MountId(Ulid);

impl MountId {
    /// Generate a new MountId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for MountId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for MountId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}
