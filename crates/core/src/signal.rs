//! Resource signals - what the document reports about loading.

use serde::{Deserialize, Serialize};

/// Resources found in the document at mount time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    /// Image elements
    pub images: u32,

    /// Images that already report themselves complete
    pub complete_images: u32,

    /// Script elements
    pub scripts: u32,

    /// Stylesheet links
    pub stylesheets: u32,
}

impl ResourceSnapshot {
    /// An empty document.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Total discovered resources (may be zero).
    pub fn discovered(&self) -> u32 {
        self.images
            .saturating_add(self.scripts)
            .saturating_add(self.stylesheets)
    }
}

/// Ground-truth load counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSignal {
    /// Discovered resources, never zero
    pub total: u32,

    /// Completed resources; may exceed `total`
    pub loaded: u32,
}

impl LoadSignal {
    /// Create a signal, flooring `total` at 1.
    pub fn new(total: u32, loaded: u32) -> Self {
        Self {
            total: total.max(1),
            loaded,
        }
    }

    /// Loaded over total as a floored percentage. Not capped at 100.
    pub fn ratio_percent(&self) -> u32 {
        let percent = u64::from(self.loaded) * 100 / u64::from(self.total.max(1));
        u32::try_from(percent).unwrap_or(u32::MAX)
    }
}

impl Default for LoadSignal {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

/// Kind of resource reported by the resource-timing observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Script,
    Stylesheet,
    Font,
    Fetch,
    Other,
}

/// A single resource completion delivered after mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Resource URL or name
    pub name: String,

    /// What initiated the load
    pub kind: ResourceKind,
}

impl ResourceEntry {
    /// Create a new entry.
    pub fn new(name: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_total_floors_to_one() {
        let signal = LoadSignal::new(0, 0);
        assert_eq!(signal.total, 1);
        assert_eq!(signal.ratio_percent(), 0);
    }

    #[test]
    fn test_ratio_is_floored() {
        assert_eq!(LoadSignal::new(3, 1).ratio_percent(), 33);
        assert_eq!(LoadSignal::new(3, 2).ratio_percent(), 66);
    }

    #[test]
    fn test_ratio_can_exceed_hundred() {
        assert_eq!(LoadSignal::new(2, 5).ratio_percent(), 250);
    }

    #[test]
    fn test_snapshot_discovered_sums_kinds() {
        let snapshot = ResourceSnapshot {
            images: 4,
            complete_images: 2,
            scripts: 3,
            stylesheets: 1,
        };
        assert_eq!(snapshot.discovered(), 8);
        assert_eq!(ResourceSnapshot::empty().discovered(), 0);
    }
}
