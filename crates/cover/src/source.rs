//! Resource observation seam.

use endspace_core::{ResourceEntry, ResourceSnapshot};
use tokio::sync::mpsc;

/// Why resource observation could not be set up.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ObserveError {
    /// The environment has no resource-timing observer
    #[error("resource observation unsupported")]
    Unsupported,

    /// The observer exists but refused to start
    #[error("resource observer setup failed: {0}")]
    Setup(String),
}

/// Where the cover learns about the document's resources.
pub trait ResourceSource: Send + 'static {
    /// Resources present at mount.
    fn snapshot(&self) -> ResourceSnapshot;

    /// Start observing completions. Called at most once per mount.
    fn observe(&mut self) -> Result<mpsc::UnboundedReceiver<ResourceEntry>, ObserveError>;
}

/// A fixed snapshot plus an optional completion feed.
#[derive(Debug)]
pub struct StaticDocument {
    snapshot: ResourceSnapshot,
    completions: Option<mpsc::UnboundedReceiver<ResourceEntry>>,
}

impl StaticDocument {
    /// A document without resource observation.
    pub fn new(snapshot: ResourceSnapshot) -> Self {
        Self {
            snapshot,
            completions: None,
        }
    }

    /// A document whose completions are pushed through the returned feed.
    pub fn with_observer(snapshot: ResourceSnapshot) -> (Self, ResourceFeed) {
        let (tx, rx) = mpsc::unbounded_channel();
        let document = Self {
            snapshot,
            completions: Some(rx),
        };
        (document, ResourceFeed { tx })
    }
}

impl ResourceSource for StaticDocument {
    fn snapshot(&self) -> ResourceSnapshot {
        self.snapshot
    }

    fn observe(&mut self) -> Result<mpsc::UnboundedReceiver<ResourceEntry>, ObserveError> {
        self.completions.take().ok_or(ObserveError::Unsupported)
    }
}

/// Sender side of a [`StaticDocument`] observer.
#[derive(Debug, Clone)]
pub struct ResourceFeed {
    tx: mpsc::UnboundedSender<ResourceEntry>,
}

impl ResourceFeed {
    /// Report a completed resource. Returns false once the cover is gone.
    pub fn loaded(&self, entry: ResourceEntry) -> bool {
        self.tx.send(entry).is_ok()
    }

    /// Whether the observing cover has been torn down.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
