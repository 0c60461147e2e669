//! Render seam between the cover and whatever draws it.

use std::sync::{Arc, Mutex, MutexGuard};

use endspace_core::OverlayFrame;

/// The surface the cover draws on.
///
/// Calls arrive in the order `lock_scroll`, any number of `render`, then a
/// single `teardown`.
pub trait OverlayHost: Send + 'static {
    /// Stop the page underneath from scrolling.
    fn lock_scroll(&mut self);

    /// Draw a frame. Only called when the percentage or phase changed.
    fn render(&mut self, frame: &OverlayFrame);

    /// Remove the overlay and restore scrolling.
    fn teardown(&mut self);
}

/// What a [`RecordingHost`] has seen.
#[derive(Debug, Clone, Default)]
pub struct Recording {
    /// Every rendered frame, in order
    pub frames: Vec<OverlayFrame>,
    /// Whether scrolling is currently locked
    pub scroll_locked: bool,
    /// Number of teardown calls
    pub teardowns: u32,
}

impl Recording {
    /// Rendered percentages, in order.
    pub fn percents(&self) -> Vec<u8> {
        self.frames.iter().map(|frame| frame.percent).collect()
    }

    /// Last rendered frame.
    pub fn last(&self) -> Option<&OverlayFrame> {
        self.frames.last()
    }
}

/// Host that records every call behind a shared handle.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingHost {
    /// Create an empty recording host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn recording(&self) -> Recording {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl OverlayHost for RecordingHost {
    fn lock_scroll(&mut self) {
        self.lock().scroll_locked = true;
    }

    fn render(&mut self, frame: &OverlayFrame) {
        self.lock().frames.push(frame.clone());
    }

    fn teardown(&mut self) {
        let mut recording = self.lock();
        recording.scroll_locked = false;
        recording.teardowns += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use endspace_core::{OverlayConfig, Phase};

    #[test]
    fn test_recording_host_shares_state_across_clones() {
        let host = RecordingHost::new();
        let mut driver_side = host.clone();

        driver_side.lock_scroll();
        driver_side.render(&OverlayFrame::new(&OverlayConfig::default(), Phase::Init, 0));
        assert!(host.recording().scroll_locked);
        assert_eq!(host.recording().percents(), vec![0]);

        driver_side.teardown();
        let recording = host.recording();
        assert!(!recording.scroll_locked);
        assert_eq!(recording.teardowns, 1);
    }
}
