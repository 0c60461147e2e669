//! The external "still loading" flag.
//!
//! The host owns a [`LoadingFlag`] and hands readers to whoever needs them.
//! The flag starts set and can only be cleared.

use tokio::sync::watch;

/// Create a loading flag in the set state.
pub fn loading_flag() -> (LoadingFlag, LoadingFlagReader) {
    let (tx, rx) = watch::channel(true);
    (LoadingFlag { tx }, LoadingFlagReader { rx })
}

/// Host side of the flag.
#[derive(Debug)]
pub struct LoadingFlag {
    tx: watch::Sender<bool>,
}

impl LoadingFlag {
    /// Mark the page as loaded. Idempotent.
    pub fn finish(&self) {
        self.tx.send_if_modified(|loading| std::mem::replace(loading, false));
    }

    /// Whether the page is still loading.
    pub fn is_loading(&self) -> bool {
        *self.tx.borrow()
    }

    /// Another reader for the same flag.
    pub fn subscribe(&self) -> LoadingFlagReader {
        LoadingFlagReader {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read side of the flag.
///
/// Keeps reporting the last value if the host drops its [`LoadingFlag`].
#[derive(Debug, Clone)]
pub struct LoadingFlagReader {
    rx: watch::Receiver<bool>,
}

impl LoadingFlagReader {
    /// A reader that never reports loading.
    pub fn finished() -> Self {
        let (_, rx) = watch::channel(false);
        Self { rx }
    }

    /// Whether the page is still loading.
    pub fn is_loading(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the flag clears. Returns immediately if it already has;
    /// never returns if the host drops the flag while still loading.
    pub async fn cleared(&mut self) {
        if self.rx.wait_for(|loading| !*loading).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_flag_starts_loading() {
        let (flag, reader) = loading_flag();
        assert!(flag.is_loading());
        assert!(reader.is_loading());
    }

    #[test]
    fn test_finish_is_seen_by_all_readers() {
        let (flag, reader) = loading_flag();
        let other = flag.subscribe();
        flag.finish();
        flag.finish();
        assert!(!reader.is_loading());
        assert!(!other.is_loading());
    }

    #[test]
    fn test_dropped_flag_keeps_last_value() {
        let (flag, reader) = loading_flag();
        drop(flag);
        assert!(reader.is_loading());
        assert!(!LoadingFlagReader::finished().is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleared_waits_for_finish() {
        let (flag, mut reader) = loading_flag();
        let waiter = tokio::spawn(async move {
            reader.cleared().await;
            tokio::time::Instant::now()
        });

        let start = tokio::time::Instant::now();
        tokio::time::sleep(Duration::from_millis(300)).await;
        flag.finish();

        let cleared_at = waiter.await.unwrap();
        assert!(cleared_at - start >= Duration::from_millis(300));
    }
}
