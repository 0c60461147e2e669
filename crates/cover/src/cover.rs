//! The loading cover - one task driving the boot sequence against a host.
//!
//! Mounting spawns a single task that owns every timer, the resource observer
//! and the host. Unmounting aborts that task, which drops all of them in one
//! place; the host's teardown runs from the same drop.

use endspace_core::{
    BootReport, ConfigError, MountId, OverlayConfig, OverlayFrame, Phase, ResourceEntry,
};
use endspace_progress::BootSequence;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, info_span, trace, warn, Instrument};

use crate::flag::LoadingFlagReader;
use crate::host::OverlayHost;
use crate::source::ResourceSource;

/// Errors from mounting or awaiting a cover.
#[derive(Debug, thiserror::Error)]
pub enum CoverError {
    /// Configuration rejected at mount
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The cover was unmounted before its sequence finished
    #[error("cover was unmounted before finishing")]
    Unmounted,

    /// The cover task panicked
    #[error("cover task panicked: {0}")]
    Panicked(String),
}

/// A loading cover ready to mount.
pub struct LoadingCover<H, S> {
    config: OverlayConfig,
    host: H,
    source: S,
    flag: LoadingFlagReader,
}

impl<H: OverlayHost, S: ResourceSource> LoadingCover<H, S> {
    /// Create a cover.
    pub fn new(config: OverlayConfig, host: H, source: S, flag: LoadingFlagReader) -> Self {
        Self {
            config,
            host,
            source,
            flag,
        }
    }

    /// Validate the configuration and start the cover on the current runtime.
    pub fn mount(self) -> Result<CoverHandle, CoverError> {
        self.config.timing.validate()?;

        let mount_id = MountId::new();
        let span = info_span!("loading_cover", mount_id = %mount_id);
        let task = tokio::spawn(
            run(mount_id, self.config, self.host, self.source, self.flag).instrument(span),
        );

        Ok(CoverHandle {
            mount_id,
            task: Some(task),
        })
    }
}

/// Handle to a mounted cover. Dropping it unmounts the cover.
#[derive(Debug)]
pub struct CoverHandle {
    mount_id: MountId,
    task: Option<JoinHandle<BootReport>>,
}

impl CoverHandle {
    /// Id of this mount.
    pub fn mount_id(&self) -> MountId {
        self.mount_id
    }

    /// Whether the cover task has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// Unmount now, cancelling every pending timer and the observer.
    pub fn unmount(mut self) {
        self.abort();
    }

    /// Wait for the sequence to reach `Unmounted`.
    pub async fn finished(&mut self) -> Result<BootReport, CoverError> {
        let Some(task) = self.task.as_mut() else {
            return Err(CoverError::Unmounted);
        };

        let result = task.await;
        self.task = None;

        match result {
            Ok(report) => Ok(report),
            Err(err) if err.is_cancelled() => Err(CoverError::Unmounted),
            Err(err) => Err(CoverError::Panicked(err.to_string())),
        }
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            debug!(mount_id = %self.mount_id, "unmounting loading cover");
            task.abort();
        }
    }
}

impl Drop for CoverHandle {
    fn drop(&mut self) {
        self.abort();
    }
}

/// The host plus render bookkeeping. Tears the host down when dropped.
struct Surface<H: OverlayHost> {
    host: H,
    config: OverlayConfig,
    last: Option<(Phase, u8)>,
    frames_rendered: u64,
}

impl<H: OverlayHost> Surface<H> {
    fn attach(mut host: H, config: OverlayConfig) -> Self {
        host.lock_scroll();
        Self {
            host,
            config,
            last: None,
            frames_rendered: 0,
        }
    }

    fn render(&mut self, phase: Phase, percent: u8) {
        if !phase.is_visible() || self.last == Some((phase, percent)) {
            return;
        }
        self.last = Some((phase, percent));
        self.frames_rendered += 1;
        self.host.render(&OverlayFrame::new(&self.config, phase, percent));
    }
}

impl<H: OverlayHost> Drop for Surface<H> {
    fn drop(&mut self) {
        self.host.teardown();
        debug!(frames = self.frames_rendered, "overlay torn down");
    }
}

async fn run<H, S>(
    mount_id: MountId,
    config: OverlayConfig,
    host: H,
    mut source: S,
    flag: LoadingFlagReader,
) -> BootReport
where
    H: OverlayHost,
    S: ResourceSource,
{
    let started_at = chrono::Utc::now();
    let mounted = Instant::now();
    let timing = config.timing.clone();

    let mut surface = Surface::attach(host, config);
    let mut boot = BootSequence::new(&source.snapshot(), &timing);

    let mut observer = match source.observe() {
        Ok(rx) => Some(rx),
        Err(err) => {
            debug!(%err, "continuing with the mount-time snapshot only");
            None
        }
    };
    let observer_available = observer.is_some();
    let mut loads_observed = 0u32;
    let mut transitions = Vec::new();

    let mut tick = time::interval_at(mounted + timing.tick_interval(), timing.tick_interval());
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frame = time::interval_at(mounted + timing.frame_interval(), timing.frame_interval());
    frame.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(signal = ?boot.signal(), observer_available, "loading cover mounted");
    surface.render(boot.phase(), boot.displayed());

    while !boot.phase().is_terminal() {
        let safety_at = boot.safety_deadline().map(|after| mounted + after);
        let phase_at = boot.next_deadline().map(|after| mounted + after);

        // Branch order matters: a tick's target is visible to the frame after it.
        let fired = tokio::select! {
            biased;
            _ = tick.tick() => {
                boot.estimate(flag.is_loading());
                Vec::new()
            }
            _ = frame.tick() => boot.animate(mounted.elapsed()),
            _ = wait_until(safety_at) => {
                warn!(displayed = boot.displayed(), "safety timeout reached, forcing completion");
                boot.fire_safety_timer(mounted.elapsed())
            }
            _ = wait_until(phase_at) => boot.advance(mounted.elapsed()),
            entry = next_completion(&mut observer) => {
                match entry {
                    Some(entry) => {
                        loads_observed = loads_observed.saturating_add(1);
                        trace!(name = %entry.name, kind = ?entry.kind, "resource complete");
                        boot.record_load();
                    }
                    None => {
                        debug!("resource observer closed");
                        observer = None;
                    }
                }
                Vec::new()
            }
        };

        for transition in &fired {
            info!(
                from = %transition.from,
                to = %transition.to,
                at_ms = transition.at_ms,
                "phase transition"
            );
        }
        transitions.extend(fired);
        surface.render(boot.phase(), boot.displayed());
    }

    BootReport {
        mount_id,
        started_at,
        transitions,
        frames_rendered: surface.frames_rendered,
        loads_observed,
        final_percent: boot.displayed(),
        forced_by_safety_timer: boot.forced_by_safety_timer(),
        observer_available,
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn next_completion(
    observer: &mut Option<mpsc::UnboundedReceiver<ResourceEntry>>,
) -> Option<ResourceEntry> {
    match observer {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
