//! Periodic probe driver.
//!
//! One lane per probe: each lane ticks on its own interval, runs its probe in
//! an isolated task and broadcasts the snapshot to every observer when the
//! change detector reports a difference. A slow or hung probe only delays its
//! own lane.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tpanel_core::{EventBroadcaster, EventTarget, Probe, ProbeError, SnapshotStore};

use crate::probes::ProbeSet;

/// Error from poll loop lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum PollLoopError {
    #[error("Poll loop is already running")]
    AlreadyRunning,

    #[error("Poll loop is not running")]
    NotRunning,
}

/// Handle to the running lanes.
struct LoopHandle {
    cancel_token: CancellationToken,
    lanes: Vec<JoinHandle<()>>,
}

/// Aborts the wrapped task when dropped, e.g. when a lane is cancelled
/// while its probe is still running.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Run `probe` once and broadcast its snapshot if it changed.
///
/// The probe runs on its own task, so a panic is reported as
/// [`ProbeError::Task`] instead of tearing down the caller. Returns whether
/// anything was broadcast.
pub async fn poll_once(
    probe: &Arc<dyn Probe>,
    store: &SnapshotStore,
    broadcaster: &dyn EventBroadcaster,
) -> Result<bool, ProbeError> {
    let mut task = AbortOnDrop(tokio::spawn({
        let probe = Arc::clone(probe);
        async move { probe.probe().await }
    }));
    let snapshot = (&mut task.0)
        .await
        .map_err(|e| ProbeError::Task(e.to_string()))??;

    if !store.diff(&snapshot) {
        return Ok(false);
    }
    let event = snapshot.into_event();
    debug!(event = event.event_name(), "Broadcasting snapshot");
    broadcaster.emit(event, EventTarget::All);
    Ok(true)
}

async fn run_lane(
    probe: Arc<dyn Probe>,
    store: Arc<SnapshotStore>,
    broadcaster: Arc<dyn EventBroadcaster>,
    period: Duration,
    cancel_token: CancellationToken,
) {
    let kind = probe.kind();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    debug!(probe = %kind, period = ?period, "Probe lane started");

    loop {
        tokio::select! {
            () = cancel_token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            () = cancel_token.cancelled() => break,
            result = poll_once(&probe, &store, broadcaster.as_ref()) => result,
        };

        if let Err(e) = result {
            warn!(probe = %kind, error = %e, "Probe failed, keeping previous snapshot");
        }
    }

    debug!(probe = %kind, "Probe lane stopped");
}

/// Supervisor for the probe lanes.
///
/// Started once at boot and stopped at shutdown. The first tick of every lane
/// fires immediately, so the store fills as soon as the probes answer.
pub struct PollLoop {
    probes: ProbeSet,
    store: Arc<SnapshotStore>,
    broadcaster: Arc<dyn EventBroadcaster>,
    period: Duration,
    handle: Mutex<Option<LoopHandle>>,
}

impl PollLoop {
    pub fn new(
        probes: ProbeSet,
        store: Arc<SnapshotStore>,
        broadcaster: Arc<dyn EventBroadcaster>,
        period: Duration,
    ) -> Self {
        Self {
            probes,
            store,
            broadcaster,
            period,
            handle: Mutex::new(None),
        }
    }

    /// Spawn one lane per probe.
    pub async fn start(&self) -> Result<(), PollLoopError> {
        let mut guard = self.handle.lock().await;
        if guard.is_some() {
            return Err(PollLoopError::AlreadyRunning);
        }

        let cancel_token = CancellationToken::new();
        let lanes = self
            .probes
            .iter()
            .map(|probe| {
                tokio::spawn(run_lane(
                    Arc::clone(probe),
                    Arc::clone(&self.store),
                    Arc::clone(&self.broadcaster),
                    self.period,
                    cancel_token.child_token(),
                ))
            })
            .collect();

        info!(probes = self.probes.len(), period = ?self.period, "Poll loop started");
        *guard = Some(LoopHandle {
            cancel_token,
            lanes,
        });
        Ok(())
    }

    /// Cancel every lane and wait for them to finish.
    pub async fn stop(&self) -> Result<(), PollLoopError> {
        let handle = self
            .handle
            .lock()
            .await
            .take()
            .ok_or(PollLoopError::NotRunning)?;

        handle.cancel_token.cancel();
        for lane in handle.lanes {
            if let Err(e) = lane.await {
                warn!(error = %e, "Probe lane ended abnormally");
            }
        }
        info!("Poll loop stopped");
        Ok(())
    }

    pub async fn is_running(&self) -> bool {
        self.handle.lock().await.is_some()
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }
}
