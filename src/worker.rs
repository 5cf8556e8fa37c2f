/// Background drain loop on the tokio runtime.
///
/// Each pass lists the pending scopes and drains them concurrently, one
/// blocking task per scope; the synchronizer itself keeps a single scope
/// from being drained twice at once. Between passes the worker sleeps until
/// the poll interval elapses or [`SyncWorker::notify`] is called.
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::{JoinHandle, JoinSet};

use crate::sync::{DrainOutcome, RemoteApplier, Synchronizer};

pub struct SyncWorker {
    notify: Arc<Notify>,
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SyncWorker {
    /// Start the loop. Must be called from within a tokio runtime.
    pub fn spawn<R>(sync: Arc<Synchronizer<R>>, interval: Duration) -> Self
    where
        R: RemoteApplier + 'static,
    {
        let notify = Arc::new(Notify::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run(sync, interval, Arc::clone(&notify), shutdown_rx));
        log::info!("Sync worker started (interval {:?})", interval);
        SyncWorker {
            notify,
            shutdown_tx,
            handle,
        }
    }

    /// Wake the worker for an immediate pass, e.g. right after an append.
    pub fn notify(&self) {
        self.notify.notify_one();
    }

    /// Stop after the current pass and wait for the loop to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            log::error!("Sync worker task failed: {}", e);
        }
        log::info!("Sync worker stopped");
    }
}

async fn run<R>(
    sync: Arc<Synchronizer<R>>,
    interval: Duration,
    notify: Arc<Notify>,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    R: RemoteApplier + 'static,
{
    loop {
        if *shutdown_rx.borrow() {
            break;
        }
        if drain_pass(&sync).await {
            // A scope hit the per-drain cap; go again without waiting.
            tokio::task::yield_now().await;
            continue;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = notify.notified() => {}
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
}

/// Returns `true` if some scope yielded with entries left over.
async fn drain_pass<R>(sync: &Arc<Synchronizer<R>>) -> bool
where
    R: RemoteApplier + 'static,
{
    let lister = Arc::clone(sync);
    let scopes = match tokio::task::spawn_blocking(move || lister.pending_scopes()).await {
        Ok(Ok(scopes)) => scopes,
        Ok(Err(e)) => {
            log::error!("Listing pending scopes failed: {}", e);
            return false;
        }
        Err(e) => {
            log::error!("Listing pending scopes panicked: {}", e);
            return false;
        }
    };

    let mut tasks = JoinSet::new();
    for (peer_id, tag) in scopes {
        let sync = Arc::clone(sync);
        tasks.spawn_blocking(move || (peer_id, tag, sync.drain_scope(peer_id, tag)));
    }

    let mut backlog = false;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((peer_id, tag, Ok(outcome))) => match outcome {
                DrainOutcome::Drained { applied: 0, quarantined: 0 } | DrainOutcome::Busy => {}
                outcome => {
                    backlog |= matches!(outcome, DrainOutcome::Yielded { .. });
                    log::debug!("Drained {}/{}: {:?}", peer_id, tag.as_str(), outcome)
                }
            },
            Ok((peer_id, tag, Err(e))) => {
                log::error!("Draining {}/{} failed: {}", peer_id, tag.as_str(), e)
            }
            Err(e) => log::error!("Drain task panicked: {}", e),
        }
    }
    backlog
}
