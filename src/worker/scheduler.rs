use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use crate::worker::indexer::Indexer;

/// Registry of named background synchronization jobs.
///
/// Each job is one tokio task running a periodic tick loop with an on-demand
/// trigger channel, so within a job, ticks and triggers never overlap.
/// Enqueueing under a name that is already registered keeps the existing job
/// and drops the new request.
pub struct SyncScheduler {
    jobs: Mutex<HashMap<String, Job>>,
}

struct Job {
    trigger_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl SyncScheduler {
    /// The fixed interval of the periodic synchronization job.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15 * 60);

    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a periodic synchronization job under `name`.
    ///
    /// The first pass runs immediately, then every `interval`. Returns `false`
    /// without scheduling anything when a job with this name already exists.
    /// A failed pass is logged and retried on the next tick.
    pub fn enqueue_unique_periodic(
        &self,
        name: &str,
        interval: Duration,
        indexer: Indexer,
    ) -> bool {
        let mut jobs = self.jobs.lock().unwrap();
        if jobs.contains_key(name) {
            return false;
        }

        let (trigger_tx, mut trigger_rx) = mpsc::channel::<()>(1);
        let job_name = name.to_string();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    msg = trigger_rx.recv() => {
                        if msg.is_none() {
                            break;
                        }
                    }
                }

                if let Err(e) = indexer.synchronize().await {
                    warn!(job = %job_name, error = %e, "synchronization pass failed");
                }
            }
        });

        jobs.insert(name.to_string(), Job { trigger_tx, handle });
        true
    }

    /// Requests an on-demand pass from the named job.
    ///
    /// Returns `false` for unknown names. A trigger arriving while one is
    /// already queued is dropped; the queued pass covers it.
    pub fn trigger(&self, name: &str) -> bool {
        let jobs = self.jobs.lock().unwrap();
        match jobs.get(name) {
            Some(job) => {
                let _ = job.trigger_tx.try_send(());
                true
            }
            None => false,
        }
    }

    /// Cancels the named job, aborting any in-flight pass.
    ///
    /// Progress already committed by earlier batches persists; a later pass
    /// reconciles whatever the abort left behind.
    pub fn cancel(&self, name: &str) -> bool {
        let mut jobs = self.jobs.lock().unwrap();
        match jobs.remove(name) {
            Some(job) => {
                job.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Cancels every registered job.
    pub fn shutdown(&self) {
        let mut jobs = self.jobs.lock().unwrap();
        for (_, job) in jobs.drain() {
            job.handle.abort();
        }
    }
}

impl Default for SyncScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
