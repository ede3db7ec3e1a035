//! Poll loop for the server-side match sync job.
//!
//! Triggering an update starts a background task that checks the job status
//! on a fixed interval until the job reaches a terminal state, the configured
//! timeout elapses, or the poller is superseded or dropped.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use async_trait::async_trait;
use tokio::{task::JoinHandle, time::Instant};
use tracing::{debug, info, warn};
use valdeck_shared::{UpdateState, traits::UpdateApi};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);
/// A job that reports no terminal state within this window is treated as
/// failed instead of being polled forever.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(120);

const SUCCESS_DISPLAY_DELAY: Duration = Duration::from_secs(2);
const FAILURE_DISPLAY_DELAY: Duration = Duration::from_secs(3);
const DEFAULT_PROGRESS_MESSAGE: &str = "Fetching from API...";

/// Observable lifecycle of the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    Idle,
    Triggered,
    Polling,
    Success,
    Failure,
}

/// Snapshot of the sync progress shown on the profile screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProgress {
    pub phase: UpdatePhase,
    pub percent: u8,
    pub message: String,
}

impl Default for UpdateProgress {
    fn default() -> Self {
        Self {
            phase: UpdatePhase::Idle,
            percent: 0,
            message: String::new(),
        }
    }
}

/// Hook invoked once after a successful sync so the dependent match list can
/// be re-fetched.
#[async_trait]
pub trait OnSyncComplete: Send + Sync {
    async fn refresh(&self);
}

pub struct UpdatePoller {
    api: Arc<dyn UpdateApi>,
    on_complete: Arc<dyn OnSyncComplete>,
    poll_interval: Duration,
    poll_timeout: Duration,
    progress: Mutex<UpdateProgress>,
    task: Mutex<Option<JoinHandle<()>>>,
    /// Handed to spawned loops so they never keep the poller alive.
    weak_self: Weak<UpdatePoller>,
}

impl UpdatePoller {
    pub fn new(api: Arc<dyn UpdateApi>, on_complete: Arc<dyn OnSyncComplete>) -> Arc<Self> {
        Self::with_timing(api, on_complete, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT)
    }

    pub fn with_timing(
        api: Arc<dyn UpdateApi>,
        on_complete: Arc<dyn OnSyncComplete>,
        poll_interval: Duration,
        poll_timeout: Duration,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            api,
            on_complete,
            poll_interval,
            poll_timeout,
            progress: Mutex::new(UpdateProgress::default()),
            task: Mutex::new(None),
            weak_self: weak_self.clone(),
        })
    }

    pub fn progress(&self) -> UpdateProgress {
        self.progress.lock().expect("progress lock poisoned").clone()
    }

    /// Start a sync job and begin polling its status.
    ///
    /// A trigger while a previous loop is still live supersedes it: the old
    /// loop is aborted before the new job is started, so the visible progress
    /// is only ever written by a single loop.
    pub async fn trigger(&self, region: String, puuid: String) {
        self.abort_task();
        self.set_progress(UpdatePhase::Triggered, 0, "Starting background sync...");

        info!("triggering background sync for {}", puuid);
        match self.api.start_update(region, puuid).await {
            Ok(task_id) => {
                self.set_phase(UpdatePhase::Polling);
                self.spawn(Self::poll_loop(self.weak_self.clone(), task_id));
            }
            Err(e) => {
                warn!("background sync failed to start: {e}");
                self.set_progress(UpdatePhase::Failure, 0, "Sync failed to start.");
                let weak = self.weak_self.clone();
                self.spawn(async move {
                    tokio::time::sleep(FAILURE_DISPLAY_DELAY).await;
                    if let Some(this) = weak.upgrade() {
                        this.set_idle();
                    }
                });
            }
        }
    }

    /// Stop any live loop and reset to idle. Dropping the poller has the
    /// same effect on the loop.
    pub fn cancel(&self) {
        self.abort_task();
        self.set_idle();
    }

    // The loop only holds a weak handle on the poller: when the owning view
    // goes away the next upgrade fails and the loop winds down on its own,
    // while `Drop` aborts any sleep in progress.
    async fn poll_loop(weak: Weak<Self>, task_id: String) {
        let Some((interval, timeout)) = weak
            .upgrade()
            .map(|this| (this.poll_interval, this.poll_timeout))
        else {
            return;
        };

        let mut ticker = tokio::time::interval(interval);
        // The first interval tick completes immediately; consume it so the
        // first status check happens one full period after the trigger.
        ticker.tick().await;
        let deadline = Instant::now() + timeout;

        loop {
            ticker.tick().await;
            let Some(this) = weak.upgrade() else { return };

            if Instant::now() >= deadline {
                warn!("background sync timed out after {:?}", timeout);
                this.set_progress(UpdatePhase::Failure, 0, "Sync timed out.");
                break;
            }

            let status = match this.api.update_status(task_id.clone()).await {
                Ok(status) => status,
                Err(e) => {
                    warn!("sync status check failed: {e}");
                    this.set_progress(UpdatePhase::Failure, 0, "Sync failed.");
                    break;
                }
            };

            match status.state {
                UpdateState::Progress => {
                    if let Some(meta) = status.meta {
                        let message = meta
                            .status
                            .unwrap_or_else(|| DEFAULT_PROGRESS_MESSAGE.to_string());
                        let percent = match (meta.current, meta.total) {
                            (Some(current), Some(total)) if total > 0 => {
                                (current as f64 / total as f64 * 100.0).round() as u8
                            }
                            _ => this.progress().percent,
                        };
                        this.set_progress(UpdatePhase::Polling, percent, message);
                    }
                }
                UpdateState::Success => {
                    info!("background sync complete for task {}", task_id);
                    this.set_progress(UpdatePhase::Success, 100, "Sync complete!");
                    this.on_complete.refresh().await;
                    drop(this);

                    tokio::time::sleep(SUCCESS_DISPLAY_DELAY).await;
                    if let Some(this) = weak.upgrade() {
                        this.set_idle();
                    }
                    return;
                }
                UpdateState::Failure => {
                    warn!("background sync failed for task {}", task_id);
                    this.set_progress(UpdatePhase::Failure, 0, "Sync failed.");
                    break;
                }
                UpdateState::Pending => {
                    debug!("sync task {} still pending", task_id);
                }
            }
        }

        // Failure paths share the same display delay before going idle.
        tokio::time::sleep(FAILURE_DISPLAY_DELAY).await;
        if let Some(this) = weak.upgrade() {
            this.set_idle();
        }
    }

    fn spawn(&self, fut: impl std::future::Future<Output = ()> + Send + 'static) {
        let handle = tokio::spawn(fut);
        *self.task.lock().expect("task lock poisoned") = Some(handle);
    }

    fn abort_task(&self) {
        if let Some(handle) = self.task.lock().expect("task lock poisoned").take() {
            handle.abort();
        }
    }

    fn set_progress(&self, phase: UpdatePhase, percent: u8, message: impl Into<String>) {
        let mut progress = self.progress.lock().expect("progress lock poisoned");
        progress.phase = phase;
        progress.percent = percent;
        progress.message = message.into();
    }

    fn set_phase(&self, phase: UpdatePhase) {
        self.progress.lock().expect("progress lock poisoned").phase = phase;
    }

    fn set_idle(&self) {
        *self.progress.lock().expect("progress lock poisoned") = UpdateProgress::default();
    }
}

impl Drop for UpdatePoller {
    fn drop(&mut self) {
        if let Some(handle) = self.task.lock().expect("task lock poisoned").take() {
            handle.abort();
        }
    }
}
