use crate::errors::SyncError;
use crate::remote::RemoteApi;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Shortest period the poller accepts; `interval` panics on a zero period.
pub const MIN_PERIOD: Duration = Duration::from_millis(10);

/// Keeps the shop's open/closed flag current.
///
/// The poller is the only writer of the flag; everything else reads it through
/// [`StatusPoller::is_open`] or a [`watch::Receiver`] from
/// [`StatusPoller::subscribe`].
pub struct StatusPoller {
    remote: Arc<dyn RemoteApi>,
    open: watch::Sender<bool>,
    period: Duration,
}

impl StatusPoller {
    pub fn new(remote: Arc<dyn RemoteApi>, period: Duration) -> Self {
        if period < MIN_PERIOD {
            warn!(?period, "status period too short, using {MIN_PERIOD:?}");
        }
        let (open, _) = watch::channel(false);
        Self {
            remote,
            open,
            period: period.max(MIN_PERIOD),
        }
    }

    pub fn is_open(&self) -> bool {
        *self.open.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.open.subscribe()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub async fn tick(&self) -> Result<bool, SyncError> {
        let status = self.remote.fetch_status().await.inspect_err(|err| {
            warn!("status check failed, retrying next tick: {err}");
        })?;

        self.open.send_if_modified(|open| {
            let changed = *open != status.open;
            *open = status.open;
            changed
        });
        debug!(
            open = status.open,
            message = status.message.as_deref().unwrap_or_default(),
            "status refreshed"
        );
        Ok(status.open)
    }

    /// Ticks immediately, then once per period until the task is aborted.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let _ = self.tick().await;
            }
        })
    }
}
