use crate::errors::SyncError;
use crate::models::{HistoryEntry, PredictionSnapshot, StatsSnapshot};
use crate::remote::RemoteApi;
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, warn};

struct Slot<T> {
    value: T,
    applied: u64,
}

/// One snapshot plus the sequence numbers guarding it.
///
/// A ticket is issued before each fetch; a response only lands if its ticket
/// is newer than the one that produced the current value.
struct Versioned<T> {
    issued: AtomicU64,
    slot: RwLock<Slot<T>>,
}

impl<T: Clone + Default> Versioned<T> {
    fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            slot: RwLock::new(Slot {
                value: T::default(),
                applied: 0,
            }),
        }
    }

    fn ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn apply(&self, ticket: u64, value: T) -> bool {
        let mut slot = self.slot.write().await;
        if ticket <= slot.applied {
            return false;
        }
        slot.value = value;
        slot.applied = ticket;
        true
    }

    async fn read(&self) -> T {
        self.slot.read().await.value.clone()
    }
}

pub struct SnapshotStore {
    remote: Arc<dyn RemoteApi>,
    stats: Versioned<StatsSnapshot>,
    prediction: Versioned<PredictionSnapshot>,
    history: Versioned<Vec<HistoryEntry>>,
    last_synced: RwLock<Option<DateTime<Local>>>,
}

impl SnapshotStore {
    pub fn new(remote: Arc<dyn RemoteApi>) -> Self {
        Self {
            remote,
            stats: Versioned::new(),
            prediction: Versioned::new(),
            history: Versioned::new(),
            last_synced: RwLock::new(None),
        }
    }

    pub async fn refresh_stats(&self) -> Result<StatsSnapshot, SyncError> {
        let ticket = self.stats.ticket();
        let fetched = self.remote.fetch_stats().await;
        self.land(&self.stats, ticket, fetched).await
    }

    pub async fn refresh_prediction(&self) -> Result<PredictionSnapshot, SyncError> {
        let ticket = self.prediction.ticket();
        let fetched = self.remote.fetch_prediction().await;
        self.land(&self.prediction, ticket, fetched).await
    }

    pub async fn refresh_history(&self) -> Result<Vec<HistoryEntry>, SyncError> {
        let ticket = self.history.ticket();
        let fetched = self.remote.fetch_history().await;
        self.land(&self.history, ticket, fetched).await
    }

    /// Refreshes stats, prediction and history concurrently.
    ///
    /// Failures are already logged by the individual refreshes and the
    /// previous snapshots stay in place.
    pub async fn refresh_all(&self) {
        let _ = tokio::join!(
            self.refresh_stats(),
            self.refresh_prediction(),
            self.refresh_history()
        );
    }

    pub async fn stats(&self) -> StatsSnapshot {
        self.stats.read().await
    }

    pub async fn prediction(&self) -> PredictionSnapshot {
        self.prediction.read().await
    }

    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.history.read().await
    }

    pub async fn last_synced(&self) -> Option<DateTime<Local>> {
        *self.last_synced.read().await
    }

    async fn land<T: Clone + Default>(
        &self,
        target: &Versioned<T>,
        ticket: u64,
        fetched: Result<T, SyncError>,
    ) -> Result<T, SyncError> {
        match fetched {
            Ok(value) => {
                if target.apply(ticket, value.clone()).await {
                    *self.last_synced.write().await = Some(Local::now());
                    Ok(value)
                } else {
                    debug!(ticket, "discarding stale response");
                    Ok(target.read().await)
                }
            }
            Err(err) => {
                warn!(
                    endpoint = err.endpoint(),
                    "refresh failed, keeping previous snapshot: {err}"
                );
                Err(err)
            }
        }
    }
}
