use crate::models::Action;
use crate::remote::RemoteApi;
use crate::store::SnapshotStore;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const NOTHING_TO_UNDO: &str = "Nothing to undo";

#[derive(Debug, Error)]
#[error("haptic feedback is not supported here")]
pub struct HapticsUnsupported;

/// Device feedback fired when an action is dispatched.
pub trait Haptics: Send + Sync {
    fn pulse(&self, duration: Duration) -> Result<(), HapticsUnsupported>;
}

/// For hosts without a vibration motor.
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn pulse(&self, _duration: Duration) -> Result<(), HapticsUnsupported> {
        Err(HapticsUnsupported)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoOutcome {
    Success,
    NothingToUndo(String),
    Failure,
}

pub struct ActionDispatcher {
    remote: Arc<dyn RemoteApi>,
    store: Arc<SnapshotStore>,
    haptics: Arc<dyn Haptics>,
    haptic_pulse: Duration,
    retrain_delay: Duration,
}

impl ActionDispatcher {
    pub fn new(
        remote: Arc<dyn RemoteApi>,
        store: Arc<SnapshotStore>,
        haptics: Arc<dyn Haptics>,
        haptic_pulse: Duration,
        retrain_delay: Duration,
    ) -> Self {
        Self {
            remote,
            store,
            haptics,
            haptic_pulse,
            retrain_delay,
        }
    }

    pub async fn dispatch_action(&self, action: Action) -> DispatchOutcome {
        if let Err(err) = self.haptics.pulse(self.haptic_pulse) {
            debug!("skipping haptic pulse: {err}");
        }

        match self.remote.post_log(&action).await {
            Ok(reply) if reply.is_success() => {
                info!(kind = ?action.kind(), detail = action.detail(), "action logged");
                self.refresh_after_mutation().await;
                DispatchOutcome::Success
            }
            Ok(reply) => {
                warn!(status = %reply.status, "remote refused action");
                DispatchOutcome::Failure
            }
            Err(err) => {
                warn!("failed to log action: {err}");
                DispatchOutcome::Failure
            }
        }
    }

    pub async fn undo_last(&self) -> UndoOutcome {
        match self.remote.post_undo().await {
            Ok(reply) if reply.is_success() => {
                info!(
                    message = reply.message.as_deref().unwrap_or_default(),
                    "last action undone"
                );
                self.refresh_after_mutation().await;
                UndoOutcome::Success
            }
            Ok(reply) => UndoOutcome::NothingToUndo(
                reply
                    .message
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| NOTHING_TO_UNDO.to_string()),
            ),
            Err(err) => {
                warn!("failed to undo last action: {err}");
                UndoOutcome::Failure
            }
        }
    }

    /// Asks the remote to retrain its model and schedules a stats and
    /// prediction refresh once the confirmation has been on screen for the
    /// retrain delay.
    pub async fn retrain(&self) -> DispatchOutcome {
        match self.remote.post_retrain().await {
            Ok(reply) if reply.is_success() => {
                let store = Arc::clone(&self.store);
                let delay = self.retrain_delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tokio::join!(store.refresh_stats(), store.refresh_prediction());
                });
                DispatchOutcome::Success
            }
            Ok(reply) => {
                warn!(
                    message = reply.message.as_deref().unwrap_or_default(),
                    "remote refused to retrain"
                );
                DispatchOutcome::Failure
            }
            Err(err) => {
                warn!("retrain request failed: {err}");
                DispatchOutcome::Failure
            }
        }
    }

    // Stats and history only; the prediction waits for the next full refresh.
    async fn refresh_after_mutation(&self) {
        let _ = tokio::join!(self.store.refresh_stats(), self.store.refresh_history());
    }
}
