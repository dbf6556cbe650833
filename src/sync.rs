use crate::config::SyncSettings;
use crate::dispatch::{ActionDispatcher, Haptics};
use crate::forecast::ForecastCache;
use crate::poller::StatusPoller;
use crate::remote::RemoteApi;
use crate::store::SnapshotStore;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Counters,
    Stats,
    Prediction,
    DayForecast,
    WeekForecast,
}

impl View {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "counters" => Some(View::Counters),
            "stats" => Some(View::Stats),
            "prediction" => Some(View::Prediction),
            "day" => Some(View::DayForecast),
            "week" => Some(View::WeekForecast),
            _ => None,
        }
    }
}

/// Composition root of the sync layer.
pub struct SyncOrchestrator {
    store: Arc<SnapshotStore>,
    forecast: ForecastCache,
    dispatcher: ActionDispatcher,
    poller: Arc<StatusPoller>,
}

impl SyncOrchestrator {
    pub fn new(
        remote: Arc<dyn RemoteApi>,
        settings: &SyncSettings,
        haptics: Arc<dyn Haptics>,
    ) -> Self {
        let store = Arc::new(SnapshotStore::new(Arc::clone(&remote)));
        let dispatcher = ActionDispatcher::new(
            Arc::clone(&remote),
            Arc::clone(&store),
            haptics,
            settings.haptic_pulse,
            settings.retrain_delay,
        );
        Self {
            forecast: ForecastCache::new(Arc::clone(&remote)),
            poller: Arc::new(StatusPoller::new(remote, settings.status_interval)),
            dispatcher,
            store,
        }
    }

    /// Runs the initial full refresh and starts the status poller.
    ///
    /// Dropping the returned handle leaves the poller running; abort it to stop.
    pub async fn start(&self) -> JoinHandle<()> {
        self.store.refresh_all().await;
        info!(period = ?self.poller.period(), "starting status poller");
        Arc::clone(&self.poller).spawn()
    }

    pub async fn select_view(&self, view: View) {
        match view {
            View::Stats | View::Prediction => {
                let _ = tokio::join!(self.store.refresh_stats(), self.store.refresh_prediction());
            }
            View::WeekForecast => {
                let _ = self.forecast.ensure_weekly_loaded().await;
            }
            View::Counters | View::DayForecast => {}
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn forecast(&self) -> &ForecastCache {
        &self.forecast
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn poller(&self) -> &StatusPoller {
        &self.poller
    }
}
