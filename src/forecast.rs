use crate::errors::{ForecastError, SyncError};
use crate::models::{WeekPayload, WeeklyForecastDay};
use crate::remote::RemoteApi;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

const EMPTY_WEEK: &str = "no forecast days returned";

#[derive(Debug)]
enum WeeklyForecast {
    Days(Vec<WeeklyForecastDay>),
    Unavailable(String),
}

/// Weekly forecast, fetched at most once per session.
///
/// Both a list of days and an explicit "unavailable" answer are kept for the
/// rest of the session. Only transport failures leave the cache empty, so the
/// next selection of the weekly view asks again.
pub struct ForecastCache {
    remote: Arc<dyn RemoteApi>,
    week: OnceCell<WeeklyForecast>,
}

impl ForecastCache {
    pub fn new(remote: Arc<dyn RemoteApi>) -> Self {
        Self {
            remote,
            week: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.week.initialized()
    }

    pub async fn ensure_weekly_loaded(&self) -> Result<&[WeeklyForecastDay], ForecastError> {
        let week = self
            .week
            .get_or_try_init(|| self.fetch())
            .await
            .inspect_err(|err| warn!("weekly forecast fetch failed: {err}"))?;

        match week {
            WeeklyForecast::Days(days) => Ok(days.as_slice()),
            WeeklyForecast::Unavailable(reason) => Err(ForecastError::Unavailable(reason.clone())),
        }
    }

    async fn fetch(&self) -> Result<WeeklyForecast, SyncError> {
        let week = match self.remote.fetch_weekly_forecast().await? {
            WeekPayload::Days(days) if days.is_empty() => {
                WeeklyForecast::Unavailable(EMPTY_WEEK.to_string())
            }
            WeekPayload::Days(days) => WeeklyForecast::Days(days),
            WeekPayload::Failure { error } => WeeklyForecast::Unavailable(error),
        };

        match &week {
            WeeklyForecast::Days(days) => info!(days = days.len(), "weekly forecast loaded"),
            WeeklyForecast::Unavailable(reason) => warn!("weekly forecast unavailable: {reason}"),
        }
        Ok(week)
    }
}
