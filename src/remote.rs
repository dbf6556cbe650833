use crate::errors::SyncError;
use crate::models::{
    Action, HistoryEntry, OpenStatus, PredictionSnapshot, StatsSnapshot, StatusReply, WeekPayload,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

pub const LOG_PATH: &str = "/api/log";
pub const UNDO_PATH: &str = "/api/undo";
pub const HISTORY_PATH: &str = "/api/history";
pub const STATS_PATH: &str = "/api/stats";
pub const PREDICTION_PATH: &str = "/api/prediction";
pub const FORECAST_WEEK_PATH: &str = "/api/forecast_week";
pub const RETRAIN_PATH: &str = "/api/retrain";
pub const STATUS_PATH: &str = "/api/status";

/// The endpoints of the remote dashboard service that the sync layer consumes.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn fetch_stats(&self) -> Result<StatsSnapshot, SyncError>;
    async fn fetch_prediction(&self) -> Result<PredictionSnapshot, SyncError>;
    async fn fetch_history(&self) -> Result<Vec<HistoryEntry>, SyncError>;
    async fn fetch_weekly_forecast(&self) -> Result<WeekPayload, SyncError>;
    async fn fetch_status(&self) -> Result<OpenStatus, SyncError>;
    async fn post_log(&self, action: &Action) -> Result<StatusReply, SyncError>;
    async fn post_undo(&self) -> Result<StatusReply, SyncError>;
    async fn post_retrain(&self) -> Result<StatusReply, SyncError>;
}

#[derive(Clone)]
pub struct HttpRemote {
    client: Client,
    base_url: String,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T, SyncError> {
        let request = self.client.get(format!("{}{endpoint}", self.base_url));
        send(request, endpoint).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        body: Option<&Action>,
    ) -> Result<T, SyncError> {
        let mut request = self.client.post(format!("{}{endpoint}", self.base_url));
        if let Some(body) = body {
            request = request.json(body);
        }
        send(request, endpoint).await
    }
}

async fn send<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    endpoint: &'static str,
) -> Result<T, SyncError> {
    let response = request
        .send()
        .await
        .map_err(|source| SyncError::Transport { endpoint, source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SyncError::Status { endpoint, status });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| SyncError::Transport { endpoint, source })?;
    serde_json::from_slice(&bytes).map_err(|source| SyncError::Decode { endpoint, source })
}

#[async_trait]
impl RemoteApi for HttpRemote {
    async fn fetch_stats(&self) -> Result<StatsSnapshot, SyncError> {
        self.get(STATS_PATH).await
    }

    async fn fetch_prediction(&self) -> Result<PredictionSnapshot, SyncError> {
        self.get(PREDICTION_PATH).await
    }

    async fn fetch_history(&self) -> Result<Vec<HistoryEntry>, SyncError> {
        self.get(HISTORY_PATH).await
    }

    async fn fetch_weekly_forecast(&self) -> Result<WeekPayload, SyncError> {
        self.get(FORECAST_WEEK_PATH).await
    }

    async fn fetch_status(&self) -> Result<OpenStatus, SyncError> {
        self.get(STATUS_PATH).await
    }

    async fn post_log(&self, action: &Action) -> Result<StatusReply, SyncError> {
        self.post(LOG_PATH, Some(action)).await
    }

    async fn post_undo(&self) -> Result<StatusReply, SyncError> {
        self.post(UNDO_PATH, None).await
    }

    async fn post_retrain(&self) -> Result<StatusReply, SyncError> {
        self.post(RETRAIN_PATH, None).await
    }
}
