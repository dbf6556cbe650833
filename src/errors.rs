use axum::http::StatusCode;
use thiserror::Error;

/// Failure talking to the remote dashboard service.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} answered with HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl SyncError {
    pub fn endpoint(&self) -> &'static str {
        match self {
            SyncError::Transport { endpoint, .. }
            | SyncError::Status { endpoint, .. }
            | SyncError::Decode { endpoint, .. } => endpoint,
        }
    }
}

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("weekly forecast unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Transport(#[from] SyncError),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: message.into(),
        }
    }
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        Self::unavailable(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
