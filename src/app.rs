use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/week", get(handlers::week))
        .route("/sale/:format", post(handlers::sale))
        .route("/undo", post(handlers::undo_redirect))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/week", get(handlers::get_week))
        .route("/api/log", post(handlers::log_action))
        .route("/api/undo", post(handlers::undo))
        .route("/api/retrain", post(handlers::retrain))
        .with_state(state)
}
