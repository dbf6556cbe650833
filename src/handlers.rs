use crate::dispatch::{DispatchOutcome, UndoOutcome};
use crate::errors::AppError;
use crate::models::{
    Action, ActionRequest, ActionResponse, DashboardView, Format, WeeklyForecastDay,
};
use crate::state::AppState;
use crate::sync::View;
use crate::ui::{render_index, render_week};
use crate::view::build_dashboard;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Json,
};
use serde::Deserialize;

const NOTICE_NOTHING_TO_UNDO: &str = "nothing-to-undo";

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    view: Option<String>,
    notice: Option<String>,
}

pub async fn index(State(state): State<AppState>, Query(query): Query<IndexQuery>) -> Html<String> {
    if let Some(view) = query.view.as_deref().and_then(View::parse) {
        state.sync.select_view(view).await;
    }

    let notice = query.notice.as_deref().map(|code| match code {
        NOTICE_NOTHING_TO_UNDO => "Nothing to undo",
        _ => "Something went wrong, the display may be out of date",
    });

    let view = build_dashboard(&state.sync).await;
    Html(render_index(&view, notice))
}

pub async fn week(State(state): State<AppState>) -> Html<String> {
    let week = state.sync.forecast().ensure_weekly_loaded().await;
    Html(render_week(week.as_deref()))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    Json(build_dashboard(&state.sync).await)
}

pub async fn get_week(
    State(state): State<AppState>,
) -> Result<Json<Vec<WeeklyForecastDay>>, AppError> {
    let days = state.sync.forecast().ensure_weekly_loaded().await?;
    Ok(Json(days.to_vec()))
}

pub async fn sale(
    State(state): State<AppState>,
    Path(format): Path<String>,
) -> Result<Redirect, AppError> {
    let format = Format::parse(&format)
        .ok_or_else(|| AppError::bad_request("format must be '250g', '1kg' or '2kg'"))?;

    state.sync.dispatcher().dispatch_action(Action::sale(format.key())).await;
    Ok(Redirect::to("/"))
}

pub async fn undo_redirect(State(state): State<AppState>) -> Redirect {
    match state.sync.dispatcher().undo_last().await {
        UndoOutcome::NothingToUndo(_) => {
            Redirect::to(&format!("/?notice={NOTICE_NOTHING_TO_UNDO}"))
        }
        UndoOutcome::Success | UndoOutcome::Failure => Redirect::to("/"),
    }
}

pub async fn log_action(
    State(state): State<AppState>,
    Json(payload): Json<ActionRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let detail = payload.detail.trim();
    if detail.is_empty() {
        return Err(AppError::bad_request("detail must not be empty"));
    }

    let action = match payload.kind.trim() {
        "VENTE" | "sale" => Action::sale(detail),
        "CONVERSION" | "conversion" => Action::conversion(detail),
        _ => return Err(AppError::bad_request("type must be 'VENTE' or 'CONVERSION'")),
    };

    let outcome = state.sync.dispatcher().dispatch_action(action).await;
    Ok(Json(dispatch_response(outcome)))
}

pub async fn undo(State(state): State<AppState>) -> Json<ActionResponse> {
    let response = match state.sync.dispatcher().undo_last().await {
        UndoOutcome::Success => ActionResponse {
            outcome: "success".to_string(),
            notice: None,
        },
        UndoOutcome::NothingToUndo(message) => ActionResponse {
            outcome: "nothing_to_undo".to_string(),
            notice: Some(message),
        },
        UndoOutcome::Failure => ActionResponse {
            outcome: "failure".to_string(),
            notice: None,
        },
    };
    Json(response)
}

pub async fn retrain(State(state): State<AppState>) -> Json<ActionResponse> {
    let outcome = state.sync.dispatcher().retrain().await;
    Json(dispatch_response(outcome))
}

fn dispatch_response(outcome: DispatchOutcome) -> ActionResponse {
    let outcome = match outcome {
        DispatchOutcome::Success => "success",
        DispatchOutcome::Failure => "failure",
    };
    ActionResponse {
        outcome: outcome.to_string(),
        notice: None,
    }
}
