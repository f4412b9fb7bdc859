// HTTP request handlers
use crate::application::editor_session::{DashboardEditorSession, Selection};
use crate::application::error::SessionError;
use crate::domain::card::Card;
use crate::domain::dashboard::Dashboard;
use crate::domain::layout::GridPlacement;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("dashboard has no file path to save to")]
    NoFilePath,

    #[error("failed to save dashboard: {0:#}")]
    Persistence(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Session(SessionError::ViewNotFound(_))
            | ApiError::Session(SessionError::CardNotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Session(SessionError::DragInProgress(_))
            | ApiError::Session(SessionError::NoDragInProgress) => StatusCode::CONFLICT,
            ApiError::NoFilePath => StatusCode::CONFLICT,
            ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Deserialize)]
pub struct PlacementsBody {
    pub placements: Vec<GridPlacement>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
    pub dirty: bool,
    pub past: usize,
    pub future: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed: Option<bool>,
}

impl HistoryStatus {
    fn of(session: &DashboardEditorSession, changed: Option<bool>) -> Self {
        let history = session.history();
        Self {
            can_undo: history.can_undo(),
            can_redo: history.can_redo(),
            dirty: history.is_dirty(),
            past: history.past().len(),
            future: history.future().len(),
            changed,
        }
    }
}

async fn respond<T: Serialize>(
    headers: &HeaderMap,
    state: &AppState,
    status: StatusCode,
    data: &T,
) -> Response {
    let compress = state.compress && accepts_brotli(headers);
    match json_response(status, data, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current live dashboard config
pub async fn get_dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let config = state.session.lock().await.config().clone();
    respond(&headers, &state, StatusCode::OK, &config).await
}

/// Replace the whole dashboard (one history entry)
pub async fn put_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(dashboard): Json<Dashboard>,
) -> Response {
    let status = {
        let mut session = state.session.lock().await;
        session.apply_edit(dashboard);
        HistoryStatus::of(&session, Some(true))
    };
    respond(&headers, &state, StatusCode::OK, &status).await
}

/// Placements for one view, with the mode they came from
pub async fn get_view_layout(
    Path(view): Path<usize>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let layout = state.session.lock().await.view_layout(view)?;
    Ok(respond(&headers, &state, StatusCode::OK, &layout).await)
}

/// Apply placements from the drag surface and return the re-derived layout
pub async fn put_view_layout(
    Path(view): Path<usize>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(body): Json<PlacementsBody>,
) -> Result<Response, ApiError> {
    let layout = {
        let mut session = state.session.lock().await;
        session.update_view_placements(view, &body.placements)?;
        session.view_layout(view)?
    };
    Ok(respond(&headers, &state, StatusCode::OK, &layout).await)
}

pub async fn add_card(
    Path(view): Path<usize>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(card): Json<Card>,
) -> Result<Response, ApiError> {
    let index = state.session.lock().await.add_card(view, card)?;
    Ok(respond(&headers, &state, StatusCode::CREATED, &json!({ "index": index })).await)
}

pub async fn remove_card(
    Path((view, card)): Path<(usize, usize)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let removed = state.session.lock().await.remove_card(view, card)?;
    Ok(respond(&headers, &state, StatusCode::OK, &removed).await)
}

pub async fn put_selection(
    State(state): State<Arc<AppState>>,
    Json(selection): Json<Option<Selection>>,
) -> Result<StatusCode, ApiError> {
    state.session.lock().await.select(selection)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Start a live drag; returns the layout being dragged
pub async fn begin_drag(
    Path(view): Path<usize>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let layout = state.session.lock().await.begin_drag(view)?;
    Ok(respond(&headers, &state, StatusCode::OK, &layout).await)
}

pub async fn update_drag(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PlacementsBody>,
) -> Result<StatusCode, ApiError> {
    state.session.lock().await.drag_update(&body.placements)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn end_drag(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let status = {
        let mut session = state.session.lock().await;
        let committed = session.end_drag()?;
        HistoryStatus::of(&session, Some(committed))
    };
    Ok(respond(&headers, &state, StatusCode::OK, &status).await)
}

pub async fn cancel_drag(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    state.session.lock().await.cancel_drag()?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_history(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let status = HistoryStatus::of(&*state.session.lock().await, None);
    respond(&headers, &state, StatusCode::OK, &status).await
}

pub async fn undo(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let status = {
        let mut session = state.session.lock().await;
        let changed = session.undo();
        HistoryStatus::of(&session, Some(changed))
    };
    respond(&headers, &state, StatusCode::OK, &status).await
}

pub async fn redo(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let status = {
        let mut session = state.session.lock().await;
        let changed = session.redo();
        HistoryStatus::of(&session, Some(changed))
    };
    respond(&headers, &state, StatusCode::OK, &status).await
}

/// Write the last committed config to the session's file. A drag in
/// progress is not saved.
pub async fn save(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let (path, config) = {
        let session = state.session.lock().await;
        let path = session.file_path().ok_or(ApiError::NoFilePath)?.to_path_buf();
        (path, session.committed_config().clone())
    };

    // The lock is released while writing; only mark clean if nothing was committed meanwhile
    state.repository.save(&path, &config).await?;

    let status = {
        let mut session = state.session.lock().await;
        if session.committed_config() == &config {
            session.mark_saved();
        }
        HistoryStatus::of(&session, None)
    };
    Ok(respond(&headers, &state, StatusCode::OK, &status).await)
}
