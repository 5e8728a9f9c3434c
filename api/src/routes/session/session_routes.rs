//! Session management: create, fetch history, reset.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::session::session_response::{HistoryResponse, NewSessionResponse, ResetResponse},
};

/// Handler: POST /session/new
pub async fn new_session(State(state): State<AppState>) -> AppResult<Json<NewSessionResponse>> {
    let session_id = state.pipeline.create_session().await?;
    Ok(Json(NewSessionResponse { session_id }))
}

/// Handler: GET /session/{id}/history
pub async fn session_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<HistoryResponse>> {
    let history = state.pipeline.history(&session_id).await?;
    Ok(Json(HistoryResponse {
        session_id,
        history,
    }))
}

/// Handler: POST /session/{id}/reset
pub async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<ResetResponse>> {
    state.pipeline.reset(&session_id).await?;
    Ok(Json(ResetResponse { ok: true }))
}
