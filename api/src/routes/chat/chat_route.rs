//! POST /chat: one retrieval-augmented chat turn.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::chat::chat_request::{ChatRequest, ChatResponse},
};

/// Handler: POST /chat
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:4000/chat \
///   -H 'content-type: application/json' \
///   -d '{"sessionId":"6f1c...","message":"What happened with interest rates?"}'
/// ```
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let Json(body) = body?;
    let (session_id, message) = body
        .required()
        .ok_or_else(|| AppError::BadRequest("sessionId and message are required".into()))?;

    let turn = state.pipeline.chat(session_id, message).await?;

    Ok(Json(ChatResponse {
        reply: turn.reply,
        context: turn.context,
    }))
}
