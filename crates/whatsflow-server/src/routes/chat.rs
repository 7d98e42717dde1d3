//! Chat proxy endpoint.
//!
//! The planner owns the conversation; this endpoint forwards one turn and
//! hands the planner's JSON back to the caller unchanged.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use whatsflow_types::ThreadId;

use crate::error::ServerError;
use crate::state::AppState;

/// Request body for the chat endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// Conversation thread the turn belongs to.
    pub thread_id: String,

    /// The user's message.
    pub user_input: String,
}

/// POST /api/chat - forward one conversational turn to the planner.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Value>, ServerError> {
    if request.thread_id.trim().is_empty() {
        return Err(ServerError::BadRequest("Thread ID is required".to_string()));
    }
    if request.user_input.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "User input is required".to_string(),
        ));
    }

    let thread_id = ThreadId::from(request.thread_id);
    info!(thread_id = %thread_id, "Proxying chat turn to planner");

    let reply = state
        .planner
        .chat(&thread_id, &request.user_input)
        .await
        .map_err(ServerError::ChatProxy)?;

    Ok(Json(reply))
}
