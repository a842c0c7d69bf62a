//! Chat endpoint.
//!
//! POST /chat_api/chat - run one conversation turn. The client owns the
//! conversation history and sends it back with every request.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use keepsake_core::chat::service::MemoryWrite;
use keepsake_types::llm::Message;

use crate::http::error::{AppError, NO_MESSAGE};
use crate::state::AppState;

/// Request body for a chat turn.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Prior turns, oldest first.
    #[serde(default)]
    pub conversation_history: Vec<Message>,
}

/// Response body for a successful turn.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub conversation_history: Vec<Message>,
}

/// POST /chat_api/chat - Send a message and receive the assistant reply.
///
/// Returns 400 when the body is not valid JSON or `message` is missing or
/// blank. A memory that fails to persist does not fail the request.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected chat request body");
        AppError::BadRequest(NO_MESSAGE.to_string())
    })?;

    let message = request.message.unwrap_or_default();
    let outcome = state
        .chat_service
        .run_turn(&message, &request.conversation_history)
        .await?;

    if let MemoryWrite::Saved(record) = &outcome.memory {
        tracing::info!(id = %record.id, timeframe = %record.timeframe, "New memory created");
    }

    Ok(Json(ChatResponse {
        reply: outcome.reply,
        conversation_history: outcome.history,
    }))
}
