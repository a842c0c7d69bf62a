//! Application error type mapping to HTTP status codes.
//!
//! Error bodies are `{"error": "<message>"}`. Internal failures get a generic
//! message; details only go to the log.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use keepsake_core::chat::service::TurnError;
use keepsake_types::error::PersistenceError;

/// Message returned when the request carries no usable `message`.
pub const NO_MESSAGE: &str = "No message provided";
/// Message returned for any failed turn.
pub const CHAT_FAILED: &str = "An error occurred during the chat";
/// Message returned when memories cannot be read.
pub const MEMORIES_FAILED: &str = "An error occurred while loading memories";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request body or missing message.
    BadRequest(String),
    /// A conversation turn failed.
    Turn(TurnError),
    /// Reading the memory collection failed.
    Memory(PersistenceError),
}

impl From<TurnError> for AppError {
    fn from(e: TurnError) -> Self {
        AppError::Turn(e)
    }
}

impl From<PersistenceError> for AppError {
    fn from(e: PersistenceError) -> Self {
        AppError::Memory(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Turn(TurnError::EmptyMessage) => {
                (StatusCode::BAD_REQUEST, NO_MESSAGE.to_string())
            }
            AppError::Turn(e) => {
                tracing::error!(error = %e, "Chat turn failed");
                (StatusCode::INTERNAL_SERVER_ERROR, CHAT_FAILED.to_string())
            }
            AppError::Memory(e) => {
                tracing::error!(error = %e, "Failed to load memories");
                (StatusCode::INTERNAL_SERVER_ERROR, MEMORIES_FAILED.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
