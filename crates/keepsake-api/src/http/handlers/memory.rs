//! Memory read endpoint.
//!
//! GET /chat_api/memories - the live memory collection.

use axum::Json;
use axum::extract::State;

use keepsake_types::memory::MemoryRecord;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /chat_api/memories - Live memories as `[{id, content, timeframe, timestamp}]`.
///
/// Expired records are filtered out but not removed from the backing store.
pub async fn list_memories(State(state): State<AppState>) -> Result<Json<Vec<MemoryRecord>>, AppError> {
    let memories = state.chat_service.memories().await?;
    Ok(Json(memories))
}
