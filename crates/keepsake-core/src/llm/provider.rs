//! LlmProvider trait definition.
//!
//! The completion collaborator used by each conversation turn. Keepsake only
//! needs whole-response completion; there is no streaming path.

use keepsake_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for chat completion backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in keepsake-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
