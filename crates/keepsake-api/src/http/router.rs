//! Axum router configuration with middleware.
//!
//! Chat routes live under `/chat_api/`; `/health` sits at the root.
//! Middleware: permissive CORS, request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let chat_routes = Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route("/memories", get(handlers::memory::list_memories));

    Router::new()
        .nest("/chat_api", chat_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use keepsake_core::chat::service::{ChatService, ChatSettings};
    use keepsake_core::llm::box_provider::BoxLlmProvider;
    use keepsake_core::llm::provider::LlmProvider;
    use keepsake_core::memory::box_persistence::BoxMemoryPersistence;
    use keepsake_core::memory::persistence::{InMemoryPersistence, MemoryPersistence};
    use keepsake_core::memory::store::MemoryStore;
    use keepsake_types::config::AppConfig;
    use keepsake_types::error::PersistenceError;
    use keepsake_types::llm::{
        CompletionRequest, CompletionResponse, LlmError, StopReason, Usage,
    };
    use keepsake_types::memory::StoredMemory;

    use crate::http::error::{CHAT_FAILED, MEMORIES_FAILED, NO_MESSAGE};

    /// Replies with a fixed text, or fails when `reply` is `None`.
    struct FixedProvider {
        reply: Option<String>,
    }

    impl LlmProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
            match &self.reply {
                Some(content) => Ok(CompletionResponse {
                    id: "resp".to_string(),
                    content: content.clone(),
                    model: request.model.clone(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage::default(),
                }),
                None => Err(LlmError::AuthenticationFailed),
            }
        }
    }

    struct UnreadablePersistence;

    impl MemoryPersistence for UnreadablePersistence {
        async fn read_all(&self) -> Result<Vec<StoredMemory>, PersistenceError> {
            Err(PersistenceError::Corrupt("truncated".to_string()))
        }

        async fn write_all(&self, _records: &[StoredMemory]) -> Result<(), PersistenceError> {
            Ok(())
        }

        fn describe(&self) -> String {
            "unreadable".to_string()
        }
    }

    fn app_with(persistence: BoxMemoryPersistence, reply: Option<&str>) -> Router {
        let provider = FixedProvider {
            reply: reply.map(String::from),
        };
        let service = ChatService::new(
            MemoryStore::new(persistence),
            BoxLlmProvider::new(provider),
            ChatSettings::default(),
        );
        build_router(AppState::new(service, AppConfig::default(), PathBuf::from("."), true))
    }

    fn app(reply: Option<&str>) -> Router {
        app_with(BoxMemoryPersistence::new(InMemoryPersistence::new()), reply)
    }

    fn post_chat(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat_api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(None).oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_chat_returns_clean_reply_and_history() {
        let router = app(Some("<REMEMBER THIS FOR day: Exam tomorrow>Good luck!"));
        let body = json!({
            "message": "I have an exam tomorrow",
            "conversation_history": [
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hey there"}
            ]
        });

        let response = router
            .clone()
            .oneshot(post_chat(&body.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["reply"], "Good luck!");
        let history = json["conversation_history"].as_array().unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history[2], json!({"role": "user", "content": "I have an exam tomorrow"}));
        assert_eq!(history[3], json!({"role": "assistant", "content": "Good luck!"}));

        let memories = body_json(router.oneshot(get_request("/chat_api/memories")).await.unwrap()).await;
        let memories = memories.as_array().unwrap();
        assert_eq!(memories.len(), 1);
        assert_eq!(memories[0]["content"], "Exam tomorrow");
        assert_eq!(memories[0]["timeframe"], "day");
        assert!(memories[0]["id"].is_string());
        assert!(memories[0]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_chat_history_is_optional() {
        let response = app(Some("Hello!"))
            .oneshot(post_chat(r#"{"message": "hi"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["conversation_history"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_chat_missing_message_is_400() {
        let response = app(Some("unused")).oneshot(post_chat("{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": NO_MESSAGE}));
    }

    #[tokio::test]
    async fn test_chat_blank_message_is_400() {
        let response = app(Some("unused"))
            .oneshot(post_chat(r#"{"message": "   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_invalid_json_is_400() {
        let response = app(Some("unused")).oneshot(post_chat("not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], NO_MESSAGE);
    }

    #[tokio::test]
    async fn test_chat_provider_failure_is_generic_500() {
        let response = app(None).oneshot(post_chat(r#"{"message": "hi"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({"error": CHAT_FAILED}));
    }

    #[tokio::test]
    async fn test_memories_empty() {
        let response = app(None).oneshot(get_request("/chat_api/memories")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_memories_read_failure_is_500() {
        let router = app_with(BoxMemoryPersistence::new(UnreadablePersistence), None);
        let response = router.oneshot(get_request("/chat_api/memories")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], MEMORIES_FAILED);
    }

    #[tokio::test]
    async fn test_cors_preflight_allowed() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/chat_api/chat")
            .header("origin", "http://localhost:5173")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = app(None).oneshot(request).await.unwrap();
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }
}
