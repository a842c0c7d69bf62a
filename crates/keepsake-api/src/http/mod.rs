//! HTTP API layer for Keepsake.
//!
//! Axum-based API under `/chat_api/` with permissive CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod router;
