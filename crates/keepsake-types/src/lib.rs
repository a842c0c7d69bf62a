//! Shared domain types for Keepsake.
//!
//! This crate contains the domain types used across the workspace: memory
//! records and their persisted shape, LLM message types, configuration,
//! and persistence errors.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod memory;
