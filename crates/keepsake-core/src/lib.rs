//! Business logic and port definitions for Keepsake.
//!
//! This crate defines the memory store, the directive extractor, and turn
//! orchestration, plus the ports (`MemoryPersistence`, `LlmProvider`) that
//! the infrastructure layer implements. It depends only on `keepsake-types`,
//! never on `keepsake-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod memory;
