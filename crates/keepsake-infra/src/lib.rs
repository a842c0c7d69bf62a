//! Infrastructure layer for Keepsake.
//!
//! Contains implementations of the ports defined in `keepsake-core`: the
//! JSON file and SQLite memory backends, the OpenAI-compatible completion
//! provider, plus config loading and data directory resolution.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod sqlite;
