//! Completion provider implementations.
//!
//! - `openai_compat`: any endpoint speaking the OpenAI chat completions protocol

pub mod openai_compat;
