//! Conversation turns: persona, prompt composition, and orchestration.

pub mod persona;
pub mod prompt;
pub mod service;
