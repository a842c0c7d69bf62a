//! Interactive terminal chat.
//!
//! Keeps the conversation history in-process and persists memories through
//! the same service the HTTP API uses. Entry point: `loop_runner::run_chat_loop`.

pub mod commands;
pub mod input;
pub mod loop_runner;
