//! SQLite storage layer.
//!
//! Memory backend on SQLite with WAL mode and split read/write connection pools.

pub mod memory;
pub mod pool;
