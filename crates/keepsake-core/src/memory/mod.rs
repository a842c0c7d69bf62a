//! Time-bounded memory for Keepsake.
//!
//! Records come from directives the assistant embeds in its replies
//! (`directive`), expire on a fixed clock per timeframe (`expiry`), and live
//! in a store (`store`) backed by a pluggable persistence port
//! (`persistence`, `box_persistence`).

pub mod box_persistence;
pub mod directive;
pub mod expiry;
pub mod persistence;
pub mod store;
