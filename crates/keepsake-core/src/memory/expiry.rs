//! Expiry policy for memory records.
//!
//! Expiry is evaluated lazily against a caller-supplied `now`; nothing runs
//! on a timer. Unknown timeframes fail safe by expiring immediately.

use chrono::{DateTime, TimeDelta, Utc};

use keepsake_types::memory::{MemoryRecord, Timeframe};

/// How long a timeframe keeps a record alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Alive while `now - created_at` does not exceed the window.
    Window(TimeDelta),
    /// Never expires.
    Forever,
    /// Already expired.
    None,
}

/// Map a timeframe to its retention window.
pub fn retention(timeframe: &Timeframe) -> Retention {
    match timeframe {
        Timeframe::Day => Retention::Window(TimeDelta::days(1)),
        Timeframe::Week => Retention::Window(TimeDelta::days(7)),
        Timeframe::Month => Retention::Window(TimeDelta::days(30)),
        Timeframe::Indefinitely => Retention::Forever,
        Timeframe::Unrecognized(_) => Retention::None,
    }
}

/// Whether `record` is expired at `now`.
///
/// Monotonic in `now`: once true it stays true for every later instant.
/// A `created_at` in the future (clock skew) counts as zero elapsed time.
pub fn is_expired(record: &MemoryRecord, now: DateTime<Utc>) -> bool {
    match retention(&record.timeframe) {
        Retention::Window(window) => now - record.created_at > window,
        Retention::Forever => false,
        Retention::None => true,
    }
}
