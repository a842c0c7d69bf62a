//! Memory types for Keepsake.
//!
//! These types model the assistant's time-bounded memory: facts the model
//! asked to remember, each tagged with a retention timeframe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Opaque identifier of a memory record.
///
/// Freshly generated ids are UUIDv7 strings, but ids read from legacy data
/// are kept verbatim whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryId(pub String);

impl MemoryId {
    /// Generate a new, never-reused identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}

impl fmt::Display for MemoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Retention class of a memory record.
///
/// Unknown tokens are kept as [`Timeframe::Unrecognized`] rather than
/// rejected; the expiry policy treats them as already expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Timeframe {
    Day,
    Week,
    Month,
    Indefinitely,
    Unrecognized(String),
}

impl Timeframe {
    /// Parse a timeframe token. Surrounding whitespace is ignored; the token
    /// itself must match exactly, so `DAY` is unrecognized.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed {
            "day" => Timeframe::Day,
            "week" => Timeframe::Week,
            "month" => Timeframe::Month,
            "indefinitely" => Timeframe::Indefinitely,
            _ => Timeframe::Unrecognized(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Timeframe::Day => "day",
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::Indefinitely => "indefinitely",
            Timeframe::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Timeframe::parse(s))
    }
}

impl From<String> for Timeframe {
    fn from(raw: String) -> Self {
        Timeframe::parse(&raw)
    }
}

impl From<Timeframe> for String {
    fn from(timeframe: Timeframe) -> Self {
        timeframe.as_str().to_string()
    }
}

/// A single remembered fact.
///
/// Serializes to the same `{id, content, timeframe, timestamp}` shape the
/// persistence layer stores, which is also what the memories endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: MemoryId,
    /// The fact to remember. Doubles as the dedup key.
    pub content: String,
    pub timeframe: Timeframe,
    /// Anchor for expiry computation. Never mutated after creation.
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl MemoryRecord {
    /// Create a record with a freshly generated id.
    pub fn new(content: impl Into<String>, timeframe: Timeframe, created_at: DateTime<Utc>) -> Self {
        Self {
            id: MemoryId::generate(),
            content: content.into(),
            timeframe,
            created_at,
        }
    }
}

/// Raw persisted shape of a memory record.
///
/// `id` and `timestamp` are optional because legacy collections were written
/// without them; the store backfills both on load. Everything written by
/// Keepsake carries all four fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMemory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub timeframe: String,
    /// ISO-8601 creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl From<&MemoryRecord> for StoredMemory {
    fn from(record: &MemoryRecord) -> Self {
        Self {
            id: Some(record.id.0.clone()),
            content: record.content.clone(),
            timeframe: record.timeframe.to_string(),
            timestamp: Some(record.created_at.to_rfc3339()),
        }
    }
}
