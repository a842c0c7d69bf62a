//! Memory store: the durable set of live memory records.
//!
//! Every operation reads the whole collection through the injected
//! [`MemoryPersistence`] port, normalizes legacy blobs into typed
//! [`MemoryRecord`]s, and filters out expired entries. Writes replace the
//! whole collection.

use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use keepsake_types::error::PersistenceError;
use keepsake_types::memory::{MemoryId, MemoryRecord, StoredMemory, Timeframe};

use super::expiry::is_expired;
use super::persistence::MemoryPersistence;

/// Naive layouts accepted for legacy timestamps (no offset).
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Time-bounded memory store over a persistence backend.
///
/// Read-modify-write cycles are serialized by an async mutex, so concurrent
/// turns in one process never lose each other's records.
pub struct MemoryStore<P: MemoryPersistence> {
    persistence: P,
    write_lock: Mutex<()>,
}

impl<P: MemoryPersistence> MemoryStore<P> {
    pub fn new(persistence: P) -> Self {
        Self {
            persistence,
            write_lock: Mutex::new(()),
        }
    }

    /// Access the persistence backend.
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Load every live record as of now.
    pub async fn load_all(&self) -> Result<Vec<MemoryRecord>, PersistenceError> {
        self.load_all_at(Utc::now()).await
    }

    /// Load every record that is live at `now`.
    ///
    /// Missing ids and timestamps are backfilled in the returned records only;
    /// they reach the backing store on the next persisting pass.
    #[tracing::instrument(skip(self), fields(backend = %self.persistence.describe()))]
    pub async fn load_all_at(&self, now: DateTime<Utc>) -> Result<Vec<MemoryRecord>, PersistenceError> {
        let stored = self.persistence.read_all().await?;
        let total = stored.len();
        let records = stored
            .into_iter()
            .filter_map(|blob| normalize(blob, now))
            .collect();
        let live = prune_expired(records, now);
        debug!(total, live = live.len(), "Loaded memories");
        Ok(live)
    }

    /// Merge `new_records` into the live set and persist the result as now.
    pub async fn merge_and_persist(
        &self,
        new_records: Vec<MemoryRecord>,
    ) -> Result<Vec<MemoryRecord>, PersistenceError> {
        self.merge_and_persist_at(new_records, Utc::now()).await
    }

    /// Merge `new_records` into the set live at `now` and write it back.
    ///
    /// Records whose `content` already exists, in the store or earlier in the
    /// batch, are dropped. Returns the records actually added. Expired
    /// records are removed from the backing store as a side effect.
    #[tracing::instrument(skip(self, new_records), fields(incoming = new_records.len()))]
    pub async fn merge_and_persist_at(
        &self,
        new_records: Vec<MemoryRecord>,
        now: DateTime<Utc>,
    ) -> Result<Vec<MemoryRecord>, PersistenceError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load_all_at(now).await?;
        let mut known: HashSet<String> = records.iter().map(|r| r.content.clone()).collect();

        let mut added = Vec::new();
        for record in new_records {
            if known.insert(record.content.clone()) {
                added.push(record);
            } else {
                debug!(content = %record.content, "Memory already known; skipping");
            }
        }

        records.extend(added.iter().cloned());
        self.write(&records).await?;

        info!(added = added.len(), total = records.len(), "Persisted memories");
        Ok(added)
    }

    /// Drop expired records from the backing store. Returns how many were removed.
    pub async fn prune_and_persist(&self) -> Result<usize, PersistenceError> {
        self.prune_and_persist_at(Utc::now()).await
    }

    /// Drop records expired at `now` from the backing store.
    ///
    /// Also rewrites the collection when legacy blobs needed backfilling, so
    /// their ids become stable.
    #[tracing::instrument(skip(self))]
    pub async fn prune_and_persist_at(&self, now: DateTime<Utc>) -> Result<usize, PersistenceError> {
        let _guard = self.write_lock.lock().await;

        let stored = self.persistence.read_all().await?;
        let total = stored.len();
        let needs_backfill = stored
            .iter()
            .any(|blob| blob.id.is_none() || blob.timestamp.is_none());

        let records: Vec<MemoryRecord> = stored
            .into_iter()
            .filter_map(|blob| normalize(blob, now))
            .collect();
        let live = prune_expired(records, now);
        let removed = total - live.len();

        if removed > 0 || needs_backfill {
            self.write(&live).await?;
        }

        info!(removed, remaining = live.len(), "Pruned memories");
        Ok(removed)
    }

    async fn write(&self, records: &[MemoryRecord]) -> Result<(), PersistenceError> {
        let blobs: Vec<StoredMemory> = records.iter().map(StoredMemory::from).collect();
        self.persistence.write_all(&blobs).await
    }
}

/// Keep only the records still live at `now`, preserving order.
pub fn prune_expired(records: Vec<MemoryRecord>, now: DateTime<Utc>) -> Vec<MemoryRecord> {
    records
        .into_iter()
        .filter(|record| !is_expired(record, now))
        .collect()
}

/// Turn a persisted blob into a typed record, backfilling what legacy data lacks.
fn normalize(blob: StoredMemory, now: DateTime<Utc>) -> Option<MemoryRecord> {
    let content = blob.content.trim();
    if content.is_empty() {
        warn!(id = ?blob.id, "Dropping persisted memory with blank content");
        return None;
    }

    let id = match blob.id {
        Some(id) if !id.trim().is_empty() => MemoryId(id),
        _ => MemoryId::generate(),
    };

    let created_at = match blob.timestamp.as_deref() {
        Some(raw) => parse_timestamp(raw).unwrap_or_else(|| {
            warn!(id = %id, timestamp = raw, "Unparseable memory timestamp; using now");
            now
        }),
        None => now,
    };

    Some(MemoryRecord {
        id,
        content: content.to_string(),
        timeframe: Timeframe::parse(&blob.timeframe),
        created_at,
    })
}

/// Parse an RFC 3339 timestamp, or a naive ISO-8601 one in local time.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(raw, format)
            .ok()
            .and_then(|naive| naive.and_local_timezone(Local).earliest())
            .map(|local| local.with_timezone(&Utc))
    })
}
