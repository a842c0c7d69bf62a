//! MemoryPersistence trait definition.
//!
//! The backing I/O for the memory store: read the whole collection, replace
//! the whole collection. Implementations live in keepsake-infra (JSON file,
//! SQLite); an in-process implementation is provided here.

use std::sync::Mutex;

use keepsake_types::error::PersistenceError;
use keepsake_types::memory::StoredMemory;

/// Port for durable storage of the memory collection.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait MemoryPersistence: Send + Sync {
    /// Read every persisted record, in stored order.
    ///
    /// A backing resource that does not exist yet (or is empty) yields
    /// `Ok(vec![])`, not an error.
    fn read_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<StoredMemory>, PersistenceError>> + Send;

    /// Replace the entire persisted collection with `records`.
    fn write_all(
        &self,
        records: &[StoredMemory],
    ) -> impl std::future::Future<Output = Result<(), PersistenceError>> + Send;

    /// Human-readable location of the collection (file path, database URL).
    fn describe(&self) -> String;
}

/// Process-local persistence. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    records: Mutex<Vec<StoredMemory>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing collection (e.g. legacy blobs).
    pub fn with_records(records: Vec<StoredMemory>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Copy of the current collection.
    pub fn snapshot(&self) -> Vec<StoredMemory> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl MemoryPersistence for InMemoryPersistence {
    async fn read_all(&self) -> Result<Vec<StoredMemory>, PersistenceError> {
        self.records
            .lock()
            .map(|records| records.clone())
            .map_err(|_| PersistenceError::Unavailable("in-memory collection poisoned".to_string()))
    }

    async fn write_all(&self, records: &[StoredMemory]) -> Result<(), PersistenceError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| PersistenceError::Unavailable("in-memory collection poisoned".to_string()))?;
        *guard = records.to_vec();
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
