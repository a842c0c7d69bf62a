//! BoxMemoryPersistence -- object-safe dynamic dispatch wrapper for MemoryPersistence.
//!
//! Same blanket-impl pattern as `BoxLlmProvider`:
//! 1. Define an object-safe `MemoryPersistenceDyn` trait with boxed futures
//! 2. Blanket-impl `MemoryPersistenceDyn` for all `T: MemoryPersistence`
//! 3. `BoxMemoryPersistence` wraps `Box<dyn MemoryPersistenceDyn>` and delegates
//!
//! Like `BoxLlmProvider`, the box itself implements `MemoryPersistence`, so
//! a `MemoryStore<BoxMemoryPersistence>` can pick its backend at runtime.

use std::future::Future;
use std::pin::Pin;

use keepsake_types::error::PersistenceError;
use keepsake_types::memory::StoredMemory;

use super::persistence::MemoryPersistence;

/// Object-safe version of [`MemoryPersistence`] with boxed futures.
pub trait MemoryPersistenceDyn: Send + Sync {
    fn read_all_boxed(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoredMemory>, PersistenceError>> + Send + '_>>;

    fn write_all_boxed<'a>(
        &'a self,
        records: &'a [StoredMemory],
    ) -> Pin<Box<dyn Future<Output = Result<(), PersistenceError>> + Send + 'a>>;

    fn describe_dyn(&self) -> String;
}

impl<T: MemoryPersistence> MemoryPersistenceDyn for T {
    fn read_all_boxed(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoredMemory>, PersistenceError>> + Send + '_>> {
        Box::pin(self.read_all())
    }

    fn write_all_boxed<'a>(
        &'a self,
        records: &'a [StoredMemory],
    ) -> Pin<Box<dyn Future<Output = Result<(), PersistenceError>> + Send + 'a>> {
        Box::pin(self.write_all(records))
    }

    fn describe_dyn(&self) -> String {
        MemoryPersistence::describe(self)
    }
}

/// Type-erased persistence backend for runtime backend selection.
pub struct BoxMemoryPersistence {
    inner: Box<dyn MemoryPersistenceDyn + Send + Sync>,
}

impl BoxMemoryPersistence {
    /// Wrap a concrete `MemoryPersistence` in a type-erased box.
    pub fn new<T: MemoryPersistence + 'static>(persistence: T) -> Self {
        Self {
            inner: Box::new(persistence),
        }
    }
}

impl MemoryPersistence for BoxMemoryPersistence {
    async fn read_all(&self) -> Result<Vec<StoredMemory>, PersistenceError> {
        self.inner.read_all_boxed().await
    }

    async fn write_all(&self, records: &[StoredMemory]) -> Result<(), PersistenceError> {
        self.inner.write_all_boxed(records).await
    }

    fn describe(&self) -> String {
        self.inner.describe_dyn()
    }
}
