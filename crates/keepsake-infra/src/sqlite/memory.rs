//! SQLite memory backend.
//!
//! Implements `MemoryPersistence` from `keepsake-core` using sqlx with split
//! read/write pools. The whole collection is replaced inside one transaction.

use sqlx::Row;

use keepsake_core::memory::persistence::MemoryPersistence;
use keepsake_types::error::PersistenceError;
use keepsake_types::memory::StoredMemory;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MemoryPersistence`.
pub struct SqliteMemoryPersistence {
    pool: DatabasePool,
}

impl SqliteMemoryPersistence {
    /// Create a new backend over the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to `StoredMemory`.
struct MemoryRow {
    id: Option<String>,
    content: String,
    timeframe: String,
    timestamp: Option<String>,
}

impl MemoryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            content: row.try_get("content")?,
            timeframe: row.try_get("timeframe")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_stored(self) -> StoredMemory {
        StoredMemory {
            id: self.id,
            content: self.content,
            timeframe: self.timeframe,
            timestamp: self.timestamp,
        }
    }
}

fn query_error(e: sqlx::Error) -> PersistenceError {
    PersistenceError::Query(e.to_string())
}

impl MemoryPersistence for SqliteMemoryPersistence {
    async fn read_all(&self) -> Result<Vec<StoredMemory>, PersistenceError> {
        let rows = sqlx::query(
            "SELECT id, content, timeframe, timestamp FROM memories ORDER BY position ASC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| {
                MemoryRow::from_row(row)
                    .map(MemoryRow::into_stored)
                    .map_err(query_error)
            })
            .collect()
    }

    async fn write_all(&self, records: &[StoredMemory]) -> Result<(), PersistenceError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        sqlx::query("DELETE FROM memories")
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        for (position, record) in records.iter().enumerate() {
            sqlx::query(
                "INSERT INTO memories (position, id, content, timeframe, timestamp) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(position as i64)
            .bind(record.id.as_deref())
            .bind(&record.content)
            .bind(&record.timeframe)
            .bind(record.timestamp.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;
        }

        tx.commit().await.map_err(query_error)?;
        tracing::debug!(count = records.len(), "Replaced memories table");
        Ok(())
    }

    fn describe(&self) -> String {
        self.pool.url().to_string()
    }
}
