//! JSON file memory backend.
//!
//! The collection is one pretty-printed JSON array. Each write goes to its
//! own uniquely named temp file in the same directory, which is then renamed
//! over the target, so readers never see a half-written collection and two
//! processes never share a temp file.

use std::io::Write;
use std::path::{Path, PathBuf};

use keepsake_core::memory::persistence::MemoryPersistence;
use keepsake_types::error::PersistenceError;
use keepsake_types::memory::StoredMemory;

/// File-backed implementation of `MemoryPersistence`.
#[derive(Debug, Clone)]
pub struct JsonFileMemoryPersistence {
    path: PathBuf,
}

impl JsonFileMemoryPersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the collection; temp files are created here so the
    /// final rename never crosses filesystems.
    fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// Write `contents` to a fresh temp file in `dir` and atomically move it to `path`.
fn replace_file(dir: &Path, path: &Path, contents: &[u8]) -> Result<(), PersistenceError> {
    let mut prefix = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "memories.json".into());
    prefix.push(".");

    let mut tmp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| PersistenceError::Io(e.error.to_string()))?;
    Ok(())
}

impl MemoryPersistence for JsonFileMemoryPersistence {
    async fn read_all(&self) -> Result<Vec<StoredMemory>, PersistenceError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No memory file yet");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| PersistenceError::Corrupt(format!("{}: {e}", self.path.display())))
    }

    async fn write_all(&self, records: &[StoredMemory]) -> Result<(), PersistenceError> {
        let dir = self.dir();
        tokio::fs::create_dir_all(&dir).await?;

        let json = serde_json::to_string_pretty(records)
            .map_err(|e| PersistenceError::Io(format!("failed to serialize memories: {e}")))?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_file(&dir, &path, json.as_bytes()))
            .await
            .map_err(|e| PersistenceError::Unavailable(format!("memory write task failed: {e}")))??;

        tracing::debug!(path = %self.path.display(), count = records.len(), "Wrote memory file");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
