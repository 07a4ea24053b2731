//! Pluggable trace storage.
//!
//! The recorder only ever talks to [`StorageAdapter`], so backends can be
//! swapped without touching recording logic. Two backends are provided: a
//! single-JSON-document file store and an in-memory store for tests. A
//! database-backed adapter is an acknowledged extension point; see
//! [`PostgresStorageAdapter`].

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use crate::trace::{Trace, TracesData};

/// Errors from storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Lock error")]
    Lock,
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Capability interface for trace persistence.
///
/// Reads degrade: [`read_traces`](StorageAdapter::read_traces) and
/// [`get_trace`](StorageAdapter::get_trace) never fail, they log and fall
/// back to an empty document. Writes propagate their errors.
///
/// Trace ids are caller-supplied and not checked for uniqueness at write
/// time. Under duplicate ids, `get_trace` returns the first match in
/// storage order and `delete_trace` removes every match.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Reads the full persisted document, surfacing I/O and parse failures.
    async fn try_read_traces(&self) -> Result<TracesData, StorageError>;

    /// Reads the full persisted document, treating any failure as an empty
    /// store. A missing backing store is not an error.
    async fn read_traces(&self) -> TracesData {
        match self.try_read_traces().await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Failed to read traces, treating store as empty: {}", e);
                TracesData::default()
            }
        }
    }

    /// Appends a trace to the document and persists it.
    async fn write_trace(&self, trace: Trace) -> Result<(), StorageError>;

    /// Looks up a trace by id. Linear scan; first match wins.
    async fn get_trace(&self, trace_id: &str) -> Option<Trace> {
        self.read_traces()
            .await
            .traces
            .into_iter()
            .find(|t| t.id == trace_id)
    }

    /// Removes all traces with the given id, persisting only if something
    /// was removed. Returns whether a removal occurred.
    async fn delete_trace(&self, trace_id: &str) -> Result<bool, StorageError>;

    /// Best-effort check that writes are currently possible.
    async fn is_available(&self) -> bool;
}

/// Stores every trace in one pretty-printed JSON document on disk.
///
/// Writes are read-modify-write of the whole file with no locking, so
/// concurrent writers can lose updates (last write wins). Serialize access
/// externally if that matters.
pub struct FileStorageAdapter {
    file_path: PathBuf,
}

impl FileStorageAdapter {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    async fn ensure_directory(&self) -> Result<(), StorageError> {
        if let Some(dir) = self.file_path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        Ok(())
    }

    async fn write_all(&self, data: &TracesData) -> Result<(), StorageError> {
        self.ensure_directory().await?;
        let content = serde_json::to_vec_pretty(data)?;
        tokio::fs::write(&self.file_path, content).await?;
        Ok(())
    }
}

impl Default for FileStorageAdapter {
    fn default() -> Self {
        Self::new(Path::new("data").join("traces.json"))
    }
}

#[async_trait]
impl StorageAdapter for FileStorageAdapter {
    async fn try_read_traces(&self) -> Result<TracesData, StorageError> {
        match tokio::fs::read_to_string(&self.file_path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TracesData::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_trace(&self, trace: Trace) -> Result<(), StorageError> {
        let mut data = self.read_traces().await;
        data.traces.push(trace);
        self.write_all(&data).await
    }

    async fn delete_trace(&self, trace_id: &str) -> Result<bool, StorageError> {
        let mut data = self.read_traces().await;
        let initial_len = data.traces.len();
        data.traces.retain(|t| t.id != trace_id);
        if data.traces.len() == initial_len {
            return Ok(false);
        }
        self.write_all(&data).await?;
        Ok(true)
    }

    async fn is_available(&self) -> bool {
        self.ensure_directory().await.is_ok()
    }
}

/// In-memory storage, for tests and short-lived embedding.
#[derive(Default)]
pub struct MemoryStorageAdapter {
    traces: Mutex<Vec<Trace>>,
}

impl MemoryStorageAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every stored trace.
    pub fn clear(&self) {
        let Ok(mut guard) = self.traces.lock() else {
            tracing::warn!("Failed to acquire traces lock, skipping clear");
            return;
        };
        guard.clear();
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorageAdapter {
    async fn try_read_traces(&self) -> Result<TracesData, StorageError> {
        let guard = self.traces.lock().map_err(|_| StorageError::Lock)?;
        Ok(TracesData {
            traces: guard.clone(),
        })
    }

    async fn write_trace(&self, trace: Trace) -> Result<(), StorageError> {
        let mut guard = self.traces.lock().map_err(|_| StorageError::Lock)?;
        guard.push(trace);
        Ok(())
    }

    async fn delete_trace(&self, trace_id: &str) -> Result<bool, StorageError> {
        let mut guard = self.traces.lock().map_err(|_| StorageError::Lock)?;
        let initial_len = guard.len();
        guard.retain(|t| t.id != trace_id);
        Ok(guard.len() != initial_len)
    }

    async fn is_available(&self) -> bool {
        true
    }
}

/// Placeholder for a transactional database backend.
///
/// Every operation reports the backend as unavailable. The type exists so
/// the seam for safe concurrent writes is visible; wiring up an actual
/// connection pool is deliberately out of scope.
pub struct PostgresStorageAdapter {
    connection_string: String,
}

impl PostgresStorageAdapter {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
        }
    }

    fn unavailable(&self) -> StorageError {
        StorageError::Unavailable(format!(
            "postgres adapter not implemented (configured for {})",
            self.connection_string
        ))
    }
}

#[async_trait]
impl StorageAdapter for PostgresStorageAdapter {
    async fn try_read_traces(&self) -> Result<TracesData, StorageError> {
        Err(self.unavailable())
    }

    async fn write_trace(&self, _trace: Trace) -> Result<(), StorageError> {
        Err(self.unavailable())
    }

    async fn delete_trace(&self, _trace_id: &str) -> Result<bool, StorageError> {
        Err(self.unavailable())
    }

    async fn is_available(&self) -> bool {
        false
    }
}
