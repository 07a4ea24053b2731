//! Trace API handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use xray_sdk::Trace;

use crate::error::AppError;
use crate::ServerState;

/// Response for listing traces. The dashboard pattern-matches on the
/// presence of the `traces` array, so the field is always serialized, and
/// `error` only appears on failure.
#[derive(Serialize)]
pub struct TracesResponse {
    pub traces: Vec<Trace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response for a delete request.
#[derive(Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// GET /api/traces - The full persisted document, newest trace first.
///
/// Storage keeps traces oldest-first; reversal for display happens here,
/// at the presentation boundary. A missing store is an empty list; a
/// read/parse failure keeps the same shape with an `error` field and a 500.
pub async fn list(State(state): State<Arc<ServerState>>) -> (StatusCode, Json<TracesResponse>) {
    match state.storage.try_read_traces().await {
        Ok(mut data) => {
            data.traces.reverse();
            (
                StatusCode::OK,
                Json(TracesResponse {
                    traces: data.traces,
                    error: None,
                }),
            )
        }
        Err(e) => {
            tracing::error!("Failed to read traces: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TracesResponse {
                    traces: Vec::new(),
                    error: Some("Failed to load traces".to_string()),
                }),
            )
        }
    }
}

/// GET /api/traces/{id} - A single trace by id.
pub async fn get(
    State(state): State<Arc<ServerState>>,
    Path(trace_id): Path<String>,
) -> Result<Json<Trace>, AppError> {
    state
        .storage
        .get_trace(&trace_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("trace not found".into()))
}

/// DELETE /api/traces/{id} - Remove a trace.
pub async fn delete(
    State(state): State<Arc<ServerState>>,
    Path(trace_id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = state.storage.delete_trace(&trace_id).await.map_err(|e| {
        tracing::error!("Failed to delete trace: {}", e);
        AppError::Internal("failed to delete trace".into())
    })?;

    Ok(Json(DeleteResponse { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use xray_sdk::{FileStorageAdapter, MemoryStorageAdapter, StorageAdapter};

    fn state(storage: Arc<dyn StorageAdapter>) -> Arc<ServerState> {
        Arc::new(ServerState { storage })
    }

    #[tokio::test]
    async fn test_list_reverses_to_newest_first() {
        let storage = Arc::new(MemoryStorageAdapter::new());
        storage.write_trace(Trace::new("t1", "first")).await.unwrap();
        storage.write_trace(Trace::new("t2", "second")).await.unwrap();

        let (status, Json(body)) = list(State(state(storage))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.error.is_none());
        assert_eq!(body.traces[0].id, "t2");
        assert_eq!(body.traces[1].id, "t1");
    }

    #[tokio::test]
    async fn test_list_missing_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FileStorageAdapter::new(dir.path().join("traces.json")));

        let (status, Json(body)) = list(State(state(storage))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.traces.is_empty());
        assert!(body.error.is_none());
    }

    #[tokio::test]
    async fn test_list_corrupt_store_reports_error_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traces.json");
        std::fs::write(&path, b"not json").unwrap();

        let (status, Json(body)) = list(State(state(Arc::new(FileStorageAdapter::new(path))))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.traces.is_empty());
        assert!(body.error.is_some());
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let storage = Arc::new(MemoryStorageAdapter::new());
        storage.write_trace(Trace::new("t1", "run")).await.unwrap();
        let state = state(storage);

        let Json(trace) = get(State(state.clone()), Path("t1".to_string()))
            .await
            .unwrap();
        assert_eq!(trace.id, "t1");

        assert!(get(State(state.clone()), Path("nope".to_string()))
            .await
            .is_err());

        let Json(body) = delete(State(state.clone()), Path("t1".to_string()))
            .await
            .unwrap();
        assert!(body.deleted);

        let Json(body) = delete(State(state), Path("t1".to_string())).await.unwrap();
        assert!(!body.deleted);
    }
}
