//! Trace recording and structural regression detection for AI pipelines.
//!
//! A [`TraceRecorder`] builds one [`Trace`] at a time from named steps with
//! structured input/output, persists it through a pluggable
//! [`StorageAdapter`], and can compare the in-progress trace against a
//! previously stored run to detect structural regressions: keys or array
//! shapes that appeared or disappeared between runs, independent of the
//! actual data.
//!
//! ```no_run
//! use std::sync::Arc;
//! use serde_json::json;
//! use xray_sdk::{FileStorageAdapter, StepData, TraceRecorder};
//!
//! # async fn demo() -> Result<(), xray_sdk::RecorderError> {
//! let mut recorder = TraceRecorder::new(Arc::new(FileStorageAdapter::default()));
//! recorder.start_trace("run-42", "Competitor Selection");
//! recorder.add_step(
//!     StepData::new("Search")
//!         .with_input(json!({"q": "water bottle"}).as_object().cloned().unwrap())
//!         .with_reasoning("queried the catalog"),
//! )?;
//! recorder.save().await?;
//! # Ok(())
//! # }
//! ```

mod recorder;
mod regression;
mod storage;
mod structure;
mod trace;

pub use recorder::{RecorderError, TraceRecorder};
pub use regression::{ChangeField, RegressionResult, StructureChange};
pub use storage::{
    FileStorageAdapter, MemoryStorageAdapter, PostgresStorageAdapter, StorageAdapter, StorageError,
};
pub use structure::{object_structure, structure_of, structure_of_prefixed};
pub use trace::{Step, StepData, StepStatus, Trace, TracesData};
