//! Trace recorder: builds one trace at a time and persists it through a
//! storage adapter.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::regression::{diff_structures, ChangeField, RegressionResult, StructureChange};
use crate::storage::{StorageAdapter, StorageError};
use crate::structure::object_structure;
use crate::trace::{Step, StepData, StepStatus, Trace};

/// Errors from recorder operations.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("No active trace. Call start_trace() first.")]
    NoActiveTrace,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Records one pipeline run at a time.
///
/// A recorder owns at most one mutable trace: `start_trace` opens it,
/// `add_step` appends to it, `save` persists it through the configured
/// [`StorageAdapter`] and closes it. Starting a new trace before saving
/// discards the unsaved one. The recorder is a plain owned value, not a
/// process-wide singleton; construct one per recording session and share
/// nothing. Concurrent callers sharing one recorder would corrupt each
/// other's trace, so drive it from a single logical caller.
pub struct TraceRecorder {
    storage: Arc<dyn StorageAdapter>,
    current_trace: Option<Trace>,
    regression_mode: bool,
    step_structures: HashMap<String, Vec<String>>,
}

impl TraceRecorder {
    /// Creates a recorder backed by the given storage adapter.
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self {
            storage,
            current_trace: None,
            regression_mode: false,
            step_structures: HashMap::new(),
        }
    }

    /// Swaps the storage backend. Affects future saves and lookups only.
    pub fn set_storage(&mut self, storage: Arc<dyn StorageAdapter>) {
        self.storage = storage;
    }

    /// Returns the configured storage adapter.
    pub fn storage(&self) -> &Arc<dyn StorageAdapter> {
        &self.storage
    }

    /// Enables structural fingerprint tracking for recorded steps.
    pub fn enable_regression_mode(&mut self) {
        self.regression_mode = true;
    }

    /// Disables fingerprint tracking and clears accumulated fingerprints.
    pub fn disable_regression_mode(&mut self) {
        self.regression_mode = false;
        self.step_structures.clear();
    }

    /// Opens a new trace, discarding any unsaved one without persisting it.
    pub fn start_trace(&mut self, id: impl Into<String>, name: impl Into<String>) {
        let trace = Trace::new(id, name);
        if let Some(discarded) = self.current_trace.replace(trace) {
            tracing::debug!(
                trace_id = %discarded.id,
                steps = discarded.steps.len(),
                "Discarding unsaved trace"
            );
        }
    }

    /// Appends a step to the current trace.
    ///
    /// A failed step flips the whole trace to failure; later successes
    /// never flip it back. In regression mode the step's input and output
    /// fingerprints are recorded under `"<step>.input"` / `"<step>.output"`,
    /// overwriting earlier fingerprints for the same step name.
    pub fn add_step(&mut self, step_data: StepData) -> Result<(), RecorderError> {
        if self.current_trace.is_none() {
            return Err(RecorderError::NoActiveTrace);
        }

        if self.regression_mode {
            self.step_structures.insert(
                format!("{}.input", step_data.step_name),
                object_structure(&step_data.input),
            );
            self.step_structures.insert(
                format!("{}.output", step_data.step_name),
                object_structure(&step_data.output),
            );
        }

        let step = Step {
            step_name: step_data.step_name,
            input: step_data.input,
            output: step_data.output,
            reasoning: step_data.reasoning,
            status: step_data.status,
            timestamp: Utc::now(),
        };

        let trace = self
            .current_trace
            .as_mut()
            .ok_or(RecorderError::NoActiveTrace)?;

        if step.status == StepStatus::Failure {
            trace.status = StepStatus::Failure;
        }

        trace.steps.push(step);
        Ok(())
    }

    /// Compares the current trace's step structures against a previously
    /// stored trace.
    ///
    /// Steps are matched across traces by name (first match in the previous
    /// trace wins); input and output are compared independently. With no
    /// current trace, or when the previous trace cannot be found, the
    /// result reports no regression. Change records follow the current
    /// trace's step order, input before output.
    pub async fn check_regression(&self, previous_trace_id: &str) -> RegressionResult {
        let Some(current) = &self.current_trace else {
            return RegressionResult::default();
        };
        let Some(previous) = self.storage.get_trace(previous_trace_id).await else {
            tracing::debug!(
                trace_id = previous_trace_id,
                "Previous trace not found, skipping regression check"
            );
            return RegressionResult::default();
        };

        let mut changes = Vec::new();

        for step in &current.steps {
            let Some(previous_step) = previous
                .steps
                .iter()
                .find(|s| s.step_name == step.step_name)
            else {
                continue;
            };

            let fields = [
                (ChangeField::Input, &previous_step.input, &step.input),
                (ChangeField::Output, &previous_step.output, &step.output),
            ];

            for (field, previous_map, current_map) in fields {
                let previous_structure = object_structure(previous_map);
                let current_structure = object_structure(current_map);
                let (added_keys, removed_keys) =
                    diff_structures(&previous_structure, &current_structure);

                if added_keys.is_empty() && removed_keys.is_empty() {
                    continue;
                }

                changes.push(StructureChange {
                    step_name: step.step_name.clone(),
                    field,
                    previous_structure,
                    current_structure,
                    added_keys,
                    removed_keys,
                });
            }
        }

        RegressionResult {
            has_regression: !changes.is_empty(),
            changes,
        }
    }

    /// Persists the current trace and closes it.
    ///
    /// A trace can be saved exactly once; a second save without an
    /// intervening `start_trace` fails with [`RecorderError::NoActiveTrace`].
    /// On a write failure the trace stays open, so the caller can inspect
    /// it or retry against a working backend.
    pub async fn save(&mut self) -> Result<(), RecorderError> {
        let trace = self
            .current_trace
            .clone()
            .ok_or(RecorderError::NoActiveTrace)?;
        let trace_id = trace.id.clone();

        self.storage.write_trace(trace).await?;

        // Cleared only once the write has landed.
        self.current_trace = None;
        tracing::info!(trace_id = %trace_id, "Trace saved");
        Ok(())
    }

    /// Overrides the current trace's status. No-op when no trace is open.
    pub fn set_trace_status(&mut self, status: StepStatus) {
        if let Some(trace) = self.current_trace.as_mut() {
            trace.status = status;
        }
    }

    /// Returns the trace currently being built, if any.
    pub fn current_trace(&self) -> Option<&Trace> {
        self.current_trace.as_ref()
    }

    /// Fingerprints recorded so far in regression mode, keyed
    /// `"<step>.input"` / `"<step>.output"`.
    pub fn step_fingerprints(&self) -> &HashMap<String, Vec<String>> {
        &self.step_structures
    }
}
