//! Trace data model shared by the recorder, storage adapters, and the
//! read-only HTTP surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status of a step or a whole trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Execution completed successfully.
    #[default]
    Success,
    /// Execution failed.
    Failure,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Success => "success",
            StepStatus::Failure => "failure",
        }
    }
}

/// One pipeline stage execution, as recorded inside a trace.
///
/// Steps are immutable once appended: the recorder only ever pushes new
/// steps, never edits or reorders existing ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Identifying label. Not required to be unique within a trace;
    /// cross-trace matching is by name (first match wins).
    pub step_name: String,
    /// Structured input to the stage.
    pub input: Map<String, Value>,
    /// Structured output of the stage.
    pub output: Map<String, Value>,
    /// Free-text explanation of what the stage did.
    pub reasoning: String,
    /// Outcome of this stage.
    pub status: StepStatus,
    /// When the step was recorded. Non-decreasing within a trace.
    pub timestamp: DateTime<Utc>,
}

/// Caller-supplied step payload; the recorder stamps the timestamp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepData {
    pub step_name: String,
    #[serde(default)]
    pub input: Map<String, Value>,
    #[serde(default)]
    pub output: Map<String, Value>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub status: StepStatus,
}

impl StepData {
    /// Creates a successful step payload with the given name.
    pub fn new(step_name: impl Into<String>) -> Self {
        Self {
            step_name: step_name.into(),
            ..Default::default()
        }
    }

    pub fn with_input(mut self, input: Map<String, Value>) -> Self {
        self.input = input;
        self
    }

    pub fn with_output(mut self, output: Map<String, Value>) -> Self {
        self.output = output;
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    pub fn with_status(mut self, status: StepStatus) -> Self {
        self.status = status;
        self
    }
}

/// One full pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Caller-supplied identifier. Uniqueness is the caller's
    /// responsibility; storage does not enforce it.
    pub id: String,
    /// Free-text label for display.
    pub name: String,
    /// When the trace was started.
    pub timestamp: DateTime<Utc>,
    /// Starts as success; flips permanently to failure the instant any
    /// contained step reports failure.
    pub status: StepStatus,
    /// Recorded steps, insertion order = recording order, append-only.
    pub steps: Vec<Step>,
}

impl Trace {
    /// Creates an empty successful trace stamped with the current time.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            timestamp: Utc::now(),
            status: StepStatus::Success,
            steps: Vec::new(),
        }
    }
}

/// The full persisted document: every stored trace, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TracesData {
    pub traces: Vec<Trace>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&StepStatus::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(
            serde_json::to_string(&StepStatus::Failure).unwrap(),
            "\"failure\""
        );
        assert_eq!(StepStatus::Failure.as_str(), "failure");
    }

    #[test]
    fn test_step_wire_field_names() {
        let step = Step {
            step_name: "Search".to_string(),
            input: json!({"q": "x"}).as_object().cloned().unwrap(),
            output: Map::new(),
            reasoning: "looked things up".to_string(),
            status: StepStatus::Success,
            timestamp: Utc::now(),
        };

        let value = serde_json::to_value(&step).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("stepName"));
        assert!(obj.contains_key("input"));
        assert!(obj.contains_key("output"));
        assert!(obj.contains_key("reasoning"));
        assert!(obj.contains_key("status"));
        // ISO-8601 timestamp string on the wire
        assert!(obj["timestamp"].is_string());
    }

    #[test]
    fn test_step_data_builder_defaults() {
        let data = StepData::new("Rank").with_reasoning("sorted by reviews");
        assert_eq!(data.status, StepStatus::Success);
        assert!(data.input.is_empty());
        assert!(data.output.is_empty());
        assert_eq!(data.reasoning, "sorted by reviews");
    }

    #[test]
    fn test_trace_round_trips_through_json() {
        let mut trace = Trace::new("t1", "Demo");
        trace.steps.push(Step {
            step_name: "Filter".to_string(),
            input: Map::new(),
            output: json!({"passed": 3}).as_object().cloned().unwrap(),
            reasoning: String::new(),
            status: StepStatus::Failure,
            timestamp: Utc::now(),
        });

        let encoded = serde_json::to_string(&trace).unwrap();
        let decoded: Trace = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, trace);
    }
}
