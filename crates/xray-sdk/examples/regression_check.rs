//! Regression-mode demo: record a baseline run, then a second run whose
//! Search output grew a key, and print the detected structural changes.
//!
//! Run with: cargo run --example regression_check

use std::sync::Arc;

use serde_json::{json, Map, Value};
use xray_sdk::{MemoryStorageAdapter, StepData, TraceRecorder};

fn obj(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut recorder = TraceRecorder::new(Arc::new(MemoryStorageAdapter::new()));
    recorder.enable_regression_mode();

    // Baseline run.
    recorder.start_trace("baseline", "Nightly Pipeline");
    recorder.add_step(
        StepData::new("Search")
            .with_input(obj(json!({"q": "water bottle"})))
            .with_output(obj(json!({"candidates": [{"asin": "B01", "price": 19.99}]}))),
    )?;
    recorder.save().await?;

    // Today's run: each candidate gained a "rating" field.
    recorder.start_trace("today", "Nightly Pipeline");
    recorder.add_step(
        StepData::new("Search")
            .with_input(obj(json!({"q": "water bottle"})))
            .with_output(obj(json!({
                "candidates": [{"asin": "B01", "price": 19.99, "rating": 4.6}],
            }))),
    )?;

    let result = recorder.check_regression("baseline").await;
    println!("regression detected: {}", result.has_regression);
    for change in &result.changes {
        println!(
            "  {} {:?}: added {:?}, removed {:?}",
            change.step_name, change.field, change.added_keys, change.removed_keys
        );
    }

    recorder.save().await?;
    Ok(())
}
