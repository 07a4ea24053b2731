//! Seeds demo traces for the competitor-selection pipeline.
//!
//! Run with: cargo run --example generate_traces
//!
//! Writes three runs to data/traces.json: one where every candidate passes
//! the filters, one where none do, and one mixed run.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use xray_sdk::{
    FileStorageAdapter, RecorderError, StepData, StepStatus, StorageAdapter, TraceRecorder,
};

fn obj(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn candidates(scenario: &str, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let (price, rating) = match scenario {
                // price >= 15 and rating >= 3.8 pass the filters
                "perfect" => (18.0 + 10.0 * i as f64, 4.0 + 0.2 * i as f64),
                "failure" => (6.0 + 2.0 * i as f64, 2.5 + 0.3 * i as f64),
                _ if i % 4 == 0 => (25.0 + 5.0 * i as f64, 4.2),
                _ => (9.0 + i as f64, 3.0),
            };
            json!({
                "asin": format!("B{:02}{}", i + 1, scenario.chars().next().unwrap_or('x').to_uppercase()),
                "price": price,
                "rating": (rating * 10.0_f64).round() / 10.0,
                "reviews": 120 * (i + 1),
                "title": format!("Product {} - {} scenario", i + 1, scenario),
            })
        })
        .collect()
}

async fn record_run(
    recorder: &mut TraceRecorder,
    id: &str,
    product: &str,
    scenario: &str,
) -> Result<(), RecorderError> {
    recorder.start_trace(id, format!("{product} ({scenario})"));

    let keywords = json!([
        product.to_lowercase(),
        format!("{} deals", product.to_lowercase()),
    ]);
    recorder.add_step(
        StepData::new("Keyword Generation")
            .with_input(obj(json!({"productName": product})))
            .with_output(obj(json!({"keywords": keywords})))
            .with_reasoning("Extracted searchable attributes from the product name"),
    )?;

    let found = candidates(scenario, 8);
    recorder.add_step(
        StepData::new("Search")
            .with_input(obj(json!({"keywords": keywords})))
            .with_output(obj(json!({"total_results": found.len(), "candidates": found})))
            .with_reasoning("Queried the catalog for each keyword and merged results"),
    )?;

    let passed: Vec<&Value> = found
        .iter()
        .filter(|c| c["price"].as_f64().unwrap_or(0.0) >= 15.0)
        .filter(|c| c["rating"].as_f64().unwrap_or(0.0) >= 3.8)
        .collect();
    let filter_status = if passed.is_empty() {
        StepStatus::Failure
    } else {
        StepStatus::Success
    };
    recorder.add_step(
        StepData::new("Filter")
            .with_input(obj(json!({
                "candidates_count": found.len(),
                "filters": {"min_price": 15, "min_rating": 3.8},
            })))
            .with_output(obj(json!({
                "passed": passed.len(),
                "failed": found.len() - passed.len(),
                "passedCandidates": passed,
            })))
            .with_reasoning("Dropped candidates below the price and rating thresholds")
            .with_status(filter_status),
    )?;

    if filter_status == StepStatus::Success {
        let mut ranked = passed.clone();
        ranked.sort_by_key(|c| std::cmp::Reverse(c["reviews"].as_u64().unwrap_or(0)));
        recorder.add_step(
            StepData::new("Rank")
                .with_input(obj(json!({"qualified_candidates": ranked.len()})))
                .with_output(obj(json!({"selected": ranked.first()})))
                .with_reasoning("Picked the qualified candidate with the most reviews"),
        )?;
    }

    recorder.save().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let storage = Arc::new(FileStorageAdapter::default());
    let mut recorder = TraceRecorder::new(storage.clone());

    record_run(
        &mut recorder,
        "trace-perfect",
        "Stainless Steel Water Bottle",
        "perfect",
    )
    .await?;
    record_run(
        &mut recorder,
        "trace-failure",
        "Wireless Bluetooth Earbuds",
        "failure",
    )
    .await?;
    record_run(&mut recorder, "trace-partial", "Yoga Mat", "partial").await?;

    let count = storage.read_traces().await.traces.len();
    println!("Wrote {} traces to {}", count, storage.path().display());

    Ok(())
}
