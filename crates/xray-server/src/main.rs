mod error;
mod handlers;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use xray_sdk::{FileStorageAdapter, StorageAdapter};

pub struct ServerState {
    pub storage: Arc<dyn StorageAdapter>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .compact()
        .init();

    let data_path =
        env::var("XRAY_DATA_PATH").unwrap_or_else(|_| "data/traces.json".to_string());
    let storage: Arc<dyn StorageAdapter> = Arc::new(FileStorageAdapter::new(&data_path));
    if !storage.is_available().await {
        tracing::warn!("Storage at {} is not writable", data_path);
    }

    let state = Arc::new(ServerState { storage });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let app = Router::new()
        .route("/api/traces", get(handlers::traces::list))
        .route(
            "/api/traces/{id}",
            get(handlers::traces::get).delete(handlers::traces::delete),
        )
        .layer(trace_layer)
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state);

    let addr = env::var("XRAY_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    info!("Serving traces from {} on {}", data_path, addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
