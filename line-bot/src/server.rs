//! HTTP surface: the webhook route and a health check.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use dispatch_engine::DispatchEngine;
use tracing::info;

use crate::line::SIGNATURE_HEADER;

/// Builds the router: `POST {webhook_path}` feeds the engine, `GET /health` answers 200.
pub fn router(engine: Arc<DispatchEngine>, webhook_path: &str) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(webhook_path, post(webhook))
        .with_state(engine)
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn webhook(
    State(engine): State<Arc<DispatchEngine>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let status = engine.handle_delivery(signature, &body).await;
    info!(status = status.as_u16(), body_len = body.len(), "webhook handled");
    status
}
