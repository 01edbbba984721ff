//! HTTP trigger surface.
//!
//! Firing a batch returns an acknowledgement immediately; the batch runs as a
//! detached task and reports only through logs. The caller gets no completion
//! signal and no per-batch error status.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::batch::{ViewBatchConfig, WebhookBatchConfig, run_view_batch, run_webhook_batch};
use crate::sink::EventSink;

pub struct AppState {
    /// None when the queue session could not be established at startup; the
    /// triggers then acknowledge but skip the batch.
    pub sink: Option<Arc<EventSink>>,
    pub view_defaults: ViewBatchConfig,
    pub webhook_defaults: WebhookBatchConfig,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/testing/fill-view-queue", get(fill_view_queue))
        .route("/testing/fill-webhook-queue", get(fill_webhook_queue))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn fill_view_queue(State(state): State<Arc<AppState>>) -> Json<Value> {
    match &state.sink {
        Some(sink) => {
            info!("view batch triggered");
            let sink = sink.clone();
            let config = state.view_defaults.clone();
            tokio::spawn(async move {
                run_view_batch(sink, config).await;
            });
        }
        None => error!("queue publisher unavailable, view batch skipped"),
    }
    Json(json!({"message": "filling view queue started"}))
}

async fn fill_webhook_queue(State(state): State<Arc<AppState>>) -> Json<Value> {
    match &state.sink {
        Some(sink) => {
            info!("webhook batch triggered");
            let sink = sink.clone();
            let config = state.webhook_defaults.clone();
            tokio::spawn(async move {
                run_webhook_batch(sink, config).await;
            });
        }
        None => error!("queue publisher unavailable, webhook batch skipped"),
    }
    Json(json!({"message": "filling webhook queue started"}))
}
