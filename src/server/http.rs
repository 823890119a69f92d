//! HTTP event ingestion
//!
//! One endpoint: `POST /` with a JSON event body. Normalization failures
//! answer 400 and are never dispatched; everything else answers 200 with an
//! empty object while the dispatch itself runs as a detached task, so a
//! slow plugin chain never holds the gateway's push connection open.
//! Requests are serviced concurrently by the runtime; nothing here takes a
//! lock around dispatch.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};

use crate::core::config::ServerSection;
use crate::event::api::normalize;
use crate::plugin::api::Dispatcher;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub command_prefix: Arc<str>,
}

/// Build the ingestion router (shared between production startup and tests).
pub fn build_router(state: AppState) -> Router {
    Router::new().route("/", post(ingest_handler)).with_state(state)
}

async fn ingest_handler(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    match normalize(&payload, &state.command_prefix) {
        Ok(event) => {
            let dispatcher = Arc::clone(&state.dispatcher);
            tokio::spawn(async move {
                dispatcher.dispatch(&event).await;
            });
            (StatusCode::OK, Json(json!({})))
        }
        Err(e) => {
            log::warn!("rejecting inbound event: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"status": "failed", "error": e.to_string()})),
            )
        }
    }
}

/// Bind the configured address and serve until ctrl-c.
pub async fn serve(config: &ServerSection, state: AppState) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("event server listening on http://{}/", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to install ctrl-c handler: {}", e);
        return;
    }
    log::info!("shutdown signal received");
}
