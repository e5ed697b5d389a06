//! HTTP server
//!
//! - `GET /` triggers a scan and answers with the number of PRs being processed
//! - `GET /?wait=true` waits for every PR and answers with per-PR messages
//! - `GET /health` reports liveness

use crate::error::{Error, Result};
use crate::review::{Coordinator, PrOutcome};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Server state shared across handlers
pub struct ServerState {
    /// Coordinator that runs the scans
    pub coordinator: Coordinator,
}

/// Reply body for the trigger endpoint
///
/// The variant is chosen by the handler, never inferred from the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `{"message": "..."}`
    SingleMessage(String),
    /// `{"messages": ["...", ...]}`
    MessageList(Vec<String>),
}

#[derive(Serialize)]
struct SingleBody<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct ListBody<'a> {
    messages: &'a [String],
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match &self {
            Self::SingleMessage(message) => Json(SingleBody { message }).into_response(),
            Self::MessageList(messages) => Json(ListBody { messages }).into_response(),
        }
    }
}

/// Error surfaced to HTTP callers
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "scan failed");
        (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

/// Query parameters for the trigger endpoint
#[derive(Debug, Default, Deserialize)]
pub struct TriggerParams {
    /// Wait for all PRs and return their outcomes
    #[serde(default)]
    pub wait: bool,
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// Build the HTTP router
pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(trigger_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server
pub async fn run_server(state: Arc<ServerState>, addr: &str) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("peer-review-bot listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn trigger_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<TriggerParams>,
) -> std::result::Result<Reply, ApiError> {
    let handle = state.coordinator.scan().await?;

    if !params.wait {
        let message = handle.message();
        handle.detach();
        return Ok(Reply::SingleMessage(message));
    }

    let mut outcomes = handle.join_all().await;
    outcomes.sort_by_key(PrOutcome::pr_number);
    let messages = outcomes.iter().flat_map(|o| o.messages()).collect();
    Ok(Reply::MessageList(messages))
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        service: "peer-review-bot",
        version: env!("CARGO_PKG_VERSION"),
    })
}
