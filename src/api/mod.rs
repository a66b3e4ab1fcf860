//! HTTP API.
//!
//! Route map:
//!   GET  /api/ebay?q=<term>   listings (always 200)
//!   *    /api/ebay            405 for any other method, HEAD included
//!   GET  /health
use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::Listing;
use crate::pipeline::Pipeline;

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/ebay",
            get(listings_handler)
                .head(method_not_allowed_handler)
                .fallback(method_not_allowed_handler),
        )
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(state: AppState, bind_addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

async fn listings_handler(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Json<Vec<Listing>> {
    // A malformed query string degrades to the default term, never a 400.
    let params = params.map(|Query(p)| p).unwrap_or_else(|e| {
        warn!("Ignoring unparsable query string: {}", e);
        SearchParams::default()
    });

    let query = state.pipeline.resolve_query(params.q.as_deref());
    info!("Fetching listings for query: {:?}", query);

    let outcome = state.pipeline.search(query).await;
    Json(outcome.listings)
}

async fn method_not_allowed_handler() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
