// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

use super::categorize::categorize_handler;
use super::suggest_reply::suggest_reply_handler;
use super::AppState;

/// Builds the application router. Separate from `start_server` so tests can
/// drive the router without binding a socket.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Zero-shot email categorization
        .route("/categorize", post(categorize_handler))
        // RAG reply drafting
        .route("/suggest-reply", post(suggest_reply_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(
    state: AppState,
    listen_addr: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);

    let addr = listen_addr.parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::response::Json(json!({
        "status": "ok",
        "rag_enabled": state.context_store.is_initialized(),
        "context_snippets": state.context_store.snippet_count(),
        "embedding_dimension": state.encoder.dimension(),
    }))
}
