// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /suggest-reply HTTP handler
//!
//! Retrieve → augment → generate. The retrieval query is the truncated
//! body; the generation prompt embeds the untruncated body.

use axum::extract::{Json, State};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::suggest_reply::{SuggestReplyRequest, SuggestReplyResponse};
use crate::api::{ApiFailure, AppState};
use crate::config::REPLY_QUERY_LIMIT;
use crate::rag::build_reply_prompt;
use crate::utils::truncate_chars;

pub async fn suggest_reply_handler(
    State(state): State<AppState>,
    Json(request): Json<SuggestReplyRequest>,
) -> Result<Json<SuggestReplyResponse>, ApiFailure> {
    let request_id = Uuid::new_v4();

    if let Some(hint) = &request.category {
        debug!("[rag] {} category hint '{}' (unused)", request_id, hint);
    }

    // Without an index there is nothing to ground on; short-circuit before
    // touching any model.
    if !state.context_store.is_initialized() {
        warn!("[rag] {} vector index not initialized (missing context)", request_id);
        return Ok(Json(SuggestReplyResponse::rag_unavailable()));
    }

    let query = truncate_chars(&request.body, REPLY_QUERY_LIMIT);

    let query_vector = state
        .encoder
        .encode(query)
        .await
        .map_err(|e| ApiFailure::new(e, request_id))?;

    let snippets = state
        .context_store
        .retrieve(&query_vector)
        .map_err(|e| ApiFailure::new(e, request_id))?;

    info!("[rag] {} retrieved {} context snippets", request_id, snippets.len());

    let prompt = build_reply_prompt(&snippets, &request.body);

    let reply = state
        .generator
        .generate(&prompt)
        .await
        .map_err(|e| ApiFailure::new(e, request_id))?;

    info!("[rag] {} reply generated: {}", request_id, reply);

    Ok(Json(SuggestReplyResponse::from_generated(reply)))
}
