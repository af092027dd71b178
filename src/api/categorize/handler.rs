// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /categorize HTTP handler

use axum::extract::{Json, State};
use tracing::info;
use uuid::Uuid;

use crate::api::categorize::{CategorizeRequest, CategorizeResponse};
use crate::api::{ApiFailure, AppState};
use crate::classifier::resolve_category;
use crate::config::CATEGORIZE_BODY_LIMIT;
use crate::utils::truncate_chars;

/// Classifies an email into one of the six configured labels.
///
/// The body is truncated to [`CATEGORIZE_BODY_LIMIT`] characters before
/// classification to keep model input bounded; the subject is passed whole.
pub async fn categorize_handler(
    State(state): State<AppState>,
    Json(request): Json<CategorizeRequest>,
) -> Result<Json<CategorizeResponse>, ApiFailure> {
    let request_id = Uuid::new_v4();

    let body = truncate_chars(&request.body, CATEGORIZE_BODY_LIMIT);
    let text = format!("{} {}", request.subject, body);

    let classification = state
        .classifier
        .classify(&text)
        .await
        .map_err(|e| ApiFailure::new(e, request_id))?;

    let category = resolve_category(classification);

    info!(
        "[categorizer] {} '{}' -> {} (score: {:.2})",
        request_id, request.subject, category, classification.score
    );

    Ok(Json(CategorizeResponse::new(category, classification.score)))
}
