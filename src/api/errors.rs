// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::classifier::ClassifyError;
use crate::embeddings::EmbedError;
use crate::generation::GenerateError;
use crate::rag::RagError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    pub request_id: Option<String>,
}

/// Pipeline-stage errors surfaced by the API. Each stage keeps its own
/// variant so a caller can tell a classifier fault from a generator fault
/// without parsing messages.
#[derive(Debug)]
pub enum ApiError {
    Classifier(ClassifyError),
    Embedding(EmbedError),
    Retrieval(RagError),
    Generation(GenerateError),
    Internal(String),
}

impl ApiError {
    pub fn to_response(&self, request_id: Option<String>) -> ErrorResponse {
        let (error_type, message) = match self {
            ApiError::Classifier(e) => ("classifier_error", e.to_string()),
            ApiError::Embedding(e) => ("embedding_error", e.to_string()),
            ApiError::Retrieval(e) => ("retrieval_error", e.to_string()),
            ApiError::Generation(e) => ("generation_error", e.to_string()),
            ApiError::Internal(msg) => ("internal_error", msg.clone()),
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            request_id,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Classifier(e) => write!(f, "Classifier error: {}", e),
            ApiError::Embedding(e) => write!(f, "Embedding error: {}", e),
            ApiError::Retrieval(e) => write!(f, "Retrieval error: {}", e),
            ApiError::Generation(e) => write!(f, "Generation error: {}", e),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ClassifyError> for ApiError {
    fn from(e: ClassifyError) -> Self {
        ApiError::Classifier(e)
    }
}

impl From<EmbedError> for ApiError {
    fn from(e: EmbedError) -> Self {
        ApiError::Embedding(e)
    }
}

impl From<RagError> for ApiError {
    fn from(e: RagError) -> Self {
        ApiError::Retrieval(e)
    }
}

impl From<GenerateError> for ApiError {
    fn from(e: GenerateError) -> Self {
        ApiError::Generation(e)
    }
}

/// Error + the request id it occurred under, ready to render as a response.
#[derive(Debug)]
pub struct ApiFailure {
    pub error: ApiError,
    pub request_id: Uuid,
}

impl ApiFailure {
    pub fn new(error: impl Into<ApiError>, request_id: Uuid) -> Self {
        Self {
            error: error.into(),
            request_id,
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = self.error.to_response(Some(self.request_id.to_string()));
        (status, axum::response::Json(body)).into_response()
    }
}
