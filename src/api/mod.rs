// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! HTTP API: routing, shared application state, endpoint handlers.

pub mod categorize;
pub mod errors;
pub mod http_server;
pub mod suggest_reply;

pub use errors::{ApiError, ApiFailure, ErrorResponse};
pub use http_server::{build_router, start_server};

use std::sync::Arc;

use crate::classifier::ZeroShotClassifier;
use crate::embeddings::TextEncoder;
use crate::generation::ReplyGenerator;
use crate::rag::ContextStore;

/// Services shared across requests. Everything is constructed once at
/// startup and immutable afterward; handlers only clone Arcs.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn ZeroShotClassifier>,
    pub encoder: Arc<dyn TextEncoder>,
    pub context_store: Arc<ContextStore>,
    pub generator: Arc<dyn ReplyGenerator>,
}
