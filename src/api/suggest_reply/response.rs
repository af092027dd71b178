// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! SuggestReplyResponse type for POST /suggest-reply

use serde::{Deserialize, Serialize};

use crate::config::{NO_SUGGESTION_REPLY, RAG_UNAVAILABLE_REPLY};

/// Response body for POST /suggest-reply
///
/// # Example
/// ```json
/// {
///   "reply": "Happy to meet — you can book a slot here: https://example.com/cal"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestReplyResponse {
    pub reply: String,
}

impl SuggestReplyResponse {
    /// Wraps raw generator output, applying the no-suggestion policy: any
    /// case-insensitive occurrence of "no suggestion" replaces the whole
    /// draft with the canned message.
    pub fn from_generated(raw: String) -> Self {
        if raw.to_lowercase().contains("no suggestion") {
            Self {
                reply: NO_SUGGESTION_REPLY.to_string(),
            }
        } else {
            Self { reply: raw }
        }
    }

    /// Fixed response when the vector index never initialized.
    pub fn rag_unavailable() -> Self {
        Self {
            reply: RAG_UNAVAILABLE_REPLY.to_string(),
        }
    }
}
