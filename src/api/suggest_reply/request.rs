// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! SuggestReplyRequest type for POST /suggest-reply

use serde::{Deserialize, Serialize};

/// Request body for POST /suggest-reply
///
/// `category` is an optional hint some clients send alongside the body. It
/// is accepted and logged but does not influence retrieval or generation;
/// the field stays in the schema so those callers keep working.
///
/// # Example
/// ```json
/// {
///   "body": "Can we schedule a meeting next week?",
///   "category": "Meeting Booked"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestReplyRequest {
    pub body: String,

    #[serde(default)]
    pub category: Option<String>,
}
