// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! CategorizeRequest type for POST /categorize

use serde::{Deserialize, Serialize};

/// Request body for POST /categorize
///
/// Both fields are required; a missing field is rejected by deserialization
/// before the handler runs.
///
/// # Example
/// ```json
/// {
///   "subject": "Re: pricing question",
///   "body": "Thanks for the deck, can you share seat pricing?"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizeRequest {
    pub subject: String,
    pub body: String,
}
