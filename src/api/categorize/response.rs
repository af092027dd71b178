// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! CategorizeResponse type for POST /categorize

use serde::{Deserialize, Serialize};

use crate::classifier::EmailCategory;

/// Response body for POST /categorize
///
/// # Example
/// ```json
/// {
///   "category": "Meeting Booked",
///   "confidence": 0.874
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizeResponse {
    /// One of the six configured labels.
    pub category: String,
    /// Classifier score rounded to three decimals.
    pub confidence: f64,
}

impl CategorizeResponse {
    pub fn new(category: EmailCategory, score: f32) -> Self {
        Self {
            category: category.label().to_string(),
            confidence: round3(score),
        }
    }
}

fn round3(score: f32) -> f64 {
    (score as f64 * 1000.0).round() / 1000.0
}
