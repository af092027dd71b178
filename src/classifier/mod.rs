// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Zero-shot email intent classification.
//!
//! The classifier is an NLI cross-encoder: each candidate category becomes a
//! templated hypothesis ("This email is about {topic}.") scored for
//! entailment against the email text. The winning hypothesis and its score
//! come back as a [`Classification`]; the confidence threshold policy lives
//! in [`resolve_category`] so the fallback is a single guarded branch.

mod category;
mod nli;

pub use category::EmailCategory;
pub use nli::NliZeroShotClassifier;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::CONFIDENCE_THRESHOLD;

/// Winning hypothesis and its calibrated score.
///
/// The score is the classifier's own calibration, trusted as given; nothing
/// downstream recomputes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub category: EmailCategory,
    pub score: f32,
}

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("tokenization failed: {0}")]
    Tokenization(String),

    #[error("classifier inference failed: {0}")]
    Inference(String),

    #[error("classifier output malformed: {0}")]
    MalformedOutput(String),
}

#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    /// Scores the text against all six candidate hypotheses and returns the
    /// highest-scoring one.
    async fn classify(&self, text: &str) -> Result<Classification, ClassifyError>;
}

/// Applies the confidence threshold: below it, the winner is discarded and
/// the category falls back to General regardless of which hypothesis won.
pub fn resolve_category(classification: Classification) -> EmailCategory {
    if classification.score >= CONFIDENCE_THRESHOLD {
        classification.category
    } else {
        EmailCategory::General
    }
}
