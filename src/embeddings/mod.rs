// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Sentence embeddings for RAG retrieval.

mod hashing;
mod sentence_encoder;

pub use hashing::HashingEncoder;
pub use sentence_encoder::SentenceEncoder;

use async_trait::async_trait;
use thiserror::Error;

/// Output dimension of the MiniLM-class sentence transformers this node runs.
pub const EMBEDDING_DIMENSION: usize = 384;

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("tokenization failed: {0}")]
    Tokenization(String),

    #[error("embedding inference failed: {0}")]
    Inference(String),

    #[error("unexpected embedding dimension: got {got}, expected {expected}")]
    Dimension { got: usize, expected: usize },
}

/// Text-to-vector encoder. The context store embeds snippets at startup and
/// query text per request through the same implementation so distances stay
/// comparable.
#[async_trait]
pub trait TextEncoder: Send + Sync {
    async fn encode(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;

    fn dimension(&self) -> usize;
}
