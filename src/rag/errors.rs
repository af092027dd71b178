// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for context loading and retrieval

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagError {
    /// Context file was absent or empty, so no vector index exists.
    #[error("vector index not initialized (context file missing or empty)")]
    NotInitialized,

    /// Vector dimensions don't match the index
    #[error("dimension mismatch: expected {expected}D, got {actual}D")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Vector contains NaN or infinite components
    #[error("invalid vector values: contains NaN or Infinity")]
    InvalidVector,

    /// Snippet count and vector count diverged during the build
    #[error("index misaligned: {snippets} snippets but {vectors} vectors")]
    Misaligned { snippets: usize, vectors: usize },

    /// Failed to embed context snippets at startup
    #[error("failed to embed context snippets: {0}")]
    Embedding(#[from] crate::embeddings::EmbedError),

    /// Generic I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
