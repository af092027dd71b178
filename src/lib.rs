// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod classifier;
pub mod config;
pub mod embeddings;
pub mod generation;
pub mod models;
pub mod rag;
pub mod utils;

// Re-export main types
pub use classifier::{Classification, ClassifyError, EmailCategory, ZeroShotClassifier};
pub use embeddings::{EmbedError, TextEncoder};
pub use generation::{GenerateError, ReplyGenerator};
pub use rag::{ContextStore, FlatVectorIndex, RagError};
