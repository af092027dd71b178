// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Context snippet store.
//!
//! Reads the newline-delimited context file once at startup, embeds each
//! non-empty line, and builds the flat index over the vectors. A missing or
//! empty file leaves the store uninitialized: the node still serves, the
//! reply endpoint degrades to a fixed message.

use std::path::Path;
use tracing::{info, warn};

use crate::config::TOP_K;
use crate::embeddings::TextEncoder;
use crate::rag::{FlatVectorIndex, RagError};

pub struct ContextStore {
    snippets: Vec<String>,
    index: Option<FlatVectorIndex>,
}

impl ContextStore {
    /// Loads the context file and builds the vector index.
    ///
    /// Degrades rather than fails: an absent or empty file returns an
    /// uninitialized store. Embedding or index-build failures are real
    /// errors and propagate.
    pub async fn load(path: &Path, encoder: &dyn TextEncoder) -> Result<Self, RagError> {
        if !path.exists() {
            warn!(
                "Context file '{}' not found. Reply suggestions will run without RAG grounding.",
                path.display()
            );
            return Ok(Self::uninitialized());
        }

        let contents = tokio::fs::read_to_string(path).await?;
        let snippets: Vec<String> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        if snippets.is_empty() {
            warn!(
                "Context file '{}' is empty. No RAG grounding available.",
                path.display()
            );
            return Ok(Self::uninitialized());
        }

        info!("Embedding {} context snippets...", snippets.len());
        let vectors = encoder.encode_batch(&snippets).await?;

        if vectors.len() != snippets.len() {
            return Err(RagError::Misaligned {
                snippets: snippets.len(),
                vectors: vectors.len(),
            });
        }

        let index = FlatVectorIndex::build(vectors)?;
        info!("Vector index built in memory ({} vectors)", index.len());

        Ok(Self {
            snippets,
            index: Some(index),
        })
    }

    fn uninitialized() -> Self {
        Self {
            snippets: Vec::new(),
            index: None,
        }
    }

    /// Whether the vector index was built at startup.
    pub fn is_initialized(&self) -> bool {
        self.index.is_some()
    }

    pub fn snippet_count(&self) -> usize {
        self.snippets.len()
    }

    /// Returns the text of the snippets nearest to `query`, at most
    /// [`TOP_K`]. Hit positions outside the snippet list are discarded
    /// rather than raised.
    pub fn retrieve(&self, query: &[f32]) -> Result<Vec<String>, RagError> {
        let index = self.index.as_ref().ok_or(RagError::NotInitialized)?;

        let neighbors = index.search(query, TOP_K)?;
        let retrieved: Vec<String> = neighbors
            .iter()
            .filter(|n| n.index < self.snippets.len())
            .map(|n| self.snippets[n.index].clone())
            .collect();

        Ok(retrieved)
    }
}

impl std::fmt::Debug for ContextStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextStore")
            .field("snippets", &self.snippets.len())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
