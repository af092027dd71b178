// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Retrieval pipeline exercised through the public API with the
//! deterministic hashing encoder (no model files required).

use std::io::Write;

use email_ai_node::embeddings::{HashingEncoder, TextEncoder};
use email_ai_node::rag::{ContextStore, FlatVectorIndex, RagError};

const DIMENSION: usize = 64;

fn context_file(lines: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(lines.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_retrieval_never_exceeds_top_k() {
    let lines: Vec<String> = (0..25).map(|i| format!("context snippet {}", i)).collect();
    let file = context_file(&lines.join("\n"));
    let encoder = HashingEncoder::new(DIMENSION);
    let store = ContextStore::load(file.path(), &encoder).await.unwrap();

    for query_text in ["context snippet 7", "something unrelated entirely"] {
        let query = encoder.encode(query_text).await.unwrap();
        let retrieved = store.retrieve(&query).unwrap();
        assert!(retrieved.len() <= 3);
        // Every retrieved string must be a loaded snippet, never synthetic.
        for snippet in &retrieved {
            assert!(lines.contains(snippet));
        }
    }
}

#[tokio::test]
async fn test_fewer_snippets_than_top_k() {
    let file = context_file("solitary line\n");
    let encoder = HashingEncoder::new(DIMENSION);
    let store = ContextStore::load(file.path(), &encoder).await.unwrap();

    let query = encoder.encode("whatever").await.unwrap();
    let retrieved = store.retrieve(&query).unwrap();
    assert_eq!(retrieved, vec!["solitary line".to_string()]);
}

#[tokio::test]
async fn test_exact_match_ranks_first() {
    let file = context_file("first entry\nsecond entry\nthird entry\nfourth entry\n");
    let encoder = HashingEncoder::new(DIMENSION);
    let store = ContextStore::load(file.path(), &encoder).await.unwrap();

    let query = encoder.encode("third entry").await.unwrap();
    let retrieved = store.retrieve(&query).unwrap();
    assert_eq!(retrieved[0], "third entry");
}

#[tokio::test]
async fn test_uninitialized_store_reports_not_initialized() {
    let encoder = HashingEncoder::new(DIMENSION);
    let store = ContextStore::load(std::path::Path::new("/nonexistent/nope.txt"), &encoder)
        .await
        .unwrap();

    let query = encoder.encode("anything").await.unwrap();
    assert!(matches!(
        store.retrieve(&query),
        Err(RagError::NotInitialized)
    ));
}

#[test]
fn test_flat_index_search_is_exact_over_known_vectors() {
    let index = FlatVectorIndex::build(vec![
        vec![0.0, 0.0, 0.0],
        vec![10.0, 0.0, 0.0],
        vec![0.1, 0.1, 0.0],
        vec![3.0, 3.0, 3.0],
    ])
    .unwrap();

    let hits = index.search(&[0.0, 0.0, 0.0], 2).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].index, 0);
    assert_eq!(hits[1].index, 2);
    assert!(hits[0].distance <= hits[1].distance);
}
