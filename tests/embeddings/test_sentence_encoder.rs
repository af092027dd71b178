// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Tests for the ONNX sentence encoder.
//!
//! Model-dependent tests only run when the ONNX files are on disk:
//! `cargo test -- --ignored`.

use email_ai_node::embeddings::{SentenceEncoder, TextEncoder};

const MODEL_PATH: &str = "./models/all-MiniLM-L12-v2-onnx/model.onnx";
const TOKENIZER_PATH: &str = "./models/all-MiniLM-L12-v2-onnx/tokenizer.json";

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_encode_dimension() {
    let encoder = SentenceEncoder::new(MODEL_PATH, TOKENIZER_PATH).await.unwrap();
    let vector = encoder.encode("hello world").await.unwrap();
    assert_eq!(vector.len(), 384);
    assert_eq!(encoder.dimension(), 384);
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_encode_batch_aligns_with_inputs() {
    let encoder = SentenceEncoder::new(MODEL_PATH, TOKENIZER_PATH).await.unwrap();
    let texts = vec![
        "short".to_string(),
        "a noticeably longer sentence that pads the batch".to_string(),
    ];
    let vectors = encoder.encode_batch(&texts).await.unwrap();
    assert_eq!(vectors.len(), 2);
    assert!(vectors.iter().all(|v| v.len() == 384));
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_similar_sentences_are_closer_than_dissimilar() {
    let encoder = SentenceEncoder::new(MODEL_PATH, TOKENIZER_PATH).await.unwrap();

    let a = encoder.encode("Can we schedule a meeting?").await.unwrap();
    let b = encoder.encode("Let's book a call next week.").await.unwrap();
    let c = encoder.encode("The warehouse inventory report is attached.").await.unwrap();

    let near = squared_l2(&a, &b);
    let far = squared_l2(&a, &c);
    assert!(near < far, "expected {} < {}", near, far);
}

#[tokio::test]
async fn test_missing_model_file_errors() {
    let result = SentenceEncoder::new("/nonexistent/model.onnx", "/nonexistent/tokenizer.json").await;
    assert!(result.is_err());
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
