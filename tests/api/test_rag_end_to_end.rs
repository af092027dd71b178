// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Full-pipeline test against real model files.
//!
//! Needs the ONNX embedder and a GGUF generator on disk at the default
//! paths, so everything here is #[ignore]d; run explicitly with
//! `cargo test -- --ignored` on a machine with models downloaded.

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use email_ai_node::api::{build_router, AppState};
use email_ai_node::classifier::NliZeroShotClassifier;
use email_ai_node::embeddings::SentenceEncoder;
use email_ai_node::generation::{GeneratorConfig, LlamaReplyGenerator};
use email_ai_node::rag::ContextStore;

const CLASSIFIER_MODEL: &str = "./models/nli-deberta-v3-base-onnx/model.onnx";
const CLASSIFIER_TOKENIZER: &str = "./models/nli-deberta-v3-base-onnx/tokenizer.json";
const EMBEDDING_MODEL: &str = "./models/all-MiniLM-L12-v2-onnx/model.onnx";
const EMBEDDING_TOKENIZER: &str = "./models/all-MiniLM-L12-v2-onnx/tokenizer.json";
const GENERATOR_MODEL: &str = "./models/flan-t5-large.q8_0.gguf";

async fn real_state(context_lines: &str) -> (AppState, tempfile::NamedTempFile) {
    let classifier = NliZeroShotClassifier::new(CLASSIFIER_MODEL, CLASSIFIER_TOKENIZER)
        .await
        .unwrap();
    let encoder = SentenceEncoder::new(EMBEDDING_MODEL, EMBEDDING_TOKENIZER)
        .await
        .unwrap();
    let generator = LlamaReplyGenerator::load(GeneratorConfig {
        model_path: GENERATOR_MODEL.into(),
        gpu_layers: 0,
        ..Default::default()
    })
    .unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(context_lines.as_bytes()).unwrap();
    let store = ContextStore::load(file.path(), &encoder).await.unwrap();

    let state = AppState {
        classifier: Arc::new(classifier),
        encoder: Arc::new(encoder),
        context_store: Arc::new(store),
        generator: Arc::new(generator),
    };
    (state, file)
}

async fn post_json(router: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_meeting_request_reply_references_booking_link() {
    let (state, _file) = real_state("Book a call here: https://example.com/cal\n").await;
    let router = build_router(state);

    let (status, body) = post_json(
        router,
        "/suggest-reply",
        json!({"body": "Can we schedule a meeting?"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let reply = body["reply"].as_str().unwrap();
    assert!(
        reply.contains("https://example.com/cal"),
        "reply should reference the booking link, got: {}",
        reply
    );
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_meeting_email_categorized_as_meeting_booked() {
    let (state, _file) = real_state("Book a call here: https://example.com/cal\n").await;
    let router = build_router(state);

    let (status, body) = post_json(
        router,
        "/categorize",
        json!({
            "subject": "Meeting confirmed",
            "body": "Great, I booked us in for Tuesday at 10am."
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "Meeting Booked");
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
}
