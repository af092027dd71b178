// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Router-level tests for POST /suggest-reply

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use email_ai_node::api::build_router;
use email_ai_node::classifier::{Classification, EmailCategory};

use super::stubs::{
    app_state, context_store, FailingGenerator, FixedClassifier, FixedGenerator,
    UnreachableGenerator,
};

fn any_classifier() -> Arc<FixedClassifier> {
    Arc::new(FixedClassifier::new(Classification {
        category: EmailCategory::General,
        score: 0.5,
    }))
}

async fn post_json(router: axum::Router, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/suggest-reply")
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
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_uninitialized_store_short_circuits_without_models() {
    let (store, _file) = context_store(None).await;
    // UnreachableGenerator panics if the handler gets past the precondition.
    let router = build_router(app_state(
        any_classifier(),
        store,
        Arc::new(UnreachableGenerator),
    ));

    let (status, body) = post_json(router, json!({"body": "anything at all"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["reply"],
        "Error: Vector DB not initialized. Check 'context.txt'."
    );
}

#[tokio::test]
async fn test_generated_reply_passes_through() {
    let (store, _file) = context_store(Some("Book a call here: https://example.com/cal\n")).await;
    let generator = Arc::new(FixedGenerator::new("Sure, happy to chat."));
    let router = build_router(app_state(any_classifier(), store, generator));

    let (status, body) = post_json(router, json!({"body": "Can we schedule a meeting?"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Sure, happy to chat.");
}

#[tokio::test]
async fn test_no_suggestion_marker_replaces_reply() {
    let (store, _file) = context_store(Some("line one\nline two\n")).await;

    for raw in ["No suggestion.", "no SUGGESTION whatsoever"] {
        let generator = Arc::new(FixedGenerator::new(raw));
        let router = build_router(app_state(any_classifier(), store.clone(), generator));

        let (status, body) = post_json(router, json!({"body": "newsletter blast"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "No suggestion available for this email.");
    }
}

#[tokio::test]
async fn test_prompt_embeds_retrieved_snippet_and_full_body() {
    let (store, _file) =
        context_store(Some("alpha line\nbeta line\ngamma line\ndelta line\n")).await;
    let generator = Arc::new(FixedGenerator::new("ok"));
    let router = build_router(app_state(any_classifier(), store, generator.clone()));

    // The hashing encoder maps identical text to the identical vector, so a
    // body equal to a snippet must retrieve that snippet. Padding pushes the
    // body past the 2000-char retrieval limit while staying in the prompt.
    let body = format!("beta line{}", " x".repeat(2000));
    let (status, _) = post_json(router, json!({"body": body})).await;
    assert_eq!(status, StatusCode::OK);

    let prompt = generator.seen.lock().unwrap().clone().unwrap();
    assert!(prompt.contains("- "), "prompt should list retrieved context");
    assert!(
        prompt.contains(&body),
        "prompt must embed the untruncated body"
    );
}

#[tokio::test]
async fn test_category_hint_accepted_and_ignored() {
    let (store, _file) = context_store(Some("only line\n")).await;
    let generator = Arc::new(FixedGenerator::new("drafted"));
    let router = build_router(app_state(any_classifier(), store, generator.clone()));

    let (status, body) = post_json(
        router,
        json!({"body": "hello", "category": "Meeting Booked"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "drafted");

    // Hint must not leak into the generation prompt.
    let prompt = generator.seen.lock().unwrap().clone().unwrap();
    assert!(!prompt.contains("Meeting Booked"));
}

#[tokio::test]
async fn test_generator_failure_names_the_stage() {
    let (store, _file) = context_store(Some("only line\n")).await;
    let router = build_router(app_state(
        any_classifier(),
        store,
        Arc::new(FailingGenerator),
    ));

    let (status, body) = post_json(router, json!({"body": "hello"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error_type"], "generation_error");
}

#[tokio::test]
async fn test_body_required() {
    let (store, _file) = context_store(Some("only line\n")).await;
    let router = build_router(app_state(
        any_classifier(),
        store,
        Arc::new(FixedGenerator::new("ok")),
    ));

    let (status, _) = post_json(router, json!({"category": "Spam"})).await;
    assert!(status.is_client_error());
}
