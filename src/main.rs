// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use email_ai_node::{
    api::{start_server, AppState},
    classifier::NliZeroShotClassifier,
    config::AppConfig,
    embeddings::SentenceEncoder,
    generation::{GeneratorConfig, LlamaReplyGenerator},
    models::fetch::{self, ensure_model_file},
    rag::ContextStore,
};
use std::{env, sync::Arc};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting Email AI Node...\n");

    let config = AppConfig::from_env();

    // ========================================================================
    // Model loading (on startup)
    // ========================================================================
    println!("🧠 Loading models (CUDA if available, CPU fallback)...");

    let classifier_model =
        ensure_model_file(&config.classifier_model_path, &fetch::CLASSIFIER_MODEL).await?;
    let classifier_tokenizer = ensure_model_file(
        &config.classifier_tokenizer_path,
        &fetch::CLASSIFIER_TOKENIZER,
    )
    .await?;
    let classifier = NliZeroShotClassifier::new(&classifier_model, &classifier_tokenizer).await?;
    println!("✅ Categorization model loaded");

    let embedding_model =
        ensure_model_file(&config.embedding_model_path, &fetch::EMBEDDING_MODEL).await?;
    let embedding_tokenizer = ensure_model_file(
        &config.embedding_tokenizer_path,
        &fetch::EMBEDDING_TOKENIZER,
    )
    .await?;
    let encoder = SentenceEncoder::new(&embedding_model, &embedding_tokenizer).await?;
    println!("✅ Embedding model loaded");

    let generator_model =
        ensure_model_file(&config.generator_model_path, &fetch::GENERATOR_MODEL).await?;
    let generator = LlamaReplyGenerator::load(GeneratorConfig {
        model_path: generator_model,
        context_size: config.generator_context_size,
        gpu_layers: config.gpu_layers,
        max_output_tokens: config.max_reply_tokens,
        ..Default::default()
    })?;
    println!("✅ Text generation model loaded");

    // ========================================================================
    // Context ingestion (on startup)
    // ========================================================================
    let context_store = ContextStore::load(&config.context_file, &encoder).await?;
    if context_store.is_initialized() {
        println!(
            "✅ Vector index built in memory ({} context snippets)",
            context_store.snippet_count()
        );
    } else {
        println!(
            "⚠️  Context file '{}' missing or empty - reply suggestions degraded",
            config.context_file.display()
        );
    }

    let state = AppState {
        classifier: Arc::new(classifier),
        encoder: Arc::new(encoder),
        context_store: Arc::new(context_store),
        generator: Arc::new(generator),
    };

    let listen_addr = config.listen_addr();
    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!("🎉 Email AI Node is ready!");
    println!("{}", separator);
    println!("API Port:       {}", config.api_port);
    println!("Context file:   {}", config.context_file.display());
    println!("\nAPI Endpoints:");
    println!("  Health:       http://localhost:{}/health", config.api_port);
    println!(
        "  Categorize:   POST http://localhost:{}/categorize",
        config.api_port
    );
    println!(
        "  Suggest:      POST http://localhost:{}/suggest-reply",
        config.api_port
    );
    println!("\nTest with curl:");
    println!(
        "  curl -X POST http://localhost:{}/categorize \\",
        config.api_port
    );
    println!("    -H 'Content-Type: application/json' \\");
    println!("    -d '{{\"subject\": \"Quick call?\", \"body\": \"Can we schedule a meeting?\"}}'");
    println!("\nPress Ctrl+C to shutdown...");
    println!("{}\n", separator);

    let server = tokio::spawn(async move {
        if let Err(e) = start_server(state, &listen_addr).await {
            eprintln!("❌ API server error: {}", e);
        }
    });

    // Wait for shutdown signal
    signal::ctrl_c().await?;

    println!("\n⏹️  Shutting down...");
    server.abort();

    println!("👋 Goodbye!");
    Ok(())
}
