// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Service configuration
//!
//! Domain constants are fixed at compile time (the category set, the
//! confidence threshold, retrieval depth, truncation bounds). Everything
//! operational (ports, file paths, GPU layers) is read from environment
//! variables with defaults, the same variables the deployment scripts set.

use std::env;
use std::path::PathBuf;

/// Minimum classifier confidence; below this the category falls back to General.
pub const CONFIDENCE_THRESHOLD: f32 = 0.3;

/// Hypothesis template for zero-shot classification. `{}` is replaced with
/// the candidate topic phrase.
pub const HYPOTHESIS_TEMPLATE: &str = "This email is about {}.";

/// Number of context snippets retrieved per reply request.
pub const TOP_K: usize = 3;

/// Maximum characters of email body passed to the classifier.
pub const CATEGORIZE_BODY_LIMIT: usize = 1000;

/// Maximum characters of email body embedded as the retrieval query.
/// The full body still goes into the generation prompt.
pub const REPLY_QUERY_LIMIT: usize = 2000;

/// Canned reply when the generator declines to draft one.
pub const NO_SUGGESTION_REPLY: &str = "No suggestion available for this email.";

/// Canned reply when the context store never initialized.
pub const RAG_UNAVAILABLE_REPLY: &str = "Error: Vector DB not initialized. Check 'context.txt'.";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_port: u16,
    pub context_file: PathBuf,
    pub classifier_model_path: PathBuf,
    pub classifier_tokenizer_path: PathBuf,
    pub embedding_model_path: PathBuf,
    pub embedding_tokenizer_path: PathBuf,
    pub generator_model_path: PathBuf,
    pub gpu_layers: usize,
    pub max_reply_tokens: usize,
    pub generator_context_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: 8080,
            context_file: PathBuf::from("context.txt"),
            classifier_model_path: PathBuf::from("./models/nli-deberta-v3-base-onnx/model.onnx"),
            classifier_tokenizer_path: PathBuf::from(
                "./models/nli-deberta-v3-base-onnx/tokenizer.json",
            ),
            embedding_model_path: PathBuf::from("./models/all-MiniLM-L12-v2-onnx/model.onnx"),
            embedding_tokenizer_path: PathBuf::from(
                "./models/all-MiniLM-L12-v2-onnx/tokenizer.json",
            ),
            generator_model_path: PathBuf::from("./models/flan-t5-large.q8_0.gguf"),
            gpu_layers: 35,
            max_reply_tokens: 180,
            generator_context_size: 4096,
        }
    }
}

impl AppConfig {
    /// Builds the config from environment variables, falling back to the
    /// defaults above for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_port: env_parse("API_PORT", defaults.api_port),
            context_file: env_path("CONTEXT_FILE", defaults.context_file),
            classifier_model_path: env_path("CLASSIFIER_MODEL_PATH", defaults.classifier_model_path),
            classifier_tokenizer_path: env_path(
                "CLASSIFIER_TOKENIZER_PATH",
                defaults.classifier_tokenizer_path,
            ),
            embedding_model_path: env_path("EMBEDDING_MODEL_PATH", defaults.embedding_model_path),
            embedding_tokenizer_path: env_path(
                "EMBEDDING_TOKENIZER_PATH",
                defaults.embedding_tokenizer_path,
            ),
            generator_model_path: env_path("GENERATOR_MODEL_PATH", defaults.generator_model_path),
            gpu_layers: env_parse("GPU_LAYERS", defaults.gpu_layers),
            max_reply_tokens: env_parse("MAX_REPLY_TOKENS", defaults.max_reply_tokens),
            generator_context_size: env_parse(
                "GENERATOR_CONTEXT_SIZE",
                defaults.generator_context_size,
            ),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.api_port)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_path(key: &str, default: PathBuf) -> PathBuf {
    env::var(key).map(PathBuf::from).unwrap_or(default)
}
