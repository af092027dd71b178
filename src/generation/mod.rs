// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Reply text generation.

mod engine;

pub use engine::{GeneratorConfig, LlamaReplyGenerator};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("failed to tokenize prompt: {0}")]
    Tokenization(String),

    #[error("prompt too long: {prompt_tokens} tokens with {max_output} output budget exceeds {context_size} context")]
    PromptTooLong {
        prompt_tokens: usize,
        max_output: usize,
        context_size: usize,
    },

    #[error("generation failed: {0}")]
    Inference(String),
}

/// Single-shot text generator. One prompt in, one bounded completion out;
/// no streaming and no conversation state.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}
