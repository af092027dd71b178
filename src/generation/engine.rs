// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! llama.cpp-backed generator.
//!
//! Loads one GGUF model at startup and keeps it resident. Each request gets
//! a fresh llama context; generation is a plain decode loop bounded by the
//! output-token budget and the model's EOS token.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use llama_cpp_2::{
    context::params::LlamaContextParams,
    llama_backend::LlamaBackend,
    llama_batch::LlamaBatch,
    model::{params::LlamaModelParams, AddBos, LlamaModel, Special},
    sampling::LlamaSampler,
};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::generation::{GenerateError, ReplyGenerator};

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub model_path: PathBuf,
    pub context_size: usize,
    pub gpu_layers: usize,
    pub batch_size: usize,
    pub max_output_tokens: usize,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./models/flan-t5-large.q8_0.gguf"),
            context_size: 4096,
            gpu_layers: 35,
            batch_size: 2048,
            max_output_tokens: 180,
            temperature: 0.7,
            top_p: 0.95,
        }
    }
}

/// Strips characters that break C string handling in llama.cpp: null bytes
/// terminate C strings early, and other C0 controls can corrupt
/// tokenization. Tab, newline and carriage return stay.
fn sanitize_prompt(prompt: &str) -> String {
    prompt
        .chars()
        .filter(|c| *c != '\0' && (*c >= ' ' || *c == '\t' || *c == '\n' || *c == '\r'))
        .collect()
}

struct ResidentModel {
    backend: LlamaBackend,
    model: LlamaModel,
}

/// GGUF generator behind llama-cpp-2.
///
/// # Thread Safety
/// llama contexts need exclusive access to the model, so the resident model
/// sits behind a `Mutex`; the lock is held for the duration of one
/// generation, serializing concurrent reply requests at the model.
#[derive(Clone)]
pub struct LlamaReplyGenerator {
    inner: Arc<Mutex<ResidentModel>>,
    config: GeneratorConfig,
}

impl std::fmt::Debug for LlamaReplyGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlamaReplyGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LlamaReplyGenerator {
    /// Initializes the llama backend and loads the GGUF model.
    pub fn load(config: GeneratorConfig) -> Result<Self> {
        if !config.model_path.exists() {
            anyhow::bail!(
                "Generator model file not found: {}",
                config.model_path.display()
            );
        }

        let backend =
            LlamaBackend::init().map_err(|e| anyhow!("Failed to initialize backend: {:?}", e))?;

        let model_params =
            LlamaModelParams::default().with_n_gpu_layers(config.gpu_layers as u32);

        let model = LlamaModel::load_from_file(&backend, &config.model_path, &model_params)
            .map_err(|e| anyhow!("Failed to load model: {:?}", e))?;

        info!(
            "Generator model loaded: {} (context {}, {} GPU layers)",
            config.model_path.display(),
            config.context_size,
            config.gpu_layers
        );

        Ok(Self {
            inner: Arc::new(Mutex::new(ResidentModel { backend, model })),
            config,
        })
    }

    fn run(&self, prompt: &str) -> Result<String, GenerateError> {
        let sanitized = sanitize_prompt(prompt);
        if sanitized.len() != prompt.len() {
            warn!(
                "Sanitized prompt: removed {} problematic bytes",
                prompt.len() - sanitized.len()
            );
        }

        let resident = self
            .inner
            .lock()
            .map_err(|_| GenerateError::Inference("generator model poisoned".to_string()))?;

        let prompt_tokens = resident
            .model
            .str_to_token(&sanitized, AddBos::Always)
            .map_err(|e| GenerateError::Tokenization(format!("{:?}", e)))?;

        if prompt_tokens.len() + self.config.max_output_tokens > self.config.context_size {
            return Err(GenerateError::PromptTooLong {
                prompt_tokens: prompt_tokens.len(),
                max_output: self.config.max_output_tokens,
                context_size: self.config.context_size,
            });
        }

        let ctx_params = LlamaContextParams::default()
            .with_n_ctx(NonZeroU32::new(self.config.context_size as u32))
            .with_n_batch(self.config.batch_size as u32);

        let mut context = resident
            .model
            .new_context(&resident.backend, ctx_params)
            .map_err(|e| GenerateError::Inference(format!("failed to create context: {:?}", e)))?;

        let mut batch = LlamaBatch::new(self.config.batch_size, 1);

        for (i, &token) in prompt_tokens.iter().enumerate() {
            let is_last = i == prompt_tokens.len() - 1;
            batch
                .add(token, i as i32, &[0], is_last)
                .map_err(|e| GenerateError::Inference(format!("batch add failed: {:?}", e)))?;
        }

        context
            .decode(&mut batch)
            .map_err(|e| GenerateError::Inference(format!("prompt decode failed: {:?}", e)))?;

        let eos_token = resident.model.token_eos();
        let mut output = String::new();
        let mut n_cur = prompt_tokens.len();
        let limit = prompt_tokens.len() + self.config.max_output_tokens;

        while n_cur < limit {
            let mut sampler = LlamaSampler::chain_simple([
                LlamaSampler::temp(self.config.temperature),
                LlamaSampler::top_p(self.config.top_p, 1),
                LlamaSampler::greedy(),
            ]);

            let new_token = sampler.sample(&context, -1);

            if new_token == eos_token {
                break;
            }

            // Invalid UTF-8 pieces are dropped from the output, but the
            // token must still advance the model state or the loop stalls.
            match resident.model.token_to_str(new_token, Special::Plaintext) {
                Ok(piece) => output.push_str(&piece),
                Err(_) => {
                    debug!("Skipping invalid UTF-8 token {:?}", new_token);
                }
            }

            batch.clear();
            batch
                .add(new_token, n_cur as i32, &[0], true)
                .map_err(|e| GenerateError::Inference(format!("batch add failed: {:?}", e)))?;
            context
                .decode(&mut batch)
                .map_err(|e| GenerateError::Inference(format!("decode failed: {:?}", e)))?;

            n_cur += 1;
        }

        Ok(output.trim().to_string())
    }
}

#[async_trait]
impl ReplyGenerator for LlamaReplyGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.run(prompt)
    }
}
