// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX sentence-transformer encoder
//!
//! Wraps an all-MiniLM-class model behind ONNX Runtime:
//! - BERT tokenization with batch padding
//! - attention-masked mean pooling over token embeddings
//! - 384-dimensional f32 output

use anyhow::{Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, Axis};
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::Tokenizer;
use tracing::info;

use crate::embeddings::{EmbedError, TextEncoder, EMBEDDING_DIMENSION};
use crate::models::load_onnx_session;

/// Sentence embedder over an ONNX export of a MiniLM sentence transformer.
///
/// The model emits token-level embeddings `[batch, seq_len, hidden]`; mean
/// pooling weighted by the attention mask produces one sentence vector per
/// input. Pooled vectors are not re-normalized; L2 distance over them is
/// what the retrieval index expects.
#[derive(Clone)]
pub struct SentenceEncoder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    dimension: usize,
}

impl std::fmt::Debug for SentenceEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEncoder")
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl SentenceEncoder {
    /// Loads the embedding model and tokenizer from disk.
    ///
    /// A validation inference confirms the hidden dimension before the
    /// encoder is handed to the context store; a mismatched export fails
    /// startup instead of producing unsearchable vectors.
    pub async fn new<P: AsRef<Path>>(model_path: P, tokenizer_path: P) -> Result<Self> {
        let tokenizer_path = tokenizer_path.as_ref();
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        let mut session = load_onnx_session(model_path.as_ref())?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        {
            let encoding = tokenizer
                .encode("validation test", true)
                .map_err(|e| anyhow::anyhow!("Tokenizer validation failed: {}", e))?;

            let len = encoding.get_ids().len();
            let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
            let attention_mask: Vec<i64> = encoding
                .get_attention_mask()
                .iter()
                .map(|&m| m as i64)
                .collect();
            let token_type_ids = vec![0i64; len];

            let outputs = session.run(ort::inputs![
                "input_ids" => Value::from_array(Array2::from_shape_vec((1, len), input_ids)?)?,
                "attention_mask" => Value::from_array(Array2::from_shape_vec((1, len), attention_mask)?)?,
                "token_type_ids" => Value::from_array(Array2::from_shape_vec((1, len), token_type_ids)?)?
            ])?;

            let output = outputs[0]
                .try_extract_array::<f32>()
                .context("Failed to extract validation output")?;
            let shape = output.shape();
            if shape.len() != 3 || shape[2] != EMBEDDING_DIMENSION {
                anyhow::bail!(
                    "Model outputs unexpected dimensions: {:?} (expected [batch, seq_len, {}])",
                    shape,
                    EMBEDDING_DIMENSION
                );
            }
        }

        info!("Sentence encoder loaded ({}D)", EMBEDDING_DIMENSION);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            dimension: EMBEDDING_DIMENSION,
        })
    }

    /// Tokenizes a batch, pads to the longest sequence, runs one inference,
    /// and mean-pools each row.
    fn run_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let encodings: Vec<_> = texts
            .iter()
            .map(|text| {
                self.tokenizer
                    .encode(text.as_str(), true)
                    .map_err(|e| EmbedError::Tokenization(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let batch = encodings.len();
        let max_len = encodings
            .iter()
            .map(|enc| enc.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut input_ids = Vec::with_capacity(batch * max_len);
        let mut attention_mask = Vec::with_capacity(batch * max_len);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let padding = max_len - ids.len();

            input_ids.extend(ids.iter().map(|&id| id as i64));
            attention_mask.extend(encoding.get_attention_mask().iter().map(|&m| m as i64));

            input_ids.extend(std::iter::repeat(0i64).take(padding));
            attention_mask.extend(std::iter::repeat(0i64).take(padding));
        }

        // Mask copy survives the move into the input tensor; pooling needs it.
        let mask_for_pooling = attention_mask.clone();
        let token_type_ids = vec![0i64; batch * max_len];

        let to_array = |data: Vec<i64>| {
            Array2::from_shape_vec((batch, max_len), data)
                .map_err(|e| EmbedError::Inference(e.to_string()))
        };
        let input_ids = to_array(input_ids)?;
        let attention_mask = to_array(attention_mask)?;
        let token_type_ids = to_array(token_type_ids)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| EmbedError::Inference("embedding session poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => Value::from_array(input_ids)
                    .map_err(|e| EmbedError::Inference(e.to_string()))?,
                "attention_mask" => Value::from_array(attention_mask)
                    .map_err(|e| EmbedError::Inference(e.to_string()))?,
                "token_type_ids" => Value::from_array(token_type_ids)
                    .map_err(|e| EmbedError::Inference(e.to_string()))?
            ])
            .map_err(|e| EmbedError::Inference(e.to_string()))?;

        let token_embeddings = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| EmbedError::Inference(e.to_string()))?;

        let mut embeddings = Vec::with_capacity(batch);

        for row in 0..batch {
            let item = token_embeddings.index_axis(Axis(0), row);
            let seq_len = item.shape()[0];
            let hidden = item.shape()[1];
            let mask = &mask_for_pooling[row * max_len..(row + 1) * max_len];

            let mut pooled = vec![0.0f32; hidden];
            let mut mask_sum = 0.0f32;

            for position in 0..seq_len {
                let weight = mask[position] as f32;
                mask_sum += weight;
                for dim in 0..hidden {
                    pooled[dim] += item[[position, dim]] * weight;
                }
            }

            for value in &mut pooled {
                *value /= mask_sum.max(1e-9);
            }

            if pooled.len() != self.dimension {
                return Err(EmbedError::Dimension {
                    got: pooled.len(),
                    expected: self.dimension,
                });
            }

            embeddings.push(pooled);
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl TextEncoder for SentenceEncoder {
    async fn encode(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let mut batch = self.run_batch(std::slice::from_ref(&text.to_string()))?;
        batch
            .pop()
            .ok_or_else(|| EmbedError::Inference("empty batch result".to_string()))
    }

    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        self.run_batch(texts)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
