// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX NLI cross-encoder for zero-shot classification
//!
//! Runs a natural-language-inference model (premise/hypothesis pairs) via
//! ONNX Runtime. Each candidate category is phrased as a hypothesis through
//! the fixed template; all six pairs are scored in one padded batch and the
//! entailment logits are softmaxed across candidates, which is the standard
//! single-label zero-shot formulation.
//!
//! Model requirements:
//! - inputs: input_ids, attention_mask, token_type_ids
//! - output: [batch, 3] NLI logits

use anyhow::{Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, Axis};
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::Tokenizer;
use tracing::info;

use crate::classifier::{Classification, ClassifyError, EmailCategory, ZeroShotClassifier};
use crate::models::load_onnx_session;

/// Logit column for "entailment" in `*-mnli`-style exports.
const DEFAULT_ENTAILMENT_INDEX: usize = 2;

/// Zero-shot classifier backed by an NLI cross-encoder ONNX export.
///
/// # Thread Safety
/// The ort session requires `&mut` to run, so it sits behind a `Mutex`;
/// the tokenizer is shared read-only. Both are `Arc`-wrapped for cheap
/// cloning into request handlers.
#[derive(Clone)]
pub struct NliZeroShotClassifier {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    /// Which logit column holds the entailment score. NLI exports disagree
    /// on label order; `*-mnli` BART/RoBERTa exports use index 2.
    entailment_index: usize,
}

impl std::fmt::Debug for NliZeroShotClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NliZeroShotClassifier")
            .field("entailment_index", &self.entailment_index)
            .finish_non_exhaustive()
    }
}

impl NliZeroShotClassifier {
    /// Loads the NLI model and tokenizer from disk.
    ///
    /// Runs one validation inference to confirm the model emits three NLI
    /// logits per pair; a sequence-classification export with a different
    /// head is rejected here rather than misread at request time.
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
                .encode(("validation premise", "validation hypothesis"), true)
                .map_err(|e| anyhow::anyhow!("Tokenizer validation failed: {}", e))?;

            let len = encoding.get_ids().len();
            let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
            let attention_mask: Vec<i64> = encoding
                .get_attention_mask()
                .iter()
                .map(|&m| m as i64)
                .collect();
            let token_type_ids: Vec<i64> =
                encoding.get_type_ids().iter().map(|&t| t as i64).collect();

            let outputs = session.run(ort::inputs![
                "input_ids" => Value::from_array(Array2::from_shape_vec((1, len), input_ids)?)?,
                "attention_mask" => Value::from_array(Array2::from_shape_vec((1, len), attention_mask)?)?,
                "token_type_ids" => Value::from_array(Array2::from_shape_vec((1, len), token_type_ids)?)?
            ])?;

            let logits = outputs[0]
                .try_extract_array::<f32>()
                .context("Failed to extract validation logits")?;
            let shape = logits.shape();
            if shape.len() != 2 || shape[1] != 3 {
                anyhow::bail!(
                    "Model outputs unexpected dimensions: {:?} (expected [batch, 3] NLI logits)",
                    shape
                );
            }
        }

        info!("Zero-shot classifier loaded");

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            entailment_index: DEFAULT_ENTAILMENT_INDEX,
        })
    }

    /// Overrides the entailment logit column for exports with a different
    /// label order.
    pub fn with_entailment_index(mut self, index: usize) -> Self {
        self.entailment_index = index;
        self
    }
}

#[async_trait]
impl ZeroShotClassifier for NliZeroShotClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, ClassifyError> {
        // One premise/hypothesis pair per candidate category.
        let encodings: Vec<_> = EmailCategory::ALL
            .iter()
            .map(|category| {
                self.tokenizer
                    .encode((text, category.hypothesis().as_str()), true)
                    .map_err(|e| ClassifyError::Tokenization(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let batch = encodings.len();
        let max_len = encodings
            .iter()
            .map(|enc| enc.get_ids().len())
            .max()
            .unwrap_or(0);

        // Pad all pairs to the longest sequence in the batch.
        let mut input_ids = Vec::with_capacity(batch * max_len);
        let mut attention_mask = Vec::with_capacity(batch * max_len);
        let mut token_type_ids = Vec::with_capacity(batch * max_len);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let padding = max_len - ids.len();

            input_ids.extend(ids.iter().map(|&id| id as i64));
            attention_mask.extend(encoding.get_attention_mask().iter().map(|&m| m as i64));
            token_type_ids.extend(encoding.get_type_ids().iter().map(|&t| t as i64));

            input_ids.extend(std::iter::repeat(0i64).take(padding));
            attention_mask.extend(std::iter::repeat(0i64).take(padding));
            token_type_ids.extend(std::iter::repeat(0i64).take(padding));
        }

        let input_ids = Array2::from_shape_vec((batch, max_len), input_ids)
            .map_err(|e| ClassifyError::MalformedOutput(e.to_string()))?;
        let attention_mask = Array2::from_shape_vec((batch, max_len), attention_mask)
            .map_err(|e| ClassifyError::MalformedOutput(e.to_string()))?;
        let token_type_ids = Array2::from_shape_vec((batch, max_len), token_type_ids)
            .map_err(|e| ClassifyError::MalformedOutput(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ClassifyError::Inference("classifier session poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => Value::from_array(input_ids)
                    .map_err(|e| ClassifyError::Inference(e.to_string()))?,
                "attention_mask" => Value::from_array(attention_mask)
                    .map_err(|e| ClassifyError::Inference(e.to_string()))?,
                "token_type_ids" => Value::from_array(token_type_ids)
                    .map_err(|e| ClassifyError::Inference(e.to_string()))?
            ])
            .map_err(|e| ClassifyError::Inference(e.to_string()))?;

        let logits = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| ClassifyError::MalformedOutput(e.to_string()))?;

        let shape = logits.shape();
        if shape.len() != 2 || shape[0] != batch || shape[1] <= self.entailment_index {
            return Err(ClassifyError::MalformedOutput(format!(
                "unexpected logit shape {:?} for batch of {}",
                shape, batch
            )));
        }

        // Entailment logit per candidate, softmaxed across candidates.
        let entailment: Vec<f32> = (0..batch)
            .map(|row| logits.index_axis(Axis(0), row)[[self.entailment_index]])
            .collect();
        let scores = softmax(&entailment);

        let (winner, score) = scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(idx, &score)| (EmailCategory::ALL[idx], score))
            .ok_or_else(|| ClassifyError::MalformedOutput("empty score set".to_string()))?;

        Ok(Classification {
            category: winner,
            score,
        })
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|&x| x / sum).collect()
}
