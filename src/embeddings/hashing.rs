// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Deterministic hash-based encoder.
//!
//! Produces stable pseudo-random vectors seeded by the input text. No
//! semantic meaning; identical text always maps to the identical vector,
//! which is exactly what retrieval and index tests need when no model file
//! is on disk.

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::embeddings::{EmbedError, TextEncoder};

#[derive(Debug, Clone)]
pub struct HashingEncoder {
    dimension: usize,
}

impl HashingEncoder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn generate(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut seed = hasher.finish();

        let mut vector = Vec::with_capacity(self.dimension);
        for i in 0..self.dimension {
            // Linear congruential step keeps the sequence deterministic.
            seed = (seed.wrapping_mul(1664525).wrapping_add(1013904223)) ^ (i as u64);
            let value = (seed as f64 / u64::MAX as f64) * 2.0 - 1.0;
            vector.push(value as f32);
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }
}

#[async_trait]
impl TextEncoder for HashingEncoder {
    async fn encode(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(self.generate(text))
    }

    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(texts.iter().map(|text| self.generate(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
