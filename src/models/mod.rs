// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model management: artifact resolution and ONNX session construction.

pub mod fetch;

pub use fetch::{ensure_model_file, HubSource};

use anyhow::{Context, Result};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use std::path::Path;
use tracing::{info, warn};

/// Loads an ONNX session, preferring the CUDA execution provider and
/// falling back to CPU when CUDA is unavailable.
///
/// Both ONNX models in this node (classifier and embedder) go through here
/// so device selection behaves identically for each.
pub fn load_onnx_session(model_path: &Path) -> Result<Session> {
    if !model_path.exists() {
        anyhow::bail!("ONNX model file not found: {}", model_path.display());
    }

    let cuda_result = Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CUDAExecutionProvider::default().build()])
        .context("Failed to set CUDA execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(4)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path);

    match cuda_result {
        Ok(session) => {
            info!("ONNX session on CUDA: {}", model_path.display());
            Ok(session)
        }
        Err(e) => {
            warn!("CUDA execution provider failed ({}), falling back to CPU", e);
            let session = Session::builder()
                .context("Failed to create session builder")?
                .with_execution_providers([CPUExecutionProvider::default().build()])
                .context("Failed to set CPU execution provider")?
                .with_optimization_level(GraphOptimizationLevel::Level3)
                .context("Failed to set optimization level")?
                .with_intra_threads(4)
                .context("Failed to set intra threads")?
                .commit_from_file(model_path)
                .with_context(|| {
                    format!("Failed to load ONNX model from {}", model_path.display())
                })?;
            info!("ONNX session on CPU: {}", model_path.display());
            Ok(session)
        }
    }
}
