// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model artifact resolution.
//!
//! Model files are expected on local disk; anything missing is pulled from
//! the Hugging Face Hub into the hub cache and served from there. There is
//! no checksum or version pinning beyond what the hub API provides.

use anyhow::{Context, Result};
use hf_hub::api::tokio::Api;
use std::path::{Path, PathBuf};
use tracing::info;

/// Hub repo + file the artifact is fetched from when the local path is absent.
#[derive(Debug, Clone)]
pub struct HubSource {
    pub repo_id: &'static str,
    pub filename: &'static str,
}

/// ONNX export of the NLI cross-encoder used for zero-shot classification.
pub const CLASSIFIER_MODEL: HubSource = HubSource {
    repo_id: "Xenova/nli-deberta-v3-base",
    filename: "onnx/model.onnx",
};

pub const CLASSIFIER_TOKENIZER: HubSource = HubSource {
    repo_id: "Xenova/nli-deberta-v3-base",
    filename: "tokenizer.json",
};

/// ONNX export of the sentence-transformer embedder.
pub const EMBEDDING_MODEL: HubSource = HubSource {
    repo_id: "Xenova/all-MiniLM-L12-v2",
    filename: "onnx/model.onnx",
};

pub const EMBEDDING_TOKENIZER: HubSource = HubSource {
    repo_id: "Xenova/all-MiniLM-L12-v2",
    filename: "tokenizer.json",
};

/// GGUF quantization of the reply generator.
pub const GENERATOR_MODEL: HubSource = HubSource {
    repo_id: "MaziyarPanahi/flan-t5-large-GGUF",
    filename: "flan-t5-large.Q8_0.gguf",
};

/// Returns `local` when it exists, otherwise downloads `source` from the
/// Hugging Face Hub and returns the cached path.
pub async fn ensure_model_file(local: &Path, source: &HubSource) -> Result<PathBuf> {
    if local.exists() {
        return Ok(local.to_path_buf());
    }

    info!(
        "Model file {} not found locally, fetching {}/{} from Hugging Face Hub",
        local.display(),
        source.repo_id,
        source.filename
    );

    let api = Api::new().context("Failed to initialize Hugging Face Hub API")?;
    let path = api
        .model(source.repo_id.to_string())
        .get(source.filename)
        .await
        .with_context(|| {
            format!(
                "Failed to download {}/{} from Hugging Face Hub",
                source.repo_id, source.filename
            )
        })?;

    info!("Fetched {} to {}", source.filename, path.display());
    Ok(path)
}
