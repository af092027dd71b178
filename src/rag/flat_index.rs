// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Flat (brute-force) L2 nearest-neighbor index.
//!
//! Built once at startup from the embedded context snippets, read-only
//! afterward. No insert, delete, or update paths exist. Positions are the
//! identity: vector i belongs to snippet i.

use crate::rag::RagError;

/// A hit from [`FlatVectorIndex::search`]: position and squared L2 distance.
///
/// Distances are only compared against each other, never reported, so the
/// square root is skipped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f32,
}

#[derive(Debug)]
pub struct FlatVectorIndex {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatVectorIndex {
    /// Builds the index from position-aligned vectors.
    ///
    /// Every vector must share the first vector's dimension and contain only
    /// finite values; NaN would make the distance ordering meaningless.
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self, RagError> {
        let dimension = vectors.first().map(|v| v.len()).unwrap_or(0);

        for vector in &vectors {
            if vector.len() != dimension {
                return Err(RagError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            if vector.iter().any(|v| !v.is_finite()) {
                return Err(RagError::InvalidVector);
            }
        }

        Ok(Self { dimension, vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the k nearest vectors to `query`, ascending by squared L2
    /// distance. Fewer than k when the index holds fewer vectors. Ties keep
    /// insertion order (the scan is positional and the sort stable).
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, RagError> {
        if query.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut neighbors: Vec<Neighbor> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, vector)| Neighbor {
                index,
                distance: squared_l2(query, vector),
            })
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        neighbors.truncate(k);

        Ok(neighbors)
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
