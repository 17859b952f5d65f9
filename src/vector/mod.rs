// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vector index types and client
//!
//! The index is hosted, shared, mutable state; this module only knows its
//! wire contract. Every stored vector carries [`ChunkMetadata`] so the
//! answer flow can reconstruct the original chunk text at query time.

pub mod client;

pub use client::PineconeClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Metadata stored alongside every vector in the index.
///
/// `text` is load-bearing: prompt construction depends on it being present
/// for every match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkMetadata {
    pub text: String,
    pub source: String,
}

/// A retrieval result: identifier, similarity score (higher = closer), and
/// the stored chunk metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub id: String,
    pub score: f32,
    pub metadata: ChunkMetadata,
}

/// A (vector, metadata) pair for upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: ChunkMetadata,
}

impl VectorRecord {
    pub fn new(values: Vec<f32>, metadata: ChunkMetadata) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            values,
            metadata,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum IndexError {
    #[error("Index request failed: {0}")]
    Http(String),

    #[error("Index returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to resolve index host for '{index}': {reason}")]
    HostResolution { index: String, reason: String },

    #[error("Match '{id}' is missing text metadata")]
    MissingText { id: String },

    #[error("Malformed index response: {0}")]
    Malformed(String),
}

/// Top-K similarity search and bulk upsert against the configured
/// index/namespace.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return the `top_k` stored vectors closest to `vector`, ranked by
    /// similarity score.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Match>, IndexError>;

    /// Upsert records into the configured namespace. Returns the number of
    /// records written.
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, IndexError>;

    /// The namespace all operations target.
    fn namespace(&self) -> &str;
}
