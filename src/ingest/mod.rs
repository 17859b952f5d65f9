// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Web page ingestion
//!
//! Loads a page, splits it into overlapping chunks, embeds the chunks, and
//! upserts them into the vector index under the configured namespace. Every
//! failure is a tagged outcome, not an error: callers branch on the variant
//! and display the human-readable message.
//!
//! Re-ingesting the same URL appends duplicate chunks; there is no
//! deduplication or replacement path.

pub mod loader;
pub mod splitter;

pub use loader::{Document, DocumentLoader, LoadError, PageLoader};
pub use splitter::{split_documents, split_text, DocumentChunk, CHUNK_OVERLAP, CHUNK_SIZE};

use std::sync::Arc;
use tracing::{info, warn};

use crate::embeddings::TextEmbedder;
use crate::vector::{VectorIndex, VectorRecord};

/// Result of one ingestion run.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Chunks were embedded and upserted.
    Indexed {
        chunks: usize,
        url: String,
        namespace: String,
    },
    /// The page could not be fetched.
    LoadFailed { url: String, reason: String },
    /// The page fetched but produced no documents.
    NoContent { url: String },
    /// Embedding or upsert failed after loading succeeded.
    UploadFailed { reason: String },
}

impl IngestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, IngestOutcome::Indexed { .. })
    }

    /// Human-readable status line. The leading marker is kept for display;
    /// success is decided by [`is_success`](Self::is_success), not by
    /// parsing this string.
    pub fn message(&self) -> String {
        match self {
            IngestOutcome::Indexed {
                chunks,
                url,
                namespace,
            } => format!(
                "✅ Indexed {} chunks from {} into the vector index (namespace: {})",
                chunks, url, namespace
            ),
            IngestOutcome::LoadFailed { url, reason } => {
                format!("❌ Failed to load {}: {}", url, reason)
            }
            IngestOutcome::NoContent { url } => format!("❌ No content found at {}", url),
            IngestOutcome::UploadFailed { reason } => format!("❌ Failed to index: {}", reason),
        }
    }
}

/// Orchestrates the load → split → embed → upsert flow.
pub struct IngestPipeline {
    loader: Arc<dyn DocumentLoader>,
    embedder: Arc<dyn TextEmbedder>,
    index: Arc<dyn VectorIndex>,
}

impl IngestPipeline {
    pub fn new(
        loader: Arc<dyn DocumentLoader>,
        embedder: Arc<dyn TextEmbedder>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            loader,
            embedder,
            index,
        }
    }

    /// Ingest one URL. Each step short-circuits the rest on failure.
    pub async fn ingest_url(&self, url: &str) -> IngestOutcome {
        info!("[1/4] Loading page: {}", url);
        let documents = match self.loader.load(url).await {
            Ok(docs) => docs,
            Err(e) => {
                warn!("Page load failed for {}: {}", url, e);
                return IngestOutcome::LoadFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                };
            }
        };

        info!("[2/4] Loaded {} documents", documents.len());
        if documents.is_empty() {
            return IngestOutcome::NoContent {
                url: url.to_string(),
            };
        }

        let chunks = split_documents(&documents);
        info!("[3/4] Split into {} chunks", chunks.len());

        info!("[4/4] Embedding and upserting chunks...");
        match self.embed_and_upsert(&chunks).await {
            Ok(count) => IngestOutcome::Indexed {
                chunks: count,
                url: url.to_string(),
                namespace: self.index.namespace().to_string(),
            },
            Err(reason) => {
                warn!("Upload failed for {}: {}", url, reason);
                IngestOutcome::UploadFailed { reason }
            }
        }
    }

    async fn embed_and_upsert(&self, chunks: &[DocumentChunk]) -> Result<usize, String> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| e.to_string())?;

        let records: Vec<VectorRecord> = vectors
            .into_iter()
            .zip(chunks)
            .map(|(values, chunk)| VectorRecord::new(values, chunk.metadata()))
            .collect();

        self.index.upsert(records).await.map_err(|e| e.to_string())
    }
}
