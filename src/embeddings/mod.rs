// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hosted text embeddings
//!
//! Maps a text span to a fixed-length, L2-normalized vector by calling the
//! HuggingFace inference API's feature-extraction pipeline. The embedding
//! model itself is a black box; this module only knows its wire contract.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

#[derive(Debug, Clone, Error)]
pub enum EmbedError {
    #[error("Embedding request failed: {0}")]
    Http(String),

    #[error("Embedding endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed embedding payload: {0}")]
    Malformed(String),
}

/// Maps text to a fixed-length numeric vector.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    /// Embed several texts. Fails on the first failing text.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}

/// Embedder backed by the hosted feature-extraction endpoint.
pub struct HostedEmbedder {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HostedEmbedder {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, model)
    }

    /// Point the embedder at a non-default endpoint (used by tests).
    pub fn with_base_url(base_url: &str, api_key: &str, model: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl TextEmbedder for HostedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let url = format!(
            "{}/models/{}/pipeline/feature-extraction",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({ "inputs": text }))
            .send()
            .await
            .map_err(|e| EmbedError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbedError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response
            .json::<Value>()
            .await
            .map_err(|e| EmbedError::Http(e.to_string()))?;

        let vector = parse_embedding(&payload)?;
        Ok(l2_normalize(vector))
    }
}

/// Parse the feature-extraction payload into a single vector.
///
/// The endpoint returns either a flat vector (pooled models) or a matrix of
/// token embeddings; the latter is mean-pooled here.
fn parse_embedding(payload: &Value) -> Result<Vec<f32>, EmbedError> {
    let rows = payload
        .as_array()
        .ok_or_else(|| EmbedError::Malformed("expected a JSON array".to_string()))?;

    if rows.is_empty() {
        return Err(EmbedError::Malformed("empty embedding".to_string()));
    }

    // Flat vector of numbers
    if rows[0].is_number() {
        return rows
            .iter()
            .map(|v| {
                v.as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| EmbedError::Malformed("non-numeric component".to_string()))
            })
            .collect();
    }

    // Matrix of token embeddings: mean-pool across rows
    let matrix: Vec<Vec<f32>> = rows
        .iter()
        .map(|row| {
            row.as_array()
                .ok_or_else(|| EmbedError::Malformed("expected nested arrays".to_string()))?
                .iter()
                .map(|v| {
                    v.as_f64()
                        .map(|f| f as f32)
                        .ok_or_else(|| EmbedError::Malformed("non-numeric component".to_string()))
                })
                .collect()
        })
        .collect::<Result<_, _>>()?;

    let dims = matrix[0].len();
    if dims == 0 || matrix.iter().any(|row| row.len() != dims) {
        return Err(EmbedError::Malformed("ragged embedding matrix".to_string()));
    }

    let mut pooled = vec![0.0f32; dims];
    for row in &matrix {
        for (acc, v) in pooled.iter_mut().zip(row) {
            *acc += v;
        }
    }
    let n = matrix.len() as f32;
    Ok(pooled.into_iter().map(|v| v / n).collect())
}

/// L2-normalize a vector. Zero vectors are returned unchanged.
fn l2_normalize(vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return vector;
    }
    vector.into_iter().map(|v| v / norm).collect()
}
