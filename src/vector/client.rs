// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pinecone-style REST client
//!
//! Resolves the index data-plane host once through the control plane, then
//! issues `/query` and `/vectors/upsert` calls against it. Upserts are
//! batched 100 records per request.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

use super::{ChunkMetadata, IndexError, Match, VectorIndex, VectorRecord};

const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
const UPSERT_BATCH_SIZE: usize = 100;

pub struct PineconeClient {
    client: Client,
    api_key: String,
    host: String,
    namespace: String,
}

#[derive(Debug, Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<RawMatch>,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    id: String,
    #[serde(default)]
    score: f32,
    metadata: Option<ChunkMetadata>,
}

impl PineconeClient {
    /// Resolve the index host through the control plane and build a client
    /// bound to `namespace`.
    pub async fn connect(
        api_key: &str,
        index_name: &str,
        namespace: &str,
    ) -> Result<Self, IndexError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        let url = format!("{}/indexes/{}", CONTROL_PLANE_URL, index_name);
        let response = client
            .get(&url)
            .header("Api-Key", api_key)
            .send()
            .await
            .map_err(|e| IndexError::HostResolution {
                index: index_name.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexError::HostResolution {
                index: index_name.to_string(),
                reason: format!("{}: {}", status, body),
            });
        }

        let described = response
            .json::<DescribeIndexResponse>()
            .await
            .map_err(|e| IndexError::HostResolution {
                index: index_name.to_string(),
                reason: e.to_string(),
            })?;

        info!("Resolved index '{}' host: {}", index_name, described.host);

        Ok(Self::with_host(api_key, &described.host, namespace))
    }

    /// Build a client against a known data-plane host (used by tests).
    pub fn with_host(api_key: &str, host: &str, namespace: &str) -> Self {
        let host = host.trim_end_matches('/');
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            api_key: api_key.to_string(),
            host,
            namespace: namespace.to_string(),
        }
    }
}

fn convert_matches(raw: Vec<RawMatch>) -> Result<Vec<Match>, IndexError> {
    raw.into_iter()
        .map(|m| match m.metadata {
            Some(metadata) if !metadata.text.is_empty() => Ok(Match {
                id: m.id,
                score: m.score,
                metadata,
            }),
            _ => Err(IndexError::MissingText { id: m.id }),
        })
        .collect()
}

#[async_trait]
impl VectorIndex for PineconeClient {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<Match>, IndexError> {
        let url = format!("{}/query", self.host);
        let body = json!({
            "vector": vector,
            "top_k": top_k,
            "namespace": self.namespace,
            "include_metadata": true,
        });

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| IndexError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = response
            .json::<QueryResponse>()
            .await
            .map_err(|e| IndexError::Malformed(e.to_string()))?;

        let matches = convert_matches(parsed.matches)?;
        info!("Index query returned {} matches", matches.len());
        Ok(matches)
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, IndexError> {
        let url = format!("{}/vectors/upsert", self.host);
        let total = records.len();

        for batch in records.chunks(UPSERT_BATCH_SIZE) {
            let body = json!({
                "vectors": batch,
                "namespace": self.namespace,
            });

            let response = self
                .client
                .post(&url)
                .header("Api-Key", &self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| IndexError::Http(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(IndexError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            debug!("Upserted batch of {} records", batch.len());
        }

        info!(
            "Upserted {} records into namespace '{}'",
            total, self.namespace
        );
        Ok(total)
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}
