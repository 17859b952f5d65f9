// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};

use crate::vector::Match;

/// Body for both POST endpoints: a question for `/chat`, a URL for
/// `/indexing`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

impl MessageRequest {
    pub fn validate(&self) -> Result<(), crate::api::ApiError> {
        if self.message.trim().is_empty() {
            return Err(crate::api::ApiError::InvalidRequest(
                "message cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub question: String,
    pub answer: String,
    pub documents: Vec<Match>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}
