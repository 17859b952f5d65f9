// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Environment-sourced service configuration
//!
//! All settings come from environment variables (a `.env` file is loaded by
//! `main` before this runs). Credentials are required; everything else has
//! a default. There is no runtime reload.

use std::env;
use thiserror::Error;

/// Frontend origins allowed by the CORS layer.
pub const ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "https://fullstack-rag.netlify.app",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Service configuration resolved at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Vector index credentials
    pub pinecone_api_key: String,
    /// Vector index name
    pub pinecone_index: String,
    /// Logical partition of the index all queries and upserts target
    pub pinecone_namespace: String,
    /// Inference endpoint credentials (embeddings + generation)
    pub huggingface_api_key: String,
    /// Hosted embedding model id
    pub embedding_model: String,
    /// Hosted chat-completion model id
    pub generation_model: String,
    /// HTTP listen port
    pub api_port: u16,
}

impl Settings {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            pinecone_api_key: required("PINECONE_API_KEY")?,
            pinecone_index: env::var("PINECONE_INDEX")
                .unwrap_or_else(|_| "lab-rag-index".to_string()),
            pinecone_namespace: env::var("PINECONE_NAMESPACE")
                .unwrap_or_else(|_| "ns1".to_string()),
            huggingface_api_key: required("HUGGINGFACE_API_KEY")?,
            embedding_model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "thenlper/gte-small".to_string()),
            generation_model: env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| "HuggingFaceH4/zephyr-7b-beta".to_string()),
            api_port: parse_port(env::var("API_PORT").ok())?,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

fn parse_port(value: Option<String>) -> Result<u16, ConfigError> {
    match value {
        None => Ok(8000),
        Some(v) => v.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
            name: "API_PORT",
            value: v,
        }),
    }
}
