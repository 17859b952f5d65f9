// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fake collaborators for ingestion pipeline tests.
#![allow(dead_code)]

use async_trait::async_trait;
use rag_node::embeddings::{EmbedError, TextEmbedder};
use rag_node::ingest::{Document, DocumentLoader, LoadError};
use rag_node::vector::{IndexError, Match, VectorIndex, VectorRecord};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn page(text: &str, source: &str) -> Document {
    Document {
        text: text.to_string(),
        source: source.to_string(),
        title: None,
    }
}

/// Loader returning a fixed document list or a fixed error.
pub struct StaticLoader {
    pub result: Result<Vec<Document>, LoadError>,
}

impl StaticLoader {
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            result: Ok(documents),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(LoadError::Http(reason.to_string())),
        }
    }
}

#[async_trait]
impl DocumentLoader for StaticLoader {
    async fn load(&self, _url: &str) -> Result<Vec<Document>, LoadError> {
        self.result.clone()
    }
}

/// Embedder returning fixed vectors, counting calls.
pub struct CountingEmbedder {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl CountingEmbedder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextEmbedder for CountingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EmbedError::Http("embedding endpoint unreachable".to_string()));
        }
        Ok(vec![0.1, 0.2, 0.3])
    }
}

/// Index recording upserts; never queried during ingestion.
pub struct RecordingIndex {
    pub upserts: Mutex<Vec<Vec<VectorRecord>>>,
    pub fail_upsert: bool,
}

impl RecordingIndex {
    pub fn new() -> Self {
        Self {
            upserts: Mutex::new(vec![]),
            fail_upsert: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            upserts: Mutex::new(vec![]),
            fail_upsert: true,
        }
    }

    pub fn upserted_records(&self) -> Vec<VectorRecord> {
        self.upserts.lock().unwrap().iter().flatten().cloned().collect()
    }
}

#[async_trait]
impl VectorIndex for RecordingIndex {
    async fn query(&self, _vector: &[f32], _top_k: usize) -> Result<Vec<Match>, IndexError> {
        panic!("ingestion must not query the index");
    }

    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, IndexError> {
        if self.fail_upsert {
            return Err(IndexError::Status {
                status: 503,
                body: "index unavailable".to_string(),
            });
        }
        let count = records.len();
        self.upserts.lock().unwrap().push(records);
        Ok(count)
    }

    fn namespace(&self) -> &str {
        "ns1"
    }
}
