// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Retrieval-augmented question-answering node.
//!
//! Embeds questions with a hosted embedding model, retrieves the closest
//! document chunks from a hosted vector index, and asks a hosted chat model
//! to answer from that context. A companion ingestion path scrapes a web
//! page, chunks it, and upserts the chunks into the index.

pub mod api;
pub mod config;
pub mod embeddings;
pub mod generation;
pub mod ingest;
pub mod rag;
pub mod vector;
