//! Document chunking
//!
//! Splits loaded documents into overlapping character windows sized for
//! embedding and retrieval. Pure transformation; it does not fail.

use text_splitter::{ChunkConfig, TextSplitter};

use super::loader::Document;
use crate::vector::ChunkMetadata;

/// Window size in characters.
pub const CHUNK_SIZE: usize = 1000;

/// Overlap between consecutive windows in characters.
pub const CHUNK_OVERLAP: usize = 200;

/// A chunk of a source document, ready for embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChunk {
    pub text: String,
    pub source: String,
}

impl DocumentChunk {
    pub fn metadata(&self) -> ChunkMetadata {
        ChunkMetadata {
            text: self.text.clone(),
            source: self.source.clone(),
        }
    }
}

/// Split one text into overlapping windows.
pub fn split_text(text: &str) -> Vec<String> {
    let config = ChunkConfig::new(CHUNK_SIZE)
        .with_overlap(CHUNK_OVERLAP)
        .expect("overlap must be smaller than chunk size");

    TextSplitter::new(config)
        .chunks(text)
        .map(|chunk| chunk.to_string())
        .collect()
}

/// Split every document, tagging each chunk with its source URL.
pub fn split_documents(documents: &[Document]) -> Vec<DocumentChunk> {
    documents
        .iter()
        .flat_map(|doc| {
            split_text(&doc.text).into_iter().map(|text| DocumentChunk {
                text,
                source: doc.source.clone(),
            })
        })
        .collect()
}
