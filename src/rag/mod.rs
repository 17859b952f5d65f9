// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Question-answering orchestration
//!
//! Composes the embedder, vector index, and answer generator into the Q&A
//! flow: embed the question, retrieve the top matches, build a prompt from
//! the matched texts, and generate an answer.
//!
//! Failure policy: embedding and retrieval failures propagate (there is
//! nothing useful to return without context); generation failures are
//! surfaced as data — the answer string embeds the error and the retrieved
//! context is still returned.

pub mod prompt;

pub use prompt::{build_prompt, join_context, NO_INFO_ANSWER, SYSTEM_PROMPT};

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::embeddings::{EmbedError, TextEmbedder};
use crate::generation::AnswerGenerator;
use crate::vector::{IndexError, Match, VectorIndex};

/// Number of matches retrieved per question.
pub const TOP_K: usize = 3;

#[derive(Debug, Error)]
pub enum RagError {
    #[error(transparent)]
    Embed(#[from] EmbedError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Answer plus the matches it was grounded on.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub answer: String,
    pub context: Vec<Match>,
}

/// The Q&A orchestrator. Collaborators are injected at startup so tests can
/// substitute fakes.
pub struct RagEngine {
    embedder: Arc<dyn TextEmbedder>,
    index: Arc<dyn VectorIndex>,
    generator: Arc<dyn AnswerGenerator>,
}

impl RagEngine {
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        index: Arc<dyn VectorIndex>,
        generator: Arc<dyn AnswerGenerator>,
    ) -> Self {
        Self {
            embedder,
            index,
            generator,
        }
    }

    /// Answer one question from indexed context.
    pub async fn answer_question(&self, question: &str) -> Result<QueryOutcome, RagError> {
        info!("[1/3] Embedding question");
        let vector = self.embedder.embed(question).await?;

        info!("[2/3] Querying vector index (top_k={})", TOP_K);
        let matches = self.index.query(&vector, TOP_K).await?;

        if matches.is_empty() {
            info!("No matches found; returning no-information answer");
            return Ok(QueryOutcome {
                answer: NO_INFO_ANSWER.to_string(),
                context: vec![],
            });
        }

        let texts: Vec<&str> = matches.iter().map(|m| m.metadata.text.as_str()).collect();
        let prompt = build_prompt(&join_context(&texts), question);

        info!("[3/3] Generating answer from {} matches", matches.len());
        let answer = match self.generator.generate(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                // Partial success: the caller still gets the retrieved
                // context alongside the error text.
                warn!("Answer generation failed: {}", e);
                format!("Error generating answer: {}", e)
            }
        };

        Ok(QueryOutcome {
            answer,
            context: matches,
        })
    }
}
