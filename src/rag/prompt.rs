// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prompt assembly for answer generation

/// System instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = "You are a helpful medical assistant.";

/// Answer returned when retrieval finds nothing; the generator is not
/// called in that case.
pub const NO_INFO_ANSWER: &str =
    "I don't have any information to answer this question. Please index some documents first.";

/// Fill the fixed prompt skeleton with retrieved context and the question.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Context:\n{context}\n\nQuestion: {question}\n\nAnswer clearly and concisely:\n"
    )
}

/// Join retrieved chunk texts into a single context block.
pub fn join_context(texts: &[&str]) -> String {
    texts.join("\n\n")
}
