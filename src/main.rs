// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use rag_node::{
    api::{start_server, AppState},
    config::Settings,
    embeddings::HostedEmbedder,
    generation::HostedGenerator,
    ingest::{IngestPipeline, PageLoader},
    rag::{RagEngine, SYSTEM_PROMPT},
    vector::PineconeClient,
};
use std::{env, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting RAG node...\n");

    let settings = Settings::from_env().context("Failed to load configuration")?;

    println!("🧠 Embedding model:  {}", settings.embedding_model);
    println!("💬 Generation model: {}", settings.generation_model);
    println!(
        "📦 Vector index:     {} (namespace: {})",
        settings.pinecone_index, settings.pinecone_namespace
    );

    let embedder = Arc::new(HostedEmbedder::new(
        &settings.huggingface_api_key,
        &settings.embedding_model,
    ));

    let index = Arc::new(
        PineconeClient::connect(
            &settings.pinecone_api_key,
            &settings.pinecone_index,
            &settings.pinecone_namespace,
        )
        .await
        .context("Failed to connect to vector index")?,
    );
    println!("✅ Vector index connected");

    let generator = Arc::new(HostedGenerator::new(
        &settings.huggingface_api_key,
        &settings.generation_model,
        SYSTEM_PROMPT,
    ));

    let engine = Arc::new(RagEngine::new(
        embedder.clone(),
        index.clone(),
        generator,
    ));
    let ingest = Arc::new(IngestPipeline::new(
        Arc::new(PageLoader::new()),
        embedder,
        index,
    ));

    let state = AppState::new(engine, ingest);

    println!("\nAPI Endpoints:");
    println!("  Liveness:   http://localhost:{}/", settings.api_port);
    println!("  Health:     http://localhost:{}/health", settings.api_port);
    println!("  Chat:       POST http://localhost:{}/chat", settings.api_port);
    println!(
        "  Indexing:   POST http://localhost:{}/indexing",
        settings.api_port
    );
    println!(
        "  Streaming:  ws://localhost:{}/async_chat",
        settings.api_port
    );
    println!("\nPress Ctrl+C to shutdown...\n");

    start_server(state, settings.api_port)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    println!("👋 Goodbye!");
    Ok(())
}
