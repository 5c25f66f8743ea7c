//! Serve command: run the HTTP API.

use crate::cli::Output;
use crate::config::{EmbeddingProvider, IndexMode, Settings};
use crate::rag::QueryPipeline;
use crate::server;
use std::sync::Arc;
use tracing::warn;

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    index_mode: Option<IndexMode>,
    embedding_provider: Option<EmbeddingProvider>,
    mut settings: Settings,
) -> anyhow::Result<()> {
    apply_overrides(&mut settings, index_mode, embedding_provider);
    let pipeline = Arc::new(QueryPipeline::from_settings(&settings)?);

    // A failed warm-up is not fatal: the first question retries the build
    // and reports the error to the caller.
    if pipeline.index_mode() == IndexMode::Cached {
        match pipeline.warm().await {
            Ok(chunks) => Output::success(&format!("Indexed {} FAQ chunks", chunks)),
            Err(e) => warn!("Index warm-up failed: {}", e),
        }
    }

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("faqbot API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Ask", "POST /ask");
    Output::kv("Refresh index", "POST /index/refresh");
    println!();
    Output::kv("Document", &settings.document_path().display().to_string());
    Output::kv("Index mode", &settings.retrieval.index_mode.to_string());
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    server::serve(listener, pipeline).await?;

    Ok(())
}

/// Apply command-line flags on top of the loaded settings.
fn apply_overrides(
    settings: &mut Settings,
    index_mode: Option<IndexMode>,
    embedding_provider: Option<EmbeddingProvider>,
) {
    if let Some(mode) = index_mode {
        settings.retrieval.index_mode = mode;
    }
    if let Some(provider) = embedding_provider {
        settings.embedding.provider = provider;
    }
}
