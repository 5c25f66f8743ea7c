//! Embedding generation for semantic retrieval.

mod huggingface;
mod openai;

pub use huggingface::HuggingFaceEmbedder;
pub use openai::OpenAIEmbedder;

use crate::config::{EmbeddingProvider, EmbeddingSettings};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}

/// Create the embedder selected in the settings.
pub fn create_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>> {
    info!(
        "Using {} embeddings ({})",
        settings.provider, settings.model
    );

    let embedder: Arc<dyn Embedder> = match settings.provider {
        EmbeddingProvider::HuggingFace => Arc::new(HuggingFaceEmbedder::from_settings(settings)?),
        EmbeddingProvider::OpenAI => Arc::new(OpenAIEmbedder::from_settings(settings)?),
    };

    Ok(embedder)
}
