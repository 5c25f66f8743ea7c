//! Retrieval index: chunks embedded into a vector store.

use crate::chunking::Chunk;
use crate::embedding::Embedder;
use crate::error::{FaqbotError, Result};
use crate::vector_store::{IndexedChunk, MemoryVectorStore, SearchResult, VectorStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// An embedded, searchable set of chunks.
pub struct RetrievalIndex {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    chunk_count: usize,
    built_at: DateTime<Utc>,
}

impl RetrievalIndex {
    /// Embed every chunk and load it into a fresh in-memory store.
    pub async fn build(chunks: Vec<Chunk>, embedder: Arc<dyn Embedder>) -> Result<Self> {
        Self::build_in(chunks, embedder, Arc::new(MemoryVectorStore::new())).await
    }

    /// Embed every chunk into the given (empty) store.
    #[instrument(skip_all, fields(chunks = chunks.len()))]
    pub async fn build_in(
        chunks: Vec<Chunk>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
    ) -> Result<Self> {
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(FaqbotError::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let entries: Vec<IndexedChunk> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexedChunk::new(chunk, embedding))
            .collect();

        store.upsert_batch(entries).await?;
        let chunk_count = store.document_count().await?;
        info!("Indexed {} chunks with {}", chunk_count, embedder.model());

        Ok(Self {
            store,
            embedder,
            chunk_count,
            built_at: Utc::now(),
        })
    }

    /// Return up to `k` chunks ranked by similarity to `question`.
    ///
    /// With fewer than `k` chunks indexed, all of them are returned.
    #[instrument(skip(self, question))]
    pub async fn search(&self, question: &str, k: usize) -> Result<Vec<SearchResult>> {
        if k == 0 || self.chunk_count == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(question).await?;
        let results = self.store.search(&query_embedding, k).await?;

        debug!(
            "Retrieved {} of {} chunks (top score {:?})",
            results.len(),
            self.chunk_count,
            results.first().map(|r| r.score)
        );
        Ok(results)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}
