//! Vector store abstraction for faqbot.
//!
//! Provides a trait-based interface so the retrieval index is independent
//! of where vectors live.

mod memory;

pub use memory::MemoryVectorStore;

use crate::chunking::Chunk;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chunk stored together with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    pub chunk: Chunk,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// When this chunk was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl IndexedChunk {
    pub fn new(chunk: Chunk, embedding: Vec<f32>) -> Self {
        Self {
            chunk,
            embedding,
            indexed_at: Utc::now(),
        }
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched chunk.
    pub entry: IndexedChunk,
    /// Similarity score (higher is better).
    pub score: f32,
}

impl SearchResult {
    pub fn content(&self) -> &str {
        &self.entry.chunk.content
    }
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Bulk insert chunks.
    async fn upsert_batch(&self, entries: Vec<IndexedChunk>) -> Result<usize>;

    /// Search for the `limit` most similar chunks.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>>;

    /// Search with a minimum similarity threshold.
    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>>;

    /// Get total chunk count.
    async fn document_count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
///
/// Vectors of different length, empty or zero vectors, and vectors holding
/// non-finite values all score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot_product / (norm_a * norm_b);
    if similarity.is_finite() {
        similarity
    } else {
        0.0
    }
}
