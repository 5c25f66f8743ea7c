//! OpenAI-compatible embeddings implementation.

use super::Embedder;
use crate::config::EmbeddingSettings;
use crate::error::{FaqbotError, Result};
use crate::openai::{api_key_from_env, create_client};
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Embedder for OpenAI or any server speaking the same embeddings API.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    api_key_env: String,
    has_key: bool,
}

impl OpenAIEmbedder {
    /// Create an embedder from settings, reading the key from the environment.
    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self> {
        let api_key = api_key_from_env(settings.key_env());
        Self::new(settings, api_key.as_deref())
    }

    /// Create an embedder with an explicit key.
    pub fn new(settings: &EmbeddingSettings, api_key: Option<&str>) -> Result<Self> {
        let api_base = settings.api_base.as_deref().unwrap_or(DEFAULT_API_BASE);

        Ok(Self {
            client: create_client(
                api_base,
                api_key,
                Duration::from_secs(settings.timeout_secs),
            )?,
            model: settings.model.clone(),
            api_key_env: settings.key_env().to_string(),
            has_key: api_key.is_some(),
        })
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| FaqbotError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if !self.has_key {
            return Err(FaqbotError::MissingCredentials(self.api_key_env.clone()));
        }

        debug!("Generating embeddings for {} texts", texts.len());

        // OpenAI has a limit on batch size, process in chunks
        const BATCH_SIZE: usize = 100;
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(BATCH_SIZE) {
            let request = CreateEmbeddingRequestArgs::default()
                .model(&self.model)
                .input(EmbeddingInput::StringArray(chunk.to_vec()))
                .build()
                .map_err(|e| FaqbotError::Embedding(format!("Failed to build request: {}", e)))?;

            let response = self.client.embeddings().create(request).await.map_err(|e| {
                FaqbotError::OpenAI(format!("Embedding API error: {}", e))
            })?;

            // Sort by index to ensure correct order
            let mut embeddings: Vec<_> = response.data.into_iter().collect();
            embeddings.sort_by_key(|e| e.index);

            all_embeddings.extend(embeddings.into_iter().map(|e| e.embedding));
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
