//! Hugging Face Inference API embeddings.

use super::Embedder;
use crate::config::EmbeddingSettings;
use crate::error::{FaqbotError, Result};
use crate::openai::{api_key_from_env, http_client};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Public endpoint of the hosted inference router.
const DEFAULT_API_BASE: &str = "https://router.huggingface.co/hf-inference/models";

/// Embedder backed by the feature-extraction pipeline of the Inference API.
pub struct HuggingFaceEmbedder {
    client: reqwest::Client,
    api_base: String,
    model: String,
    api_key_env: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a [String],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeatureExtractionResponse {
    Batch(Vec<Vec<f32>>),
    Single(Vec<f32>),
}

impl HuggingFaceEmbedder {
    /// Create an embedder from settings. The token is read from the
    /// environment now but only checked when the first request is made.
    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self> {
        Ok(Self {
            client: http_client(Duration::from_secs(settings.timeout_secs))?,
            api_base: settings
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model: settings.model.clone(),
            api_key_env: settings.key_env().to_string(),
            api_key: api_key_from_env(settings.key_env()),
        })
    }

    /// Override the token.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}/pipeline/feature-extraction",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl Embedder for HuggingFaceEmbedder {
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

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| FaqbotError::MissingCredentials(self.api_key_env.clone()))?;

        debug!("Requesting {} embeddings from {}", texts.len(), self.model);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&FeatureExtractionRequest { inputs: texts })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(FaqbotError::Embedding(format!(
                "Inference API returned {}: {}",
                status, body
            )));
        }

        let embeddings = match response.json::<FeatureExtractionResponse>().await? {
            FeatureExtractionResponse::Batch(vectors) => vectors,
            FeatureExtractionResponse::Single(vector) => vec![vector],
        };

        if embeddings.len() != texts.len() {
            return Err(FaqbotError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
