//! Chat completions against an OpenAI-compatible API (Groq by default).

use super::ChatModel;
use crate::config::LlmSettings;
use crate::error::{FaqbotError, Result};
use crate::openai::{api_key_from_env, create_client};
use crate::rag::{Prompt, Role};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// Chat model reached through the OpenAI chat-completions protocol.
pub struct OpenAiCompatibleChat {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
    api_key_env: String,
    has_key: bool,
}

impl OpenAiCompatibleChat {
    /// Create a chat model from settings. The key is read from the
    /// environment now and checked when the first completion is requested.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let api_key = api_key_from_env(&settings.api_key_env);
        Self::new(settings, api_key.as_deref())
    }

    /// Create a chat model with an explicit key.
    pub fn new(settings: &LlmSettings, api_key: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: create_client(
                &settings.api_base,
                api_key,
                Duration::from_secs(settings.timeout_secs),
            )?,
            model: settings.model.clone(),
            temperature: settings.temperature,
            api_key_env: settings.api_key_env.clone(),
            has_key: api_key.is_some(),
        })
    }

    fn to_messages(prompt: &Prompt) -> Result<Vec<ChatCompletionRequestMessage>> {
        prompt
            .messages
            .iter()
            .map(|m| {
                let message: ChatCompletionRequestMessage = match m.role {
                    Role::System => ChatCompletionRequestSystemMessageArgs::default()
                        .content(m.content.clone())
                        .build()
                        .map_err(|e| FaqbotError::Llm(e.to_string()))?
                        .into(),
                    Role::User => ChatCompletionRequestUserMessageArgs::default()
                        .content(m.content.clone())
                        .build()
                        .map_err(|e| FaqbotError::Llm(e.to_string()))?
                        .into(),
                };
                Ok(message)
            })
            .collect()
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatibleChat {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        if !self.has_key {
            return Err(FaqbotError::MissingCredentials(self.api_key_env.clone()));
        }

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model).messages(Self::to_messages(prompt)?);
        if let Some(temperature) = self.temperature {
            args.temperature(temperature);
        }
        let request = args.build().map_err(|e| FaqbotError::Llm(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            FaqbotError::OpenAI(format!("Failed to generate response: {}", e))
        })?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| FaqbotError::Llm("Empty response from LLM".to_string()))?;

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
