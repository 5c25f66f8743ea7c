//! Clients for OpenAI-compatible APIs (OpenAI, Groq, local servers).

use crate::error::{FaqbotError, Result};
use async_openai::{config::OpenAIConfig, Client};
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::time::Duration;

/// Build a reqwest client with a request timeout.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| FaqbotError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Backoff policy that gives up after the first attempt.
///
/// async-openai retries rate-limit and server errors by default. Provider
/// failures must reach the caller unchanged, so every request is tried once.
pub fn no_retry() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

/// Create a client for an OpenAI-compatible API at `api_base`.
///
/// A missing key is allowed here; callers report it on first use.
pub fn create_client(
    api_base: &str,
    api_key: Option<&str>,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let mut config = OpenAIConfig::new().with_api_base(api_base.trim_end_matches('/'));
    if let Some(key) = api_key {
        config = config.with_api_key(key);
    }

    Ok(Client::with_config(config)
        .with_http_client(http_client(timeout)?)
        .with_backoff(no_retry()))
}

/// Read an API key from the environment, treating empty values as unset.
pub fn api_key_from_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|k| !k.trim().is_empty())
}
