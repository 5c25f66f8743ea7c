//! Configuration settings for faqbot.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub document: DocumentSettings,
    pub embedding: EmbeddingSettings,
    pub llm: LlmSettings,
    pub retrieval: RetrievalSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Source document and splitting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    /// Path to the FAQ text file, relative to the working directory.
    pub path: String,
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Literal delimiter the text is split on.
    pub separator: String,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            path: "./docs/faq.txt".to_string(),
            chunk_size: 30,
            separator: ".".to_string(),
        }
    }
}

/// Embedding backend type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Hugging Face hosted Inference API (feature extraction).
    #[default]
    HuggingFace,
    /// Any OpenAI-compatible embeddings endpoint.
    OpenAI,
}

impl std::str::FromStr for EmbeddingProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(EmbeddingProvider::HuggingFace),
            "openai" => Ok(EmbeddingProvider::OpenAI),
            _ => Err(format!("Unknown embedding provider: {}", s)),
        }
    }
}

impl std::fmt::Display for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddingProvider::HuggingFace => write!(f, "huggingface"),
            EmbeddingProvider::OpenAI => write!(f, "openai"),
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding backend (huggingface, openai).
    pub provider: EmbeddingProvider,
    /// Embedding model to use.
    pub model: String,
    /// Override for the API base URL. None uses the backend's public endpoint.
    pub api_base: Option<String>,
    /// Environment variable holding the API token. None uses the
    /// backend's conventional variable.
    pub api_key_env: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::HuggingFace,
            model: "BAAI/bge-small-en-v1.5".to_string(),
            api_base: None,
            api_key_env: None,
            timeout_secs: 30,
        }
    }
}

impl EmbeddingSettings {
    /// The environment variable the API token is read from.
    pub fn key_env(&self) -> &str {
        match (&self.api_key_env, self.provider) {
            (Some(var), _) => var,
            (None, EmbeddingProvider::HuggingFace) => "HUGGINGFACEHUB_API_TOKEN",
            (None, EmbeddingProvider::OpenAI) => "OPENAI_API_KEY",
        }
    }
}

/// Chat-completion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Chat model identifier.
    pub model: String,
    /// Base URL of the OpenAI-compatible chat API.
    pub api_base: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Sampling temperature. None leaves it to the provider.
    pub temperature: Option<f32>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "llama-3.1-8b-instant".to_string(),
            api_base: "https://api.groq.com/openai/v1".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            temperature: None,
            timeout_secs: 60,
        }
    }
}

/// How the retrieval index is kept between requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IndexMode {
    /// Build once, share read-only, rebuild only on explicit refresh.
    #[default]
    Cached,
    /// Reload the document and rebuild the index for every question.
    PerRequest,
}

impl std::str::FromStr for IndexMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "cached" => Ok(IndexMode::Cached),
            "per_request" => Ok(IndexMode::PerRequest),
            _ => Err(format!("Unknown index mode: {}", s)),
        }
    }
}

impl std::fmt::Display for IndexMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexMode::Cached => write!(f, "cached"),
            IndexMode::PerRequest => write!(f, "per_request"),
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Number of chunks passed to the LLM as context.
    pub top_k: usize,
    /// Index lifecycle.
    pub index_mode: IndexMode,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 4,
            index_mode: IndexMode::Cached,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory holding a `prompts.toml` that overrides the default templates.
    pub custom_dir: Option<String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::FaqbotError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("faqbot")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded FAQ document path.
    pub fn document_path(&self) -> PathBuf {
        Self::expand_path(&self.document.path)
    }
}
