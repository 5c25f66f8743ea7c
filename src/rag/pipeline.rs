//! The question-answering pipeline.
//!
//! Each query runs `Load -> Index -> Retrieve -> Generate` in order. In
//! cached mode the first two stages run once and the index is shared until
//! [`QueryPipeline::refresh`] replaces it.

use super::index::RetrievalIndex;
use crate::chunking::{load_and_split, Chunk, TextSplitter};
use crate::config::{IndexMode, PromptTemplate, Prompts, Settings};
use crate::embedding::{create_embedder, Embedder};
use crate::error::Result;
use crate::llm::{ChatModel, OpenAiCompatibleChat};
use crate::vector_store::SearchResult;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Index,
    Retrieve,
    Generate,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Index => "index",
            Stage::Retrieve => "retrieve",
            Stage::Generate => "generate",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// An answer plus the chunks it was grounded on.
#[derive(Debug, Clone)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// Chunks passed to the model as context, best first.
    pub sources: Vec<SearchResult>,
}

/// Retrieval-augmented question answering over one FAQ document.
pub struct QueryPipeline {
    document_path: PathBuf,
    splitter: TextSplitter,
    embedder: Arc<dyn Embedder>,
    chat: Arc<dyn ChatModel>,
    template: PromptTemplate,
    top_k: usize,
    mode: IndexMode,
    cached: RwLock<Option<Arc<RetrievalIndex>>>,
}

impl QueryPipeline {
    /// Create a pipeline with the default template, `top_k` of 4 and a
    /// cached index.
    pub fn new(
        document_path: impl Into<PathBuf>,
        splitter: TextSplitter,
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            document_path: document_path.into(),
            splitter,
            embedder,
            chat,
            template: PromptTemplate::default(),
            top_k: 4,
            mode: IndexMode::Cached,
            cached: RwLock::new(None),
        }
    }

    /// Build the pipeline and its providers from settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let embedder = create_embedder(&settings.embedding)?;
        let chat: Arc<dyn ChatModel> = Arc::new(OpenAiCompatibleChat::from_settings(&settings.llm)?);
        info!("Using chat model {} at {}", settings.llm.model, settings.llm.api_base);

        Self::with_providers(settings, embedder, chat)
    }

    /// Build the pipeline from settings with the given providers.
    pub fn with_providers(
        settings: &Settings,
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
    ) -> Result<Self> {
        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;
        let splitter = TextSplitter::new(
            settings.document.chunk_size,
            settings.document.separator.clone(),
        )?;

        Ok(Self::new(settings.document_path(), splitter, embedder, chat)
            .with_template(prompts.support)
            .with_top_k(settings.retrieval.top_k)
            .with_index_mode(settings.retrieval.index_mode))
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_index_mode(mut self, mode: IndexMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn document_path(&self) -> &PathBuf {
        &self.document_path
    }

    pub fn index_mode(&self) -> IndexMode {
        self.mode
    }

    /// Answer a question.
    #[instrument(skip(self))]
    pub async fn query(&self, question: &str) -> Result<RagResponse> {
        info!("Processing question");

        let index = self.index().await?;

        debug!(stage = %Stage::Retrieve, k = self.top_k, "Retrieving context");
        let sources = index.search(question, self.top_k).await?;

        debug!(stage = %Stage::Generate, model = self.chat.model(), "Generating answer");
        let prompt = self.template.assemble(question, &sources);
        let answer = self.chat.complete(&prompt).await?;

        debug!(stage = %Stage::Done, sources = sources.len(), "Answered");
        Ok(RagResponse { answer, sources })
    }

    /// Load and split the document without embedding anything.
    pub async fn chunks(&self) -> Result<Vec<Chunk>> {
        load_and_split(&self.document_path, &self.splitter).await
    }

    /// Build the shared index ahead of the first question. Does nothing in
    /// per-request mode.
    pub async fn warm(&self) -> Result<usize> {
        match self.mode {
            IndexMode::PerRequest => Ok(0),
            IndexMode::Cached => Ok(self.index().await?.chunk_count()),
        }
    }

    /// Rebuild the index from the document and swap it in.
    ///
    /// The previous index keeps serving until the new one is ready. On
    /// failure the previous index stays in place.
    pub async fn refresh(&self) -> Result<Arc<RetrievalIndex>> {
        let index = Arc::new(self.build_index().await?);
        if self.mode == IndexMode::Cached {
            *self.cached.write().await = Some(index.clone());
        }
        info!("Index refreshed ({} chunks)", index.chunk_count());
        Ok(index)
    }

    async fn index(&self) -> Result<Arc<RetrievalIndex>> {
        if self.mode == IndexMode::PerRequest {
            return Ok(Arc::new(self.build_index().await?));
        }

        if let Some(index) = self.cached.read().await.as_ref() {
            return Ok(index.clone());
        }

        let mut cached = self.cached.write().await;
        // Another request may have built it while we waited for the lock.
        if let Some(index) = cached.as_ref() {
            return Ok(index.clone());
        }
        let index = Arc::new(self.build_index().await?);
        *cached = Some(index.clone());
        Ok(index)
    }

    async fn build_index(&self) -> Result<RetrievalIndex> {
        debug!(stage = %Stage::Load, path = %self.document_path.display(), "Loading document");
        let chunks = self.chunks().await?;

        debug!(stage = %Stage::Index, chunks = chunks.len(), "Building index");
        RetrievalIndex::build(chunks, self.embedder.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaqbotError;
    use crate::rag::Role;
    use crate::testing::{CannedChat, FailingChat, FailingEmbedder, KeywordEmbedder};
    use std::path::Path;

    const FAQ: &str =
        "Our return policy allows returns within 30 days. Shipping is free over $50.";

    fn write_faq(dir: &Path, text: &str) -> PathBuf {
        let path = dir.join("faq.txt");
        std::fs::write(&path, text).unwrap();
        path
    }

    fn pipeline(
        path: PathBuf,
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
    ) -> QueryPipeline {
        QueryPipeline::new(path, TextSplitter::new(30, ".").unwrap(), embedder, chat).with_top_k(1)
    }

    #[tokio::test]
    async fn test_return_policy_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let chat = Arc::new(CannedChat::new("You can return items within 30 days."));
        let pipeline = pipeline(
            write_faq(dir.path(), FAQ),
            Arc::new(KeywordEmbedder::new()),
            chat.clone(),
        );

        let response = pipeline.query("What is the return policy?").await.unwrap();

        assert_eq!(response.answer, "You can return items within 30 days.");
        assert_eq!(response.sources.len(), 1);
        assert_eq!(
            response.sources[0].content(),
            "Our return policy allows returns within 30 days"
        );

        let prompt = chat.last_prompt().unwrap();
        assert_eq!(prompt.messages[0].role, Role::System);
        assert!(prompt
            .system()
            .unwrap()
            .contains("Our return policy allows returns within 30 days"));
        assert!(!prompt.system().unwrap().contains("Shipping"));
        assert_eq!(prompt.user().unwrap(), "What is the return policy?");
    }

    #[tokio::test]
    async fn test_cached_mode_builds_index_once() {
        let dir = tempfile::tempdir().unwrap();
        let embedder = Arc::new(KeywordEmbedder::new());
        let pipeline = pipeline(
            write_faq(dir.path(), FAQ),
            embedder.clone(),
            Arc::new(CannedChat::new("ok")),
        );

        pipeline.query("return?").await.unwrap();
        pipeline.query("shipping?").await.unwrap();

        // One batch for the chunks, one embed per question.
        assert_eq!(embedder.calls(), 3);
    }

    #[tokio::test]
    async fn test_per_request_mode_sees_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_faq(dir.path(), FAQ);
        let pipeline = pipeline(
            path.clone(),
            Arc::new(KeywordEmbedder::new()),
            Arc::new(CannedChat::new("ok")),
        )
        .with_index_mode(IndexMode::PerRequest);

        let before = pipeline.query("refund?").await.unwrap();
        assert!(before.sources[0].content().starts_with("Our return"));

        std::fs::write(&path, "Refunds are issued in 5 days.").unwrap();
        let after = pipeline.query("refund?").await.unwrap();
        assert_eq!(after.sources[0].content(), "Refunds are issued in 5 days");
    }

    #[tokio::test]
    async fn test_refresh_swaps_cached_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_faq(dir.path(), FAQ);
        let pipeline = pipeline(
            path.clone(),
            Arc::new(KeywordEmbedder::new()),
            Arc::new(CannedChat::new("ok")),
        );

        assert_eq!(pipeline.warm().await.unwrap(), 2);

        std::fs::write(&path, "Refunds are issued in 5 days.").unwrap();
        let stale = pipeline.query("refund?").await.unwrap();
        assert!(stale.sources[0].content().starts_with("Our return"));

        assert_eq!(pipeline.refresh().await.unwrap().chunk_count(), 1);
        let fresh = pipeline.query("refund?").await.unwrap();
        assert_eq!(fresh.sources[0].content(), "Refunds are issued in 5 days");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_faq(dir.path(), FAQ);
        let pipeline = pipeline(
            path.clone(),
            Arc::new(KeywordEmbedder::new()),
            Arc::new(CannedChat::new("ok")),
        );
        pipeline.warm().await.unwrap();

        std::fs::remove_file(&path).unwrap();
        assert!(pipeline.refresh().await.is_err());
        assert!(pipeline.query("return?").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_document_aborts_before_providers() {
        let dir = tempfile::tempdir().unwrap();
        let embedder = Arc::new(KeywordEmbedder::new());
        let chat = Arc::new(CannedChat::new("ok"));
        let pipeline = pipeline(dir.path().join("missing.txt"), embedder.clone(), chat.clone());

        let err = pipeline.query("anything").await.unwrap_err();
        assert!(matches!(err, FaqbotError::Document { .. }));
        assert!(err.to_string().contains("missing.txt"));
        assert_eq!(embedder.calls(), 0);
        assert_eq!(chat.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_build_is_retried_on_next_query() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faq.txt");
        let pipeline = pipeline(
            path.clone(),
            Arc::new(KeywordEmbedder::new()),
            Arc::new(CannedChat::new("ok")),
        );

        assert!(pipeline.warm().await.is_err());
        std::fs::write(&path, FAQ).unwrap();
        assert!(pipeline.query("return?").await.is_ok());
    }

    #[tokio::test]
    async fn test_provider_errors_propagate_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_faq(dir.path(), FAQ);

        let embedder = Arc::new(FailingEmbedder::default());
        let chat = Arc::new(CannedChat::new("ok"));
        let failing_embed = pipeline(path.clone(), embedder.clone(), chat.clone());
        let err = failing_embed.query("return?").await.unwrap_err();
        assert_eq!(err.to_string(), "Embedding generation failed: embedding service unavailable");
        assert_eq!(chat.calls(), 0);

        let failing_chat = pipeline(path, Arc::new(KeywordEmbedder::new()), Arc::new(FailingChat::default()));
        let err = failing_chat.query("return?").await.unwrap_err();
        assert_eq!(err.to_string(), "LLM error: rate limit exceeded");
    }

    #[test]
    fn test_with_providers_uses_settings() {
        let mut settings = Settings::default();
        settings.document.path = "/srv/faq.txt".to_string();
        settings.retrieval.top_k = 2;
        settings.retrieval.index_mode = IndexMode::PerRequest;

        let pipeline = QueryPipeline::with_providers(
            &settings,
            Arc::new(KeywordEmbedder::new()),
            Arc::new(CannedChat::new("ok")),
        )
        .unwrap();

        assert_eq!(pipeline.document_path(), &PathBuf::from("/srv/faq.txt"));
        assert_eq!(pipeline.index_mode(), IndexMode::PerRequest);
        assert_eq!(pipeline.top_k, 2);
    }
}
