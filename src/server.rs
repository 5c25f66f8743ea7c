//! HTTP API for the support bot.
//!
//! `POST /ask` answers a question; `GET /health` and `GET /` are liveness
//! probes that never touch the providers; `POST /index/refresh` rebuilds the
//! retrieval index from the FAQ file.
//!
//! There is no authentication, rate limiting or request size limit.

use crate::rag::QueryPipeline;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared application state.
struct AppState {
    pipeline: Arc<QueryPipeline>,
}

// === Request/Response Types ===

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub chunks: usize,
    pub built_at: String,
}

/// Build the router around a pipeline.
pub fn router(pipeline: Arc<QueryPipeline>) -> Router {
    let state = Arc::new(AppState { pipeline });

    // The chat UI is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/ask", post(ask))
        .route("/index/refresh", post(refresh_index))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve until Ctrl+C.
pub async fn serve(listener: TcpListener, pipeline: Arc<QueryPipeline>) -> std::io::Result<()> {
    axum::serve(listener, router(pipeline))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

fn error_response(status: StatusCode, detail: String) -> Response {
    (status, Json(ErrorResponse { detail })).into_response()
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected /ask request: {}", rejection.body_text());
            return error_response(rejection.status(), rejection.body_text());
        }
    };

    match state.pipeline.query(&req.question).await {
        Ok(response) => Json(AskResponse {
            answer: response.answer,
        })
        .into_response(),
        Err(e) => {
            error!("Failed to answer question: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn refresh_index(State(state): State<Arc<AppState>>) -> Response {
    match state.pipeline.refresh().await {
        Ok(index) => Json(RefreshResponse {
            chunks: index.chunk_count(),
            built_at: index.built_at().to_rfc3339(),
        })
        .into_response(),
        Err(e) => {
            error!("Failed to refresh index: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::TextSplitter;
    use crate::embedding::Embedder;
    use crate::llm::ChatModel;
    use crate::testing::{CannedChat, FailingChat, FailingEmbedder, KeywordEmbedder};
    use serde_json::Value;
    use std::path::PathBuf;

    const FAQ: &str =
        "Our return policy allows returns within 30 days. Shipping is free over $50.";

    async fn spawn(path: PathBuf, embedder: Arc<dyn Embedder>, chat: Arc<dyn ChatModel>) -> String {
        let pipeline = QueryPipeline::new(path, TextSplitter::new(30, ".").unwrap(), embedder, chat)
            .with_top_k(1);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(Arc::new(pipeline))).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn faq_file() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faq.txt");
        std::fs::write(&path, FAQ).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_health_makes_no_provider_calls() {
        let (_dir, path) = faq_file();
        let embedder = Arc::new(FailingEmbedder::default());
        let chat = Arc::new(FailingChat::default());
        let base = spawn(path, embedder.clone(), chat.clone()).await;

        for route in ["/health", "/"] {
            let response = reqwest::get(format!("{}{}", base, route)).await.unwrap();
            assert_eq!(response.status(), 200);
            let body: Value = response.json().await.unwrap();
            assert_eq!(body["status"], "healthy");
        }

        assert_eq!(embedder.calls(), 0);
        assert_eq!(chat.calls(), 0);
    }

    #[tokio::test]
    async fn test_ask_returns_model_answer_verbatim() {
        let (_dir, path) = faq_file();
        let chat = Arc::new(CannedChat::new("Returns are accepted within 30 days."));
        let base = spawn(path, Arc::new(KeywordEmbedder::new()), chat.clone()).await;

        let response = reqwest::Client::new()
            .post(format!("{}/ask", base))
            .json(&serde_json::json!({"question": "What is the return policy?"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: AskResponse = response.json().await.unwrap();
        assert_eq!(body.answer, "Returns are accepted within 30 days.");

        let prompt = chat.last_prompt().unwrap();
        assert!(prompt
            .system()
            .unwrap()
            .contains("Our return policy allows returns within 30 days"));
    }

    #[tokio::test]
    async fn test_missing_document_is_500_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-faq.txt");
        let base = spawn(path, Arc::new(KeywordEmbedder::new()), Arc::new(CannedChat::new("ok"))).await;

        let response = reqwest::Client::new()
            .post(format!("{}/ask", base))
            .json(&serde_json::json!({"question": "What is the return policy?"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        let body: ErrorResponse = response.json().await.unwrap();
        assert!(body.detail.contains("missing-faq.txt"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_500_with_detail() {
        let (_dir, path) = faq_file();
        let base = spawn(path, Arc::new(KeywordEmbedder::new()), Arc::new(FailingChat::default())).await;

        let response = reqwest::Client::new()
            .post(format!("{}/ask", base))
            .json(&serde_json::json!({"question": "Is shipping free?"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        let body: ErrorResponse = response.json().await.unwrap();
        assert_eq!(body.detail, "LLM error: rate limit exceeded");
    }

    #[tokio::test]
    async fn test_malformed_body_rejected_before_pipeline() {
        let (_dir, path) = faq_file();
        let embedder = Arc::new(KeywordEmbedder::new());
        let chat = Arc::new(CannedChat::new("ok"));
        let base = spawn(path, embedder.clone(), chat.clone()).await;
        let client = reqwest::Client::new();

        let missing_field = client
            .post(format!("{}/ask", base))
            .json(&serde_json::json!({"query": "wrong field"}))
            .send()
            .await
            .unwrap();
        assert!(missing_field.status().is_client_error());
        let body: ErrorResponse = missing_field.json().await.unwrap();
        assert!(!body.detail.is_empty());

        let bad_json = client
            .post(format!("{}/ask", base))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert!(bad_json.status().is_client_error());

        assert_eq!(embedder.calls(), 0);
        assert_eq!(chat.calls(), 0);
    }

    #[tokio::test]
    async fn test_refresh_reports_chunk_count() {
        let (_dir, path) = faq_file();
        let base = spawn(path, Arc::new(KeywordEmbedder::new()), Arc::new(CannedChat::new("ok"))).await;

        let response = reqwest::Client::new()
            .post(format!("{}/index/refresh", base))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: RefreshResponse = response.json().await.unwrap();
        assert_eq!(body.chunks, 2);
    }
}
