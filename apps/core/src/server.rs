//! HTTP surface.
//!
//! Routes:
//! - `GET /`: service banner
//! - `GET /health`: liveness
//! - `POST /api/nlp/analyze`: full analysis of a message and optional document
//! - `POST /api/nlp/prompt-context`: the same analysis rendered as persona prompt context

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::Request,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::brain::{sanitize, AnalysisInput, AnalysisResult, TextAnalyzer};
use crate::config::Config;
use crate::error::AppError;
use crate::models::{AnalyzeRequest, ServiceStatus};

/// Words that trigger an offensive-content warning in the logs
const OFFENSIVE_WORDS: &[&str] = &["fuck", "shit", "ass", "bitch"];

/// Characters of the message echoed in the request log
const PREVIEW_CHARS: usize = 30;

/// Shared state for all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub analyzer: Arc<TextAnalyzer>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(analyzer: TextAnalyzer, config: Config) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            config: Arc::new(config),
        }
    }

    async fn run(&self, input: AnalysisInput, max_length: usize) -> Result<AnalysisResult, AppError> {
        let result = Arc::clone(&self.analyzer)
            .analyze_concurrently(input, max_length)
            .await?;
        Ok(sanitize(result))
    }
}

/// Body of `POST /api/nlp/prompt-context`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PromptContext {
    pub context: String,
}

/// Build the service router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/nlp/analyze", post(analyze))
        .route("/api/nlp/prompt-context", post(prompt_context))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                info_span!(
                    "http_request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(cors)
        .with_state(state)
}

async fn root() -> Json<ServiceStatus> {
    Json(ServiceStatus::default())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let request = accept(payload)?;
    let result = state
        .run(request.into(), state.config.summary_max_length)
        .await?;
    info!("Analysis completed: {}", result.summary());
    Ok(Json(result))
}

async fn prompt_context(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<PromptContext>, AppError> {
    let request = accept(payload)?;
    let result = state
        .run(request.into(), state.config.prompt_summary_max_length)
        .await?;
    info!("Prompt context built: {}", result.summary());
    Ok(Json(PromptContext {
        context: result.to_prompt_context(),
    }))
}

/// Unwrap a request body and log its arrival
fn accept(payload: Result<Json<AnalyzeRequest>, JsonRejection>) -> Result<AnalyzeRequest, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let preview: String = request.text.chars().take(PREVIEW_CHARS).collect();
    info!("Received analysis request for: {}...", preview);
    if is_offensive(&request.text) {
        warn!("Potentially offensive content detected; analysis will proceed");
    }

    Ok(request)
}

/// True if any word of `text` is on the offensive list
pub fn is_offensive(text: &str) -> bool {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| OFFENSIVE_WORDS.contains(&word))
}
