//! API Tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::brain::{
    AnalysisError, EntityRecognizer, NlpModels, RecognizedEntity, TextAnalyzer,
};
use crate::config::Config;
use crate::server::{create_router, AppState};

fn app() -> Router {
    create_router(AppState::new(TextAnalyzer::new(), Config::default()))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[cfg(test)]
mod route_tests {
    use super::*;

    #[tokio::test]
    async fn test_root_banner() {
        let (status, body) = send(app(), Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"message": "Welcome to Dialogix NLP Visualizer", "status": "online"})
        );
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/health")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}

#[cfg(test)]
mod analyze_tests {
    use super::*;

    #[tokio::test]
    async fn test_message_only() {
        let (status, body) = send(
            app(),
            Method::POST,
            "/api/nlp/analyze",
            Some(json!({"text": "Thanks so much!"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let object = body.as_object().unwrap();
        assert!(!object.contains_key("document_summary"));
        assert!(!object.contains_key("document_entities"));
        assert!(body["intents"]["gratitude"].as_f64().unwrap() > 0.0);

        let sentiment = body["sentiment"].as_object().unwrap();
        let mut keys: Vec<&str> = sentiment.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["compound", "negative", "neutral", "positive"]);
    }

    #[tokio::test]
    async fn test_with_document() {
        let (status, body) = send(
            app(),
            Method::POST,
            "/api/nlp/analyze",
            Some(json!({
                "text": "Who lives there?",
                "document": "Sherlock Holmes lives on Baker Street."
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["document_summary"], "Sherlock Holmes lives on Baker Street.");
        let entities = body["document_entities"].as_array().unwrap();
        assert_eq!(
            entities[0],
            json!({"text": "Sherlock Holmes", "label": "PERSON", "start": 0, "end": 15})
        );
    }

    #[tokio::test]
    async fn test_missing_text_is_unprocessable() {
        let (status, body) = send(
            app(),
            Method::POST,
            "/api/nlp/analyze",
            Some(json!({"document": "no text"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_empty_text_is_analyzed() {
        let (status, body) = send(
            app(),
            Method::POST,
            "/api/nlp/analyze",
            Some(json!({"text": ""})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["intents"], json!({"general": 1.0}));
        assert_eq!(body["entities"], json!([]));
    }

    #[tokio::test]
    async fn test_empty_document_is_omitted() {
        let (status, body) = send(
            app(),
            Method::POST,
            "/api/nlp/analyze",
            Some(json!({"text": "hello", "document": ""})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let object = body.as_object().unwrap();
        assert!(!object.contains_key("document_summary"));
        assert!(!object.contains_key("document_entities"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_unprocessable() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/nlp/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"text": 42}"#))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_analysis_failure_is_500_with_cause() {
        struct Broken;

        impl EntityRecognizer for Broken {
            fn recognize(&self, _text: &str) -> Result<Vec<RecognizedEntity>, AnalysisError> {
                Err(AnalysisError::Recognizer("weights missing".to_string()))
            }

            fn name(&self) -> &str {
                "broken"
            }
        }

        let models = NlpModels {
            recognizer: Arc::new(Broken),
            ..NlpModels::builtin()
        };
        let app = create_router(AppState::new(
            TextAnalyzer::with_models(&models),
            Config::default(),
        ));

        let (status, body) = send(
            app,
            Method::POST,
            "/api/nlp/analyze",
            Some(json!({"text": "hello"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"detail": "Error analyzing text: entity recognizer failed: weights missing"})
        );
    }

    #[tokio::test]
    async fn test_prompt_context() {
        let (status, body) = send(
            app(),
            Method::POST,
            "/api/nlp/prompt-context",
            Some(json!({"text": "Hello! I love visiting London."})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let context = body["context"].as_str().unwrap();
        assert!(context.starts_with("User sentiment: positive\nDetected intent: greeting"));
        assert!(context.contains("London (GPE)"));
    }
}
