use std::io;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::brain::AnalysisError;

/// Application-wide error type, consolidating all possible errors into a single enum.
#[derive(Debug, Error)]
pub enum AppError {
    /// A failure inside the analysis pipeline.
    #[error("{0}")]
    Analysis(#[from] AnalysisError),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents data validation errors (e.g., a request body without `text`).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., an unreadable lexicon file).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            AppError::Analysis(e) => AppError::Analysis(e.clone()),
            AppError::Io(e) => AppError::Io(io::Error::new(e.kind(), e.to_string())),
            AppError::Validation(s) => AppError::Validation(s.clone()),
            AppError::Config(s) => AppError::Config(s.clone()),
            AppError::Internal(s) => AppError::Internal(s.clone()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(invalid_fields(&err))
    }
}

/// Names the fields that failed validation, e.g. `invalid value for: port, host`
pub fn invalid_fields(err: &validator::ValidationErrors) -> String {
    let mut fields: Vec<String> = err.field_errors().keys().map(|k| k.to_string()).collect();
    fields.sort_unstable();
    format!("invalid value for: {}", fields.join(", "))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Analysis(e) => {
                tracing::error!("Error in NLP analysis: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error analyzing text: {}", e),
                )
            }
            other => {
                tracing::error!("Error in NLP analysis: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error analyzing text: {}", other),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
