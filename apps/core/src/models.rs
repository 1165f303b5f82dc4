use serde::{Deserialize, Serialize};

use crate::brain::AnalysisInput;

/// Body of `POST /api/nlp/analyze`.
///
/// `text` is required but may be empty; an empty `document` counts as absent.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnalyzeRequest {
    /// The message to analyze.
    pub text: String,
    /// An optional longer document to summarize alongside the message.
    #[serde(default)]
    pub document: Option<String>,
}

impl From<AnalyzeRequest> for AnalysisInput {
    fn from(request: AnalyzeRequest) -> Self {
        AnalysisInput {
            text: request.text,
            document: request.document,
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServiceStatus {
    /// A human-readable greeting.
    pub message: String,
    /// Always `"online"` while serving.
    pub status: String,
}

impl Default for ServiceStatus {
    fn default() -> Self {
        Self {
            message: "Welcome to Dialogix NLP Visualizer".to_string(),
            status: "online".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parsing() {
        let request: AnalyzeRequest = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert!(request.document.is_none());

        let empty: AnalyzeRequest = serde_json::from_str(r#"{"text": ""}"#).unwrap();
        assert!(empty.text.is_empty());

        assert!(serde_json::from_str::<AnalyzeRequest>(r#"{"document": "d"}"#).is_err());
    }

    #[test]
    fn test_request_into_input() {
        let request = AnalyzeRequest {
            text: "hi".to_string(),
            document: Some("doc".to_string()),
        };
        let input: AnalysisInput = request.into();
        assert_eq!(input, AnalysisInput::new("hi").with_document("doc"));
    }
}
