use serde::Serialize;

/// Errors raised while analyzing a piece of text.
///
/// Every variant carries the original cause so the boundary can report it verbatim.
#[derive(Debug, thiserror::Error, Serialize, Clone, PartialEq)]
pub enum AnalysisError {
    /// The recognizer produced a span that does not index into the analyzed text.
    #[error("invalid entity span {start}..{end} for text of {len} bytes")]
    InvalidSpan { start: usize, end: usize, len: usize },
    /// The entity recognizer itself failed.
    #[error("entity recognizer failed: {0}")]
    Recognizer(String),
    /// The summarizer found no scorable terms across the document's sentences.
    #[error("empty vocabulary; perhaps the documents only contain stop words")]
    EmptyVocabulary,
    /// A concurrent analysis task panicked or was cancelled.
    #[error("analysis task failed: {0}")]
    Worker(String),
}

impl From<tokio::task::JoinError> for AnalysisError {
    fn from(err: tokio::task::JoinError) -> Self {
        AnalysisError::Worker(err.to_string())
    }
}
