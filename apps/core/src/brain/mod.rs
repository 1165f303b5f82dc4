//! # Brain Module
//!
//! Fast, non-LLM text analysis for Dialogix.
//! Produces the signals persona responses are conditioned on.
//!
//! ## Components
//! - `sentiment`: VADER-style lexicon sentiment scoring
//! - `entities`: Named entity extraction over a pluggable recognizer
//! - `intent`: Keyword-based multi-label intent classification
//! - `sentences`: Sentence boundary detection
//! - `summarizer`: TF-IDF extractive summarization
//! - `context_packet`: Input/output data structures
//! - `sanitize`: Result normalization and loose-input validation
//! - `analyzer`: Main orchestrator

pub mod analyzer;
pub mod context_packet;
pub mod entities;
pub mod error;
pub mod intent;
pub mod sanitize;
pub mod sentences;
pub mod sentiment;
pub mod summarizer;

// Re-export main types for convenience
pub use analyzer::{NlpModels, TextAnalyzer, DEFAULT_SUMMARY_MAX_LENGTH, PROMPT_SUMMARY_MAX_LENGTH};
pub use context_packet::{AnalysisInput, AnalysisResult, Tone};
pub use entities::{
    EntityExtractor, EntityRecognizer, EntitySpan, GazetteerRecognizer, RecognizedEntity,
};
pub use error::AnalysisError;
pub use intent::{IntentCategory, IntentClassifier, IntentLexicon, IntentScores};
pub use sanitize::{sanitize, sanitize_value};
pub use sentiment::{PolarityLexicon, SentimentScore, SentimentScorer};
pub use summarizer::Summarizer;
