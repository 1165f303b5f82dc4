//! Text Analyzer - Main orchestrator for the analysis pipeline.
//!
//! Coordinates sentiment scoring, entity extraction, intent classification and,
//! when a document is supplied, summarization followed by entity extraction on the
//! summary. A request either yields a complete [`AnalysisResult`] or an error.

use std::sync::Arc;

use super::context_packet::{AnalysisInput, AnalysisResult};
use super::entities::{EntityExtractor, EntityRecognizer, EntitySpan, GazetteerRecognizer};
use super::error::AnalysisError;
use super::intent::{IntentClassifier, IntentLexicon};
use super::sentiment::{PolarityLexicon, SentimentScorer};
use super::summarizer::Summarizer;

/// Summary length used by the analyze endpoint
pub const DEFAULT_SUMMARY_MAX_LENGTH: usize = 500;

/// Summary length used when building persona prompt context
pub const PROMPT_SUMMARY_MAX_LENGTH: usize = 800;

/// Read-only models shared by every request.
///
/// Built once at startup. A missing polarity lexicon means the sentiment model is
/// unavailable and scores degrade to neutral.
#[derive(Clone)]
pub struct NlpModels {
    pub polarity: Option<Arc<PolarityLexicon>>,
    pub recognizer: Arc<dyn EntityRecognizer>,
    pub intents: Arc<IntentLexicon>,
}

impl std::fmt::Debug for NlpModels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NlpModels")
            .field("polarity", &self.polarity.as_ref().map(|l| l.len()))
            .field("recognizer", &self.recognizer.name())
            .field("intents", &self.intents.categories().count())
            .finish()
    }
}

impl NlpModels {
    /// The bundled lexicons and gazetteer
    pub fn builtin() -> Self {
        Self {
            polarity: Some(Arc::new(PolarityLexicon::builtin())),
            recognizer: Arc::new(GazetteerRecognizer::builtin()),
            intents: Arc::new(IntentLexicon::default()),
        }
    }
}

/// Main analyzer that orchestrates all analysis components
#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    sentiment: SentimentScorer,
    entities: EntityExtractor,
    intents: IntentClassifier,
    summarizer: Summarizer,
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextAnalyzer {
    /// Create an analyzer over the bundled models
    pub fn new() -> Self {
        Self::with_models(&NlpModels::builtin())
    }

    pub fn with_models(models: &NlpModels) -> Self {
        let sentiment = match &models.polarity {
            Some(lexicon) => SentimentScorer::with_lexicon(Arc::clone(lexicon)),
            None => SentimentScorer::unavailable(),
        };

        Self {
            sentiment,
            entities: EntityExtractor::with_recognizer(Arc::clone(&models.recognizer)),
            intents: IntentClassifier::with_lexicon(Arc::clone(&models.intents)),
            summarizer: Summarizer::new(),
        }
    }

    /// Sentiment, entities and intents of a message, without any document
    pub fn analyze_message(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        Ok(AnalysisResult {
            sentiment: self.sentiment.score(text),
            entities: self.entities.extract(text)?,
            intents: self.intents.classify(text),
            document_summary: None,
            document_entities: None,
        })
    }

    /// Analyze with the endpoint's summary length
    pub fn analyze(&self, input: &AnalysisInput) -> Result<AnalysisResult, AnalysisError> {
        self.analyze_with_summary_length(input, DEFAULT_SUMMARY_MAX_LENGTH)
    }

    /// Analyze, summarizing any document to roughly `max_length` characters
    pub fn analyze_with_summary_length(
        &self,
        input: &AnalysisInput,
        max_length: usize,
    ) -> Result<AnalysisResult, AnalysisError> {
        let mut result = self.analyze_message(&input.text)?;

        if let Some(document) = supplied(input.document.as_deref()) {
            let (summary, entities) = self.analyze_document(document, max_length)?;
            result.document_summary = Some(summary);
            result.document_entities = Some(entities);
        }

        Ok(result)
    }

    /// Same as [`Self::analyze_with_summary_length`], with each analysis on the
    /// blocking pool. A panicked task fails the whole request.
    pub async fn analyze_concurrently(
        self: Arc<Self>,
        input: AnalysisInput,
        max_length: usize,
    ) -> Result<AnalysisResult, AnalysisError> {
        let text: Arc<str> = Arc::from(input.text);

        let sentiment = {
            let (analyzer, text) = (Arc::clone(&self), Arc::clone(&text));
            tokio::task::spawn_blocking(move || analyzer.sentiment.score(&text))
        };
        let entities = {
            let (analyzer, text) = (Arc::clone(&self), Arc::clone(&text));
            tokio::task::spawn_blocking(move || analyzer.entities.extract(&text))
        };
        let intents = {
            let (analyzer, text) = (Arc::clone(&self), Arc::clone(&text));
            tokio::task::spawn_blocking(move || analyzer.intents.classify(&text))
        };
        let document = {
            let analyzer = Arc::clone(&self);
            tokio::task::spawn_blocking(move || {
                supplied(input.document.as_deref())
                    .map(|doc| analyzer.analyze_document(doc, max_length))
                    .transpose()
            })
        };

        let (sentiment, entities, intents, document) =
            tokio::join!(sentiment, entities, intents, document);

        let (document_summary, document_entities) = match document?? {
            Some((summary, entities)) => (Some(summary), Some(entities)),
            None => (None, None),
        };

        Ok(AnalysisResult {
            sentiment: sentiment?,
            entities: entities??,
            intents: intents?,
            document_summary,
            document_entities,
        })
    }

    /// Summary of a document and the entities found in that summary
    fn analyze_document(
        &self,
        document: &str,
        max_length: usize,
    ) -> Result<(String, Vec<EntitySpan>), AnalysisError> {
        let summary = self.summarizer.summarize(document, max_length)?;
        let entities = self.entities.extract(&summary)?;
        Ok((summary, entities))
    }
}

/// A document counts as supplied only when it is non-empty
fn supplied(document: Option<&str>) -> Option<&str> {
    document.filter(|doc| !doc.is_empty())
}
