//! Context Packet - Output structure for text analysis.
//!
//! Holds the signals extracted from a message (and optional companion document)
//! and renders them as plain-language context for downstream persona prompts.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entities::EntitySpan;
use super::intent::{IntentCategory, IntentScores};
use super::sentiment::SentimentScore;

/// Compound score at or above which a text reads as positive
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound score at or below which a text reads as negative
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Text to analyze, with an optional longer document to summarize
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub text: String,
    #[serde(default)]
    pub document: Option<String>,
}

impl AnalysisInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            document: None,
        }
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }
}

/// Overall tone bucketed from the compound sentiment score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Neutral,
    Negative,
}

impl Tone {
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            Tone::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            Tone::Negative
        } else {
            Tone::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tone::Positive => "positive",
            Tone::Neutral => "neutral",
            Tone::Negative => "negative",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Complete analysis of one request.
///
/// The `document_*` fields are present only when a non-empty document was supplied, and are
/// omitted from the JSON otherwise. Offsets in `document_entities` refer to
/// `document_summary`, not to the original document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiment: SentimentScore,
    pub entities: Vec<EntitySpan>,
    pub intents: IntentScores,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_entities: Option<Vec<EntitySpan>>,
}

impl AnalysisResult {
    pub fn tone(&self) -> Tone {
        Tone::from_compound(self.sentiment.compound)
    }

    /// Highest-scoring intent, `general` for the fallback
    pub fn primary_intent(&self) -> IntentCategory {
        self.intents.primary()
    }

    /// Entities as `"text (LABEL)"`, comma separated
    pub fn entity_listing(&self) -> String {
        self.entities
            .iter()
            .map(|e| format!("{} ({})", e.text, e.label))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Render the analysis as context lines for a persona prompt
    pub fn to_prompt_context(&self) -> String {
        let mut lines = vec![
            format!("User sentiment: {}", self.tone()),
            format!("Detected intent: {}", self.primary_intent()),
        ];

        if !self.entities.is_empty() {
            lines.push(format!("Entities mentioned: {}", self.entity_listing()));
        }

        if let Some(summary) = &self.document_summary {
            lines.push(format!("Document summary: {}", summary));
        }

        lines.join("\n")
    }

    /// Get a summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Tone: {} ({:.3}), Intent: {}, Entities: {}, Document: {}",
            self.tone(),
            self.sentiment.compound,
            self.primary_intent(),
            self.entities.len(),
            if self.document_summary.is_some() { "yes" } else { "no" }
        )
    }
}
