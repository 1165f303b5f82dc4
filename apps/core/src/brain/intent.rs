//! Intent Classification using a keyword lexicon.
//!
//! Multi-label and deliberately simple: every category whose keywords appear in the
//! text gets an independent confidence. No ML model required.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::AppError;

/// Conversational intent category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    /// Greeting (hello, hi, good morning, etc.)
    Greeting,
    /// Farewell (goodbye, bye, take care, etc.)
    Farewell,
    /// Gratitude (thanks, appreciate, etc.)
    Gratitude,
    /// Question (what, why, how, etc.)
    Question,
    /// Request (please, help, could you, etc.)
    Request,
    /// Opinion (think, believe, thoughts on, etc.)
    Opinion,
    /// Agreement (yes, agree, sure, etc.)
    Agreement,
    /// Disagreement (no, wrong, not really, etc.)
    Disagreement,
    /// Confusion (confused, unclear, explain, etc.)
    Confusion,
    /// Fallback when nothing matched
    General,
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl IntentCategory {
    /// Returns the wire label for the category
    pub fn label(&self) -> &'static str {
        match self {
            IntentCategory::Greeting => "greeting",
            IntentCategory::Farewell => "farewell",
            IntentCategory::Gratitude => "gratitude",
            IntentCategory::Question => "question",
            IntentCategory::Request => "request",
            IntentCategory::Opinion => "opinion",
            IntentCategory::Agreement => "agreement",
            IntentCategory::Disagreement => "disagreement",
            IntentCategory::Confusion => "confusion",
            IntentCategory::General => "general",
        }
    }
}

/// Sparse mapping of matched categories to confidence in `[0, 1]`.
///
/// A category is present if and only if it matched. Never empty: an unmatched
/// text maps to `{"general": 1.0}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IntentScores(BTreeMap<IntentCategory, f64>);

impl<'de> Deserialize<'de> for IntentScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<IntentCategory, f64>::deserialize(deserializer).map(Self::from_map)
    }
}

impl IntentScores {
    /// The fallback mapping used when no keyword matched
    pub fn fallback() -> Self {
        let mut scores = BTreeMap::new();
        scores.insert(IntentCategory::General, 1.0);
        Self(scores)
    }

    /// Builds scores from a mapping, collapsing an empty one to the fallback
    pub fn from_map(scores: BTreeMap<IntentCategory, f64>) -> Self {
        if scores.is_empty() {
            Self::fallback()
        } else {
            Self(scores)
        }
    }

    pub fn get(&self, category: IntentCategory) -> Option<f64> {
        self.0.get(&category).copied()
    }

    pub fn contains(&self, category: IntentCategory) -> bool {
        self.0.contains_key(&category)
    }

    pub fn is_fallback(&self) -> bool {
        self.0.len() == 1 && self.0.contains_key(&IntentCategory::General)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IntentCategory, f64)> + '_ {
        self.0.iter().map(|(category, score)| (*category, *score))
    }

    /// Highest-scoring category; ties go to the category declared first
    pub fn primary(&self) -> IntentCategory {
        let mut best = IntentCategory::General;
        let mut best_score = f64::MIN;
        for (category, score) in self.iter() {
            if score > best_score {
                best = category;
                best_score = score;
            }
        }
        best
    }

    pub fn into_inner(self) -> BTreeMap<IntentCategory, f64> {
        self.0
    }
}

/// Built-in keyword table, one row per category
const DEFAULT_KEYWORDS: &[(IntentCategory, &[&str])] = &[
    (
        IntentCategory::Greeting,
        &["hello", "hi", "hey", "greetings", "good morning", "good afternoon", "good evening"],
    ),
    (
        IntentCategory::Farewell,
        &["goodbye", "bye", "see you", "farewell", "later", "take care"],
    ),
    (
        IntentCategory::Gratitude,
        &["thanks", "thank you", "appreciate", "grateful"],
    ),
    (
        IntentCategory::Question,
        &["what", "why", "how", "when", "where", "who", "which", "can you", "could you"],
    ),
    (
        IntentCategory::Request,
        &["please", "can you", "could you", "would you", "help", "assist"],
    ),
    (
        IntentCategory::Opinion,
        &["think", "believe", "opinion", "feel about", "thoughts on"],
    ),
    (
        IntentCategory::Agreement,
        &["yes", "yeah", "agree", "correct", "right", "okay", "sure"],
    ),
    (
        IntentCategory::Disagreement,
        &["no", "nope", "disagree", "incorrect", "wrong", "not really"],
    ),
    (
        IntentCategory::Confusion,
        &["confused", "don't understand", "unclear", "what do you mean", "explain"],
    ),
];

/// Read-only keyword lexicon, loaded once at startup and shared.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentLexicon {
    entries: Vec<(IntentCategory, Vec<String>)>,
}

impl Default for IntentLexicon {
    fn default() -> Self {
        Self {
            entries: DEFAULT_KEYWORDS
                .iter()
                .map(|(category, keywords)| {
                    (*category, keywords.iter().map(|k| k.to_string()).collect())
                })
                .collect(),
        }
    }
}

impl IntentLexicon {
    /// Parse a lexicon from a JSON object of `category -> [keywords]`
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let raw: BTreeMap<IntentCategory, Vec<String>> = serde_json::from_str(json)
            .map_err(|e| AppError::Config(format!("invalid intent lexicon: {}", e)))?;

        let mut entries = Vec::with_capacity(raw.len());
        for (category, keywords) in raw {
            if category == IntentCategory::General {
                return Err(AppError::Config(
                    "intent lexicon must not define the 'general' fallback".to_string(),
                ));
            }
            let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
            if keywords.is_empty() || keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(AppError::Config(format!(
                    "intent '{}' needs at least one non-empty keyword",
                    category
                )));
            }
            entries.push((category, keywords));
        }

        Ok(Self { entries })
    }

    /// Load a lexicon file written as JSON
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read intent lexicon {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub fn iter(&self) -> impl Iterator<Item = (IntentCategory, &[String])> {
        self.entries
            .iter()
            .map(|(category, keywords)| (*category, keywords.as_slice()))
    }

    pub fn categories(&self) -> impl Iterator<Item = IntentCategory> + '_ {
        self.entries.iter().map(|(category, _)| *category)
    }
}

/// Intent classifier using keyword containment
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    lexicon: Arc<IntentLexicon>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a classifier over the built-in lexicon
    pub fn new() -> Self {
        Self::with_lexicon(Arc::new(IntentLexicon::default()))
    }

    pub fn with_lexicon(lexicon: Arc<IntentLexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &IntentLexicon {
        &self.lexicon
    }

    /// Classify the intents of a text.
    ///
    /// Each keyword found anywhere in the lowercased text scores 1 point, plus 0.5 when
    /// the trimmed text starts with it. A category scores
    /// `min(1, points / (keyword_count * 0.5))`. Matching is plain substring
    /// containment, so "no" also fires inside "know".
    pub fn classify(&self, text: &str) -> IntentScores {
        let text = text.to_lowercase();
        let leading = text.trim_start();

        let mut scores = BTreeMap::new();
        for (category, keywords) in self.lexicon.iter() {
            let mut points = 0.0;
            for keyword in keywords {
                if text.contains(keyword.as_str()) {
                    points += 1.0;
                    if leading.starts_with(keyword.as_str()) {
                        points += 0.5;
                    }
                }
            }

            if points > 0.0 {
                let score: f64 = points / (keywords.len() as f64 * 0.5);
                scores.insert(category, score.min(1.0));
            }
        }

        IntentScores::from_map(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_and_question() {
        let classifier = IntentClassifier::new();

        let result = classifier.classify("Hello there, how are you?");
        assert!(result.get(IntentCategory::Greeting).unwrap() > 0.0);
        assert!(result.get(IntentCategory::Question).unwrap() > 0.0);
        // "hello" at the start: (1 + 0.5) / (7 * 0.5)
        let greeting = result.get(IntentCategory::Greeting).unwrap();
        assert!((greeting - 1.5 / 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_fallback() {
        let classifier = IntentClassifier::new();

        let result = classifier.classify("The weather is nice today.");
        assert!(result.is_fallback());
        assert_eq!(result.get(IntentCategory::General), Some(1.0));

        let result = classifier.classify("");
        assert!(result.is_fallback());
    }

    #[test]
    fn test_empty_mapping_deserializes_to_fallback() {
        let scores: IntentScores = serde_json::from_str("{}").unwrap();
        assert!(scores.is_fallback());
        assert!(!scores.is_empty());

        let scores: IntentScores = serde_json::from_str(r#"{"question": 0.5}"#).unwrap();
        assert_eq!(scores.get(IntentCategory::Question), Some(0.5));
        assert_eq!(scores.len(), 1);
    }

    #[test]
    fn test_gratitude_detection() {
        let classifier = IntentClassifier::new();

        let result = classifier.classify("Thanks so much!");
        assert!(result.contains(IntentCategory::Gratitude));
        assert!(!result.contains(IntentCategory::General));
    }

    #[test]
    fn test_substring_matching_is_preserved() {
        let classifier = IntentClassifier::new();

        // "no" inside "know"
        let result = classifier.classify("I know");
        assert!(result.contains(IntentCategory::Disagreement));
    }

    #[test]
    fn test_leading_whitespace_bonus() {
        let classifier = IntentClassifier::new();

        let leading = classifier.classify("   thanks");
        let trailing = classifier.classify("well, thanks");
        assert!(
            leading.get(IntentCategory::Gratitude).unwrap()
                > trailing.get(IntentCategory::Gratitude).unwrap()
        );
    }

    #[test]
    fn test_score_capped_at_one() {
        let lexicon = IntentLexicon::from_json(r#"{"gratitude": ["thanks"]}"#).unwrap();
        let classifier = IntentClassifier::with_lexicon(Arc::new(lexicon));

        let result = classifier.classify("thanks");
        assert_eq!(result.get(IntentCategory::Gratitude), Some(1.0));
    }

    #[test]
    fn test_custom_lexicon_rejects_fallback_and_empty() {
        assert!(IntentLexicon::from_json(r#"{"general": ["x"]}"#).is_err());
        assert!(IntentLexicon::from_json(r#"{"greeting": []}"#).is_err());
        assert!(IntentLexicon::from_json(r#"{"greeting": [" "]}"#).is_err());
        assert!(IntentLexicon::from_json(r#"{"smalltalk": ["x"]}"#).is_err());
    }

    #[test]
    fn test_primary_intent() {
        let classifier = IntentClassifier::new();

        let result = classifier.classify("Thank you, I appreciate it");
        assert_eq!(result.primary(), IntentCategory::Gratitude);
        assert_eq!(IntentScores::fallback().primary(), IntentCategory::General);
    }
}
