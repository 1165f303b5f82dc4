//! Result sanitization.
//!
//! [`sanitize`] normalizes a typed [`AnalysisResult`] so every score is finite and in
//! range. [`sanitize_value`] is the boundary step for loosely typed results, such as
//! ones relayed from another service, where numbers may arrive as strings or nulls.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::context_packet::AnalysisResult;
use super::entities::EntitySpan;
use super::intent::{IntentCategory, IntentScores};
use super::sentiment::SentimentScore;
use crate::error::AppError;

/// Normalize a result. Idempotent.
///
/// Non-finite sentiment values take their neutral default and in-range values are
/// kept. Non-finite intents are dropped, falling back to `general` if nothing is
/// left. Entities with empty text or an empty span are skipped. Offsets are never
/// rewritten.
pub fn sanitize(result: AnalysisResult) -> AnalysisResult {
    AnalysisResult {
        sentiment: sanitize_sentiment(result.sentiment),
        entities: sanitize_entities(result.entities),
        intents: sanitize_intents(result.intents),
        document_summary: result.document_summary,
        document_entities: result.document_entities.map(sanitize_entities),
    }
}

fn sanitize_sentiment(score: SentimentScore) -> SentimentScore {
    let default = SentimentScore::neutral_default();
    SentimentScore {
        negative: proportion(score.negative, default.negative),
        neutral: proportion(score.neutral, default.neutral),
        positive: proportion(score.positive, default.positive),
        compound: bounded(score.compound, -1.0, 1.0, default.compound),
    }
}

fn proportion(value: f64, default: f64) -> f64 {
    bounded(value, 0.0, 1.0, default)
}

fn bounded(value: f64, min: f64, max: f64, default: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        default
    }
}

fn sanitize_intents(intents: IntentScores) -> IntentScores {
    let scores: BTreeMap<IntentCategory, f64> = intents
        .into_inner()
        .into_iter()
        .filter(|(_, score)| score.is_finite())
        .map(|(category, score)| (category, score.clamp(0.0, 1.0)))
        .collect();
    IntentScores::from_map(scores)
}

fn sanitize_entities(entities: Vec<EntitySpan>) -> Vec<EntitySpan> {
    entities
        .into_iter()
        .filter(|e| !e.text.is_empty() && e.end > e.start)
        .collect()
}

/// Validate and coerce a loosely typed result into an [`AnalysisResult`].
///
/// Integers and numeric strings become floats, `null` entity entries are skipped,
/// and `null` scores are dropped (sentiment keys then take their neutral default).
/// Offsets must be non-negative integers. Anything else is a validation error.
pub fn sanitize_value(value: Value) -> Result<AnalysisResult, AppError> {
    let object = as_object(&value, "analysis result")?;

    let sentiment = match object.get("sentiment") {
        None | Some(Value::Null) => SentimentScore::neutral_default(),
        Some(raw) => coerce_sentiment(as_object(raw, "sentiment")?)?,
    };

    let entities = match object.get("entities") {
        None | Some(Value::Null) => vec![],
        Some(raw) => coerce_entities(raw, "entities")?,
    };

    let intents = match object.get("intents") {
        None | Some(Value::Null) => IntentScores::fallback(),
        Some(raw) => coerce_intents(as_object(raw, "intents")?)?,
    };

    let document_summary = match object.get("document_summary") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => return Err(invalid("document_summary", other)),
    };

    let document_entities = match object.get("document_entities") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(coerce_entities(raw, "document_entities")?),
    };

    Ok(sanitize(AnalysisResult {
        sentiment,
        entities,
        intents,
        document_summary,
        document_entities,
    }))
}

fn coerce_sentiment(raw: &Map<String, Value>) -> Result<SentimentScore, AppError> {
    let default = SentimentScore::neutral_default();
    let field = |key: &str, fallback: f64| -> Result<f64, AppError> {
        match raw.get(key) {
            None => Ok(fallback),
            Some(value) => Ok(coerce_float(value, key)?.unwrap_or(fallback)),
        }
    };

    Ok(SentimentScore {
        negative: field("negative", default.negative)?,
        neutral: field("neutral", default.neutral)?,
        positive: field("positive", default.positive)?,
        compound: field("compound", default.compound)?,
    })
}

fn coerce_intents(raw: &Map<String, Value>) -> Result<IntentScores, AppError> {
    let mut scores = BTreeMap::new();
    for (key, value) in raw {
        let category: IntentCategory = serde_json::from_value(Value::String(key.clone()))
            .map_err(|_| AppError::Validation(format!("unknown intent category '{}'", key)))?;
        if let Some(score) = coerce_float(value, key)? {
            scores.insert(category, score);
        }
    }
    Ok(IntentScores::from_map(scores))
}

fn coerce_entities(raw: &Value, field: &str) -> Result<Vec<EntitySpan>, AppError> {
    let Value::Array(items) = raw else {
        return Err(invalid(field, raw));
    };

    let mut entities = Vec::with_capacity(items.len());
    for item in items {
        if item.is_null() {
            continue;
        }
        let entry = as_object(item, field)?;
        entities.push(EntitySpan {
            text: coerce_string(entry, "text")?,
            label: coerce_string(entry, "label")?,
            start: coerce_offset(entry, "start")?,
            end: coerce_offset(entry, "end")?,
        });
    }
    Ok(entities)
}

/// `None` for null; numbers and numeric strings as `f64`
fn coerce_float(value: &Value, field: &str) -> Result<Option<f64>, AppError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(Some).ok_or_else(|| invalid(field, value)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| invalid(field, value)),
        other => Err(invalid(field, other)),
    }
}

fn coerce_string(entry: &Map<String, Value>, field: &str) -> Result<String, AppError> {
    match entry.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(invalid(field, other)),
        None => Err(AppError::Validation(format!("entity is missing '{}'", field))),
    }
}

fn coerce_offset(entry: &Map<String, Value>, field: &str) -> Result<usize, AppError> {
    let value = entry
        .get(field)
        .ok_or_else(|| AppError::Validation(format!("entity is missing '{}'", field)))?;

    let offset = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        _ => None,
    };

    offset
        .and_then(|o| usize::try_from(o).ok())
        .ok_or_else(|| invalid(field, value))
}

fn as_object<'a>(value: &'a Value, field: &str) -> Result<&'a Map<String, Value>, AppError> {
    value.as_object().ok_or_else(|| invalid(field, value))
}

fn invalid(field: &str, value: &Value) -> AppError {
    AppError::Validation(format!("invalid value for '{}': {}", field, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn span(text: &str, start: usize, end: usize) -> EntitySpan {
        EntitySpan {
            text: text.to_string(),
            label: "PERSON".to_string(),
            start,
            end,
        }
    }

    #[test]
    fn test_sanitize_replaces_non_finite_values() {
        let mut intents = BTreeMap::new();
        intents.insert(IntentCategory::Greeting, f64::NAN);
        let result = AnalysisResult {
            sentiment: SentimentScore {
                negative: f64::NAN,
                neutral: f64::INFINITY,
                positive: 0.25,
                compound: 1.5,
            },
            entities: vec![span("Watson", 4, 10), span("", 0, 0), span("x", 3, 3)],
            intents: IntentScores::from_map(intents),
            document_summary: None,
            document_entities: None,
        };

        let clean = sanitize(result);
        assert_eq!(clean.sentiment.negative, 0.0);
        assert_eq!(clean.sentiment.neutral, 0.5);
        assert_eq!(clean.sentiment.positive, 0.25);
        assert_eq!(clean.sentiment.compound, 1.0);
        assert!(clean.intents.is_fallback());
        assert_eq!(clean.entities, vec![span("Watson", 4, 10)]);
        assert_eq!(sanitize(clean.clone()), clean);
    }

    #[test]
    fn test_sanitize_value_coerces_numbers() {
        let raw = json!({
            "sentiment": {"negative": 0, "neutral": "0.75", "positive": 0.25, "compound": null},
            "entities": [
                null,
                {"text": "Sherlock Holmes", "label": "PERSON", "start": 0, "end": 15.0}
            ],
            "intents": {"greeting": "1", "question": 0.5, "request": null}
        });

        let result = sanitize_value(raw).unwrap();
        assert_eq!(result.sentiment.negative, 0.0);
        assert_eq!(result.sentiment.neutral, 0.75);
        assert_eq!(result.sentiment.compound, 0.0);
        assert_eq!(result.entities.len(), 1);
        assert_eq!(result.entities[0].end, 15);
        assert_eq!(result.intents.get(IntentCategory::Greeting), Some(1.0));
        assert_eq!(result.intents.get(IntentCategory::Question), Some(0.5));
        assert!(!result.intents.contains(IntentCategory::Request));
        assert!(result.document_summary.is_none());
        assert!(result.document_entities.is_none());
    }

    #[test]
    fn test_sanitize_value_keeps_document_fields() {
        let raw = json!({
            "sentiment": {"negative": 0, "neutral": 1, "positive": 0, "compound": 0},
            "entities": [],
            "intents": {"general": 1},
            "document_summary": "Holmes returned.",
            "document_entities": [null, {"text": "Holmes", "label": "PERSON", "start": 0, "end": 6}]
        });

        let result = sanitize_value(raw).unwrap();
        assert_eq!(result.document_summary.as_deref(), Some("Holmes returned."));
        assert_eq!(result.document_entities, Some(vec![span("Holmes", 0, 6)]));
        assert!(result.intents.is_fallback());
    }

    #[test]
    fn test_sanitize_value_rejects_bad_input() {
        let unknown_intent = json!({"intents": {"sarcasm": 0.5}});
        assert!(matches!(
            sanitize_value(unknown_intent),
            Err(AppError::Validation(_))
        ));

        let bad_offset = json!({"entities": [{"text": "a", "label": "X", "start": -1, "end": 2}]});
        assert!(matches!(sanitize_value(bad_offset), Err(AppError::Validation(_))));

        let bad_score = json!({"sentiment": {"compound": "high"}});
        assert!(matches!(sanitize_value(bad_score), Err(AppError::Validation(_))));

        assert!(matches!(sanitize_value(json!([1, 2])), Err(AppError::Validation(_))));
    }
}
