//! Property-based tests for the analysis pipeline
//!
//! Test categories:
//! - Sentiment bounds on arbitrary text
//! - Intent mapping is never empty and falls back exactly
//! - Entity spans index the analyzed text, sorted and disjoint
//! - Sanitizer idempotence
//! - Summarizer no-op laws

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    use crate::brain::sentences::split_sentences;
    use crate::brain::{
        sanitize, AnalysisResult, EntityExtractor, EntitySpan, IntentCategory, IntentClassifier,
        IntentScores, SentimentScore, SentimentScorer, Summarizer,
    };

    // Strategies for generating test values

    /// Free text mixing words the lexicons know with arbitrary unicode
    fn text() -> impl Strategy<Value = String> {
        prop_oneof![
            any::<String>(),
            prop::collection::vec(
                prop_oneof![
                    Just("Hello"),
                    Just("thanks"),
                    Just("not"),
                    Just("very"),
                    Just("GREAT"),
                    Just("terrible"),
                    Just("Sherlock Holmes"),
                    Just("London"),
                    Just("Dr."),
                    Just("$40"),
                    Just("!!!"),
                    Just("?"),
                    Just("é"),
                    Just("but"),
                ],
                0..20,
            )
            .prop_map(|words| words.join(" ")),
        ]
    }

    fn any_score() -> impl Strategy<Value = f64> {
        prop_oneof![
            -5.0f64..5.0,
            Just(f64::NAN),
            Just(f64::INFINITY),
            Just(f64::NEG_INFINITY),
        ]
    }

    fn category() -> impl Strategy<Value = IntentCategory> {
        prop_oneof![
            Just(IntentCategory::Greeting),
            Just(IntentCategory::Farewell),
            Just(IntentCategory::Question),
            Just(IntentCategory::Disagreement),
            Just(IntentCategory::General),
        ]
    }

    fn span() -> impl Strategy<Value = EntitySpan> {
        ("[A-Za-z ]{0,8}", 0usize..20, 0usize..20).prop_map(|(text, start, end)| EntitySpan {
            text,
            label: "PERSON".to_string(),
            start,
            end,
        })
    }

    fn result() -> impl Strategy<Value = AnalysisResult> {
        (
            (any_score(), any_score(), any_score(), any_score()),
            prop::collection::vec(span(), 0..5),
            prop::collection::btree_map(category(), any_score(), 0..4),
            prop::option::of(prop::collection::vec(span(), 0..3)),
        )
            .prop_map(|((negative, neutral, positive, compound), entities, intents, doc)| {
                AnalysisResult {
                    sentiment: SentimentScore {
                        negative,
                        neutral,
                        positive,
                        compound,
                    },
                    entities,
                    intents: IntentScores::from_map(intents),
                    document_summary: doc.as_ref().map(|_| "summary".to_string()),
                    document_entities: doc,
                }
            })
    }

    /// Sentence lists that stay at or below the summarization floor
    fn few_sentences() -> impl Strategy<Value = String> {
        prop::collection::vec("[A-Z][a-z]{2,12}( [a-z]{2,12}){2,8}\\.", 1..=3)
            .prop_map(|sentences| sentences.join(" "))
    }

    proptest! {
        /// Property: sentiment scores are always bounded
        #[test]
        fn sentiment_is_bounded(text in text()) {
            let score = SentimentScorer::new().score(&text);
            for value in [score.negative, score.neutral, score.positive] {
                prop_assert!((0.0..=1.0).contains(&value), "{:?} for {:?}", score, text);
            }
            prop_assert!((-1.0..=1.0).contains(&score.compound));
        }

        /// Property: intents are never empty; no substring match means exactly general
        #[test]
        fn intents_never_empty(text in text()) {
            let classifier = IntentClassifier::new();
            let intents = classifier.classify(&text);
            prop_assert!(!intents.is_empty());

            let lower = text.to_lowercase();
            let any_match = classifier
                .lexicon()
                .iter()
                .any(|(_, keywords)| keywords.iter().any(|k| lower.contains(k.as_str())));
            if !any_match {
                prop_assert_eq!(intents, IntentScores::fallback());
            }
            for (_, score) in IntentClassifier::new().classify(&text).iter() {
                prop_assert!((0.0..=1.0).contains(&score));
            }
        }

        /// Property: spans index the text, ascending and non-overlapping
        #[test]
        fn entity_spans_are_valid(text in text()) {
            let spans = EntityExtractor::new().extract(&text).unwrap();
            let chars: Vec<char> = text.chars().collect();

            let mut previous_end = 0;
            for span in &spans {
                prop_assert!(span.start < span.end);
                prop_assert!(span.end <= chars.len());
                prop_assert!(span.start >= previous_end);
                let covered: String = chars[span.start..span.end].iter().collect();
                prop_assert_eq!(&covered, &span.text);
                previous_end = span.end;
            }
        }

        /// Property: sanitize(sanitize(x)) == sanitize(x)
        #[test]
        fn sanitize_is_idempotent(result in result()) {
            let once = sanitize(result);
            let twice = sanitize(once.clone());
            prop_assert_eq!(&twice, &once);
            prop_assert!(!once.intents.is_empty());
        }

        /// Property: text within max_length is returned unchanged
        #[test]
        fn summarize_short_text_is_identity(text in text(), slack in 0usize..50) {
            let max_length = text.chars().count() + slack;
            prop_assert_eq!(Summarizer::new().summarize(&text, max_length).unwrap(), text);
        }

        /// Property: three sentences or fewer are returned unchanged at any length
        #[test]
        fn summarize_few_sentences_is_identity(text in few_sentences(), max_length in 0usize..20) {
            prop_assume!(split_sentences(&text).len() <= 3);
            prop_assert_eq!(Summarizer::new().summarize(&text, max_length).unwrap(), text);
        }
    }

    #[test]
    fn test_fallback_shape() {
        let mut map = BTreeMap::new();
        map.insert(IntentCategory::General, 1.0);
        assert_eq!(IntentScores::from_map(map), IntentScores::fallback());
    }
}
