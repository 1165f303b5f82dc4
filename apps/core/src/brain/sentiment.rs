//! Lexicon-based sentiment scoring in the style of VADER.
//!
//! Token valences come from a polarity lexicon and are adjusted for boosters,
//! negation, ALL-CAPS emphasis, "but" contrast and trailing punctuation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Bundled lexicon, one `token<TAB>valence` per line
const BUILTIN_LEXICON: &str = include_str!("../../data/sentiment_lexicon.txt");

/// Boost applied by intensifiers ("very", "so", ...)
const B_INCR: f64 = 0.293;
/// Dampening applied by diminishers ("kind of", "slightly", ...)
const B_DECR: f64 = -0.293;
/// Emphasis for an ALL-CAPS word among mixed-case text
const C_INCR: f64 = 0.733;
/// Scalar applied to a negated valence
const N_SCALAR: f64 = -0.74;
/// Normalization constant for the compound score
const ALPHA: f64 = 15.0;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont",
    "hadnt", "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "never", "none",
    "nope", "nor", "not", "nothing", "nowhere", "oughtnt", "shant", "shouldnt", "wasnt",
    "werent", "without", "wont", "wouldnt", "rarely", "seldom", "despite",
];

const BOOSTERS_UP: &[&str] = &[
    "absolutely", "amazingly", "awfully", "completely", "considerably", "decidedly",
    "deeply", "enormously", "entirely", "especially", "exceptionally", "extremely",
    "fabulously", "fully", "greatly", "highly", "hugely", "incredibly", "intensely",
    "majorly", "more", "most", "much", "particularly", "purely", "quite", "really",
    "remarkably", "so", "substantially", "thoroughly", "totally", "tremendously",
    "truly", "unbelievably", "utterly", "very",
];

const BOOSTERS_DOWN: &[&str] = &[
    "almost", "barely", "hardly", "less", "little", "marginally", "occasionally",
    "partly", "scarcely", "slightly", "somewhat", "sort", "kinda", "sorta",
];

/// Sentiment polarity scores for a text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Proportion of negative signal (0.0 - 1.0)
    pub negative: f64,
    /// Proportion of neutral signal (0.0 - 1.0)
    pub neutral: f64,
    /// Proportion of positive signal (0.0 - 1.0)
    pub positive: f64,
    /// Signed aggregate polarity (-1.0 - 1.0)
    pub compound: f64,
}

impl SentimentScore {
    /// Scores reported when no polarity model is available
    pub const fn neutral_default() -> Self {
        Self {
            negative: 0.0,
            neutral: 0.5,
            positive: 0.0,
            compound: 0.0,
        }
    }
}

/// Token -> valence mapping
#[derive(Debug, Clone, Default)]
pub struct PolarityLexicon {
    valences: HashMap<String, f64>,
}

impl PolarityLexicon {
    /// The lexicon bundled with the crate
    pub fn builtin() -> Self {
        Self::parse(BUILTIN_LEXICON)
    }

    /// Parse VADER-format lines: `token<TAB>mean[<TAB>...]`.
    ///
    /// Lines that do not carry a numeric mean are skipped.
    pub fn parse(source: &str) -> Self {
        let valences = source
            .lines()
            .filter_map(|line| {
                let mut fields = line.split('\t');
                let token = fields.next()?.trim();
                let mean = fields.next()?.trim().parse::<f64>().ok()?;
                if token.is_empty() || !mean.is_finite() {
                    return None;
                }
                Some((token.to_lowercase(), mean))
            })
            .collect();
        Self { valences }
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Ok(Self::parse(&source))
    }

    pub fn get(&self, token: &str) -> Option<f64> {
        self.valences.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.valences.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

/// Sentiment scorer; degrades to neutral scores when no lexicon is loaded
#[derive(Debug, Clone)]
pub struct SentimentScorer {
    lexicon: Option<Arc<PolarityLexicon>>,
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer {
    /// Create a scorer over the built-in lexicon
    pub fn new() -> Self {
        Self::with_lexicon(Arc::new(PolarityLexicon::builtin()))
    }

    pub fn with_lexicon(lexicon: Arc<PolarityLexicon>) -> Self {
        Self {
            lexicon: Some(lexicon),
        }
    }

    /// A scorer without a polarity model
    pub fn unavailable() -> Self {
        Self { lexicon: None }
    }

    pub fn is_available(&self) -> bool {
        self.lexicon.is_some()
    }

    /// Score a text. Never fails; empty input scores all zeros.
    pub fn score(&self, text: &str) -> SentimentScore {
        let Some(lexicon) = self.lexicon.as_deref() else {
            return SentimentScore::neutral_default();
        };

        let tokens = tokenize(text);
        if tokens.is_empty() {
            return SentimentScore {
                negative: 0.0,
                neutral: 0.0,
                positive: 0.0,
                compound: 0.0,
            };
        }

        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let cap_diff = is_cap_diff(&tokens);

        let mut sentiments = Vec::with_capacity(tokens.len());
        for (i, word) in lowered.iter().enumerate() {
            if is_booster(word) {
                sentiments.push(0.0);
                continue;
            }
            if word == "kind" && lowered.get(i + 1).map(String::as_str) == Some("of") {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(valence_at(lexicon, &tokens, &lowered, i, cap_diff));
        }

        but_check(&lowered, &mut sentiments);
        score_valence(&sentiments, text)
    }
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| c.is_ascii_punctuation() && c != '\''))
        .map(|word| word.trim_matches('\''))
        .filter(|word| word.chars().count() > 1 || word.eq_ignore_ascii_case("i"))
        .collect()
}

fn is_all_caps(token: &str) -> bool {
    token.chars().any(|c| c.is_alphabetic())
        && token.chars().all(|c| !c.is_alphabetic() || c.is_uppercase())
}

fn is_cap_diff(tokens: &[&str]) -> bool {
    let caps = tokens.iter().filter(|t| is_all_caps(t)).count();
    caps > 0 && caps < tokens.len()
}

fn is_booster(word: &str) -> bool {
    BOOSTERS_UP.contains(&word) || BOOSTERS_DOWN.contains(&word)
}

fn is_negated(word: &str) -> bool {
    let collapsed: String = word.chars().filter(|c| *c != '\'').collect();
    NEGATIONS.contains(&collapsed.as_str()) || word.contains("n't")
}

fn booster_scalar(token: &str, word: &str, valence: f64, cap_diff: bool) -> f64 {
    let mut scalar = if BOOSTERS_UP.contains(&word) {
        B_INCR
    } else if BOOSTERS_DOWN.contains(&word) {
        B_DECR
    } else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if is_all_caps(token) && cap_diff {
        scalar += if valence > 0.0 { C_INCR } else { -C_INCR };
    }
    scalar
}

fn valence_at(
    lexicon: &PolarityLexicon,
    tokens: &[&str],
    lowered: &[String],
    i: usize,
    cap_diff: bool,
) -> f64 {
    let Some(mut valence) = lexicon.get(&lowered[i]) else {
        return 0.0;
    };

    if is_all_caps(tokens[i]) && cap_diff {
        valence += if valence > 0.0 { C_INCR } else { -C_INCR };
    }

    for distance in 1..=3 {
        if i < distance {
            break;
        }
        let prev = &lowered[i - distance];
        if lexicon.contains(prev) {
            continue;
        }

        let mut scalar = booster_scalar(tokens[i - distance], prev, valence, cap_diff);
        if distance == 2 {
            scalar *= 0.95;
        } else if distance == 3 {
            scalar *= 0.9;
        }
        valence += scalar;

        if is_negated(prev) {
            // "never so good" intensifies rather than flips
            let never_intensifier = distance > 1
                && prev == "never"
                && matches!(lowered[i - distance + 1].as_str(), "so" | "this");
            if never_intensifier {
                valence *= if distance == 2 { 1.25 } else { 1.1 };
            } else {
                valence *= N_SCALAR;
            }
        }
    }

    valence
}

fn but_check(lowered: &[String], sentiments: &mut [f64]) {
    let Some(pivot) = lowered.iter().position(|w| w == "but") else {
        return;
    };
    for (i, sentiment) in sentiments.iter_mut().enumerate() {
        if i < pivot {
            *sentiment *= 0.5;
        } else if i > pivot {
            *sentiment *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64 * 0.292;
    let questions = text.matches('?').count();
    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * 0.18,
        _ => 0.96,
    };
    exclamations + question_emphasis
}

fn normalize(score: f64) -> f64 {
    let normalized = score / (score * score + ALPHA).sqrt();
    normalized.clamp(-1.0, 1.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn score_valence(sentiments: &[f64], text: &str) -> SentimentScore {
    let emphasis = punctuation_emphasis(text);

    let mut sum: f64 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }
    let compound = normalize(sum);

    let mut positive_sum = 0.0;
    let mut negative_sum = 0.0;
    let mut neutral_count = 0.0;
    for &sentiment in sentiments {
        if sentiment > 0.0 {
            positive_sum += sentiment + 1.0;
        } else if sentiment < 0.0 {
            negative_sum += sentiment - 1.0;
        } else {
            neutral_count += 1.0;
        }
    }

    if positive_sum > negative_sum.abs() {
        positive_sum += emphasis;
    } else if positive_sum < negative_sum.abs() {
        negative_sum -= emphasis;
    }

    let total = positive_sum + negative_sum.abs() + neutral_count;
    if total == 0.0 {
        return SentimentScore {
            negative: 0.0,
            neutral: 0.0,
            positive: 0.0,
            compound: round_to(compound, 4),
        };
    }

    SentimentScore {
        negative: round_to((negative_sum / total).abs(), 3),
        neutral: round_to((neutral_count / total).abs(), 3),
        positive: round_to((positive_sum / total).abs(), 3),
        compound: round_to(compound, 4),
    }
}
