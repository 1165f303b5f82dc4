//! Extractive summarization using TF-IDF.
//!
//! Each sentence is treated as a document. Terms are weighted with a smoothed IDF,
//! every sentence row is L2-normalized, and a sentence scores the sum of its row.
//! The best sentences are returned in their original order.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use super::error::AnalysisError;
use super::sentences::split_sentences;

/// Number of sentences kept in a summary
pub const SUMMARY_SENTENCES: usize = 3;

/// Documents with this many sentences or fewer are never summarized
const SENTENCE_FLOOR: usize = 3;

/// Standard English stop words
const STOPWORDS_EN: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
    "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
    "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
    "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
    "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
    "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg", "eight",
    "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even", "ever",
    "every", "everyone", "everything", "everywhere", "except", "few", "fifteen", "fifty",
    "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty", "found",
    "four", "from", "front", "full", "further", "get", "give", "go", "had", "has", "hasnt",
    "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon",
    "hers", "herself", "him", "himself", "his", "how", "however", "hundred", "i", "ie", "if",
    "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself", "keep", "last",
    "latter", "latterly", "least", "less", "ltd", "made", "many", "may", "me", "meanwhile",
    "might", "mill", "mine", "more", "moreover", "most", "mostly", "move", "much", "must",
    "my", "myself", "name", "namely", "neither", "never", "nevertheless", "next", "nine",
    "no", "nobody", "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of", "off",
    "often", "on", "once", "one", "only", "onto", "or", "other", "others", "otherwise",
    "our", "ours", "ourselves", "out", "over", "own", "part", "per", "perhaps", "please",
    "put", "rather", "re", "same", "see", "seem", "seemed", "seeming", "seems", "serious",
    "several", "she", "should", "show", "side", "since", "sincere", "six", "sixty", "so",
    "some", "somehow", "someone", "something", "sometime", "sometimes", "somewhere",
    "still", "such", "system", "take", "ten", "than", "that", "the", "their", "them",
    "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore",
    "therein", "thereupon", "these", "they", "thick", "thin", "third", "this", "those",
    "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
    "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up",
    "upon", "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
    "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein",
    "whereupon", "wherever", "whether", "which", "while", "whither", "who", "whoever",
    "whole", "whom", "whose", "why", "will", "with", "within", "without", "would", "yet",
    "you", "your", "yours", "yourself", "yourselves",
];

/// Words of two or more word characters
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("Invalid regex: summary token"));

/// TF-IDF extractive summarizer
#[derive(Debug, Clone)]
pub struct Summarizer {
    stopwords: HashSet<&'static str>,
    summary_sentences: usize,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Summarizer {
    /// Create a summarizer keeping [`SUMMARY_SENTENCES`] sentences
    pub fn new() -> Self {
        Self::with_config(SUMMARY_SENTENCES)
    }

    pub fn with_config(summary_sentences: usize) -> Self {
        Self {
            stopwords: STOPWORDS_EN.iter().copied().collect(),
            summary_sentences,
        }
    }

    /// Summarize `text` if it is longer than `max_length` characters.
    ///
    /// Texts within `max_length`, or with no more than three sentences, come back
    /// unchanged. The summary itself is not truncated to `max_length`.
    pub fn summarize(&self, text: &str, max_length: usize) -> Result<String, AnalysisError> {
        if text.chars().count() <= max_length {
            return Ok(text.to_string());
        }

        let sentences = split_sentences(text);
        if sentences.len() <= SENTENCE_FLOOR {
            return Ok(text.to_string());
        }

        let scores = self.score_sentences(&sentences)?;

        // Stable sort: equal scores keep the earlier sentence
        let mut ranked: Vec<usize> = (0..sentences.len()).collect();
        ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        ranked.truncate(self.summary_sentences);
        ranked.sort_unstable();

        Ok(ranked
            .iter()
            .map(|&i| sentences[i])
            .collect::<Vec<_>>()
            .join(" "))
    }

    /// Sum of each sentence's L2-normalized TF-IDF row
    fn score_sentences(&self, sentences: &[&str]) -> Result<Vec<f64>, AnalysisError> {
        let counts: Vec<HashMap<String, usize>> =
            sentences.iter().map(|s| self.term_counts(s)).collect();

        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        for row in &counts {
            for term in row.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        if document_frequency.is_empty() {
            return Err(AnalysisError::EmptyVocabulary);
        }

        let n = sentences.len() as f64;
        let idf = |term: &str| {
            let df = document_frequency.get(term).copied().unwrap_or(0) as f64;
            ((1.0 + n) / (1.0 + df)).ln() + 1.0
        };

        Ok(counts
            .iter()
            .map(|row| {
                let weights: Vec<f64> = row
                    .iter()
                    .map(|(term, &count)| count as f64 * idf(term))
                    .collect();
                let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    weights.iter().sum::<f64>() / norm
                } else {
                    0.0
                }
            })
            .collect())
    }

    fn term_counts(&self, sentence: &str) -> HashMap<String, usize> {
        let lower = sentence.to_lowercase();
        let mut counts = HashMap::new();
        for token in TOKEN.find_iter(&lower) {
            let term = token.as_str();
            if !self.stopwords.contains(term) {
                *counts.entry(term.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }
}
