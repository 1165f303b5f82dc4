//! Sentence boundary detection.
//!
//! Splits on terminal punctuation followed by whitespace, except after known
//! abbreviations, single-letter initials, or when the next sentence would start
//! lowercase.

use regex::Regex;
use std::sync::LazyLock;

/// Terminal punctuation, optional closing quotes/brackets, then whitespace or end of text
static BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.!?…]+["'”’)\]]*(\s+|$)"#).expect("Invalid regex: sentence boundary")
});

/// Abbreviations whose trailing period does not end a sentence
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "ft", "vs", "etc", "inc", "ltd",
    "co", "corp", "dept", "univ", "gen", "col", "lt", "sgt", "capt", "rev", "hon", "jan",
    "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
    "fig", "approx", "e.g", "i.e", "u.s", "u.k", "a.m", "p.m", "cf", "al",
];

/// Split text into trimmed, non-empty sentences, borrowing from the input
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in BOUNDARY.find_iter(text) {
        let rest = &text[boundary.end()..];
        let terminator = text[boundary.start()..].chars().next();
        if terminator == Some('.') && ends_with_abbreviation(&text[start..boundary.start()], rest) {
            continue;
        }

        if starts_lowercase(rest) {
            continue;
        }

        push_trimmed(&mut sentences, &text[start..boundary.end()]);
        start = boundary.end();
    }

    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, candidate: &'a str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}

fn ends_with_abbreviation(preceding: &str, rest: &str) -> bool {
    let Some(word) = preceding.split_whitespace().next_back() else {
        return false;
    };
    let word = word.trim_start_matches(|c: char| !c.is_alphanumeric());

    // Initials such as the "J" in "J. Smith"
    let mut chars = word.chars();
    if let (Some(first), None) = (chars.next(), chars.next()) {
        return first.is_uppercase() && first != 'I' && continues_name(rest);
    }

    let lower = word.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str())
}

/// Words that open a new sentence rather than continue a name after an initial
const SENTENCE_OPENERS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "he", "her", "his", "how", "i", "if", "in", "it",
    "its", "my", "no", "now", "on", "our", "she", "so", "that", "the", "their", "then",
    "there", "these", "they", "this", "those", "we", "what", "when", "where", "who", "why",
    "yes", "you", "your",
];

/// True if the next word reads like the rest of a name: capitalized and not a
/// common sentence opener
fn continues_name(rest: &str) -> bool {
    let Some(next) = rest.split_whitespace().next() else {
        return false;
    };
    let next = next.trim_matches(|c: char| !c.is_alphanumeric());
    if !next.chars().next().is_some_and(|c| c.is_uppercase()) {
        return false;
    }
    let lower = next.to_lowercase();
    !SENTENCE_OPENERS.contains(&lower.as_str())
}

fn starts_lowercase(rest: &str) -> bool {
    rest.trim_start()
        .chars()
        .find(|c| c.is_alphanumeric())
        .is_some_and(|c| c.is_lowercase())
}
