//! Offline answer scorer.
//!
//! This is the scoring path of record: pure, infallible, and deterministic,
//! so the session flow always gets a result even with every remote provider
//! down or unconfigured.

use serde_json::json;
use std::collections::HashSet;

use super::text;
use super::{round1, ScoreResult};

const SHORT_ANSWER_WORDS: usize = 20;
const MIN_RELEVANCE: f64 = 0.1;
const MAX_SUBJECTIVITY: f64 = 0.6;

/// Score an answer against its question from lexical signals alone.
pub fn score(question: &str, answer: &str) -> ScoreResult {
    let analysis = text::analyze(answer);
    let words = analysis.word_count;
    let relevance = keyword_relevance(question, answer);
    let noun_phrases = analysis.noun_phrases;

    let composite = ((words as f64 / SHORT_ANSWER_WORDS as f64).min(1.0) * 0.4
        + relevance.clamp(0.0, 1.0) * 0.3
        + (noun_phrases as f64 / 3.0).min(1.0) * 0.2
        + (analysis.polarity + 1.0) / 2.0 * 0.1)
        * 10.0;

    let mut advisories = Vec::new();
    if words < SHORT_ANSWER_WORDS {
        advisories.push("Try to give a slightly longer answer with more specifics.");
    }
    if relevance < MIN_RELEVANCE {
        advisories.push("Your answer could be more focused on the question. Mention relevant keywords.");
    }
    if analysis.subjectivity > MAX_SUBJECTIVITY {
        advisories.push("You used a lot of subjective language; add facts or examples where possible.");
    }
    if noun_phrases < 1 {
        advisories.push("Consider structuring your answer with clearer points or examples.");
    }

    let feedback = if advisories.is_empty() {
        "Good answer: clear and relevant.".to_string()
    } else {
        advisories.join(" ")
    };

    ScoreResult::new(round1(composite), feedback)
        .with_extra("polarity", json!(analysis.polarity))
        .with_extra("subjectivity", json!(analysis.subjectivity))
        .with_extra("relevance", json!(relevance))
        .with_extra("noun_phrases", json!(noun_phrases))
}

/// Share of question keywords (longer than 3 characters) that the answer
/// mentions. The +1 in the denominator keeps keyword-free questions finite.
fn keyword_relevance(question: &str, answer: &str) -> f64 {
    let question_keywords: HashSet<String> = question
        .split_whitespace()
        .filter(|w| w.len() > 3)
        .map(|w| w.to_lowercase())
        .collect();

    let answer_words: HashSet<String> = answer
        .split_whitespace()
        .map(|w| w.to_lowercase().trim_matches(['.', ','].as_slice()).to_string())
        .collect();

    let overlap = question_keywords
        .iter()
        .filter(|w| answer_words.contains(*w))
        .count();

    overlap as f64 / (question_keywords.len() + 1) as f64
}
