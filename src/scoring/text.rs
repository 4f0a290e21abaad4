//! Local lexical analysis for answer text.
//!
//! Everything here runs offline on word lists so the heuristic scorer keeps
//! working when no remote provider is reachable. Signals mirror what a small
//! sentiment library reports: polarity, subjectivity, and noun-phrase-like
//! spans.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "accomplished", "achieved", "best", "capable", "confident", "delivered",
        "effective", "efficient", "excellent", "good", "great", "improved",
        "increased", "led", "mentored", "optimized", "passionate", "perfect",
        "positive", "proud", "reduced", "reliable", "resolved", "skilled",
        "strong", "succeeded", "success", "successful", "thorough", "won",
    ]
    .into_iter()
    .collect()
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bad", "blame", "broken", "confused", "conflict", "difficult",
        "failed", "failure", "frustrated", "hate", "impossible", "lazy",
        "lost", "mistake", "never", "poor", "problem", "quit", "slow",
        "stress", "stressed", "terrible", "unable", "weak", "worst", "wrong",
    ]
    .into_iter()
    .collect()
});

// Opinion markers and intensifiers; sentiment-bearing words count as
// subjective too, matching how lexical sentiment libraries behave.
static SUBJECTIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "absolutely", "amazing", "awesome", "believe", "definitely", "extremely",
        "fantastic", "feel", "felt", "guess", "honestly", "hope", "incredible",
        "love", "maybe", "opinion", "personally", "prefer", "probably",
        "really", "seems", "suppose", "think", "thought", "totally", "truly",
        "very", "wonderful",
    ]
    .into_iter()
    .collect()
});

// Function words that never anchor a noun phrase.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "after", "all", "also", "am", "an", "and", "any", "are",
        "as", "at", "be", "because", "been", "before", "being", "but", "by",
        "can", "could", "did", "do", "does", "for", "from", "had", "has",
        "have", "he", "her", "his", "how", "i", "if", "in", "into", "is", "it",
        "its", "me", "my", "no", "not", "of", "on", "or", "our", "she", "so",
        "some", "than", "that", "the", "their", "them", "then", "there",
        "these", "they", "this", "to", "up", "was", "we", "were", "what",
        "when", "where", "which", "while", "who", "will", "with", "would",
        "you", "your",
    ]
    .into_iter()
    .collect()
});

/// Lexical signals extracted from one answer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAnalysis {
    /// Overall tone in [-1, 1].
    pub polarity: f64,
    /// Opinionated-language density in [0, 1].
    pub subjectivity: f64,
    pub word_count: usize,
    /// Count of noun-phrase-like spans.
    pub noun_phrases: usize,
}

/// Analyze free text. Deterministic; identical input yields identical output.
pub fn analyze(text: &str) -> TextAnalysis {
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(|raw| {
            raw.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .collect();

    let word_count = tokens.iter().filter(|t| !t.is_empty()).count();

    let mut positive = 0usize;
    let mut negative = 0usize;
    let mut subjective = 0usize;
    for token in &tokens {
        let word = token.as_str();
        if POSITIVE_WORDS.contains(word) {
            positive += 1;
        }
        if NEGATIVE_WORDS.contains(word) {
            negative += 1;
        }
        if SUBJECTIVE_WORDS.contains(word)
            || POSITIVE_WORDS.contains(word)
            || NEGATIVE_WORDS.contains(word)
        {
            subjective += 1;
        }
    }

    let words = word_count.max(1) as f64;
    let polarity = ((positive as f64 - negative as f64) / words * 5.0).clamp(-1.0, 1.0);
    let subjectivity = (subjective as f64 / words * 4.0).clamp(0.0, 1.0);

    TextAnalysis {
        polarity,
        subjectivity,
        word_count,
        noun_phrases: count_noun_phrase_spans(&tokens),
    }
}

/// A span is a run of two or more consecutive content words, e.g.
/// "software engineer" or "distributed message queue".
fn count_noun_phrase_spans(tokens: &[String]) -> usize {
    let mut spans = 0usize;
    let mut run = 0usize;
    for token in tokens {
        if is_content_word(token) {
            run += 1;
        } else {
            if run >= 2 {
                spans += 1;
            }
            run = 0;
        }
    }
    if run >= 2 {
        spans += 1;
    }
    spans
}

fn is_content_word(token: &str) -> bool {
    token.len() >= 3
        && token.chars().all(|c| c.is_alphabetic())
        && !STOP_WORDS.contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_text_has_positive_polarity() {
        let analysis = analyze("We delivered a successful launch and improved reliability.");
        assert!(analysis.polarity > 0.0);
    }

    #[test]
    fn negative_text_has_negative_polarity() {
        let analysis = analyze("The project failed and everything was broken and wrong.");
        assert!(analysis.polarity < 0.0);
    }

    #[test]
    fn opinionated_text_is_subjective() {
        let analysis =
            analyze("I think this is really really great and I honestly feel amazing about it");
        assert!(analysis.subjectivity > 0.6);
    }

    #[test]
    fn factual_text_is_not_flagged_subjective() {
        let analysis = analyze(
            "The service handles four thousand requests per second across three regions \
             using a sharded queue",
        );
        assert!(analysis.subjectivity < 0.3);
    }

    #[test]
    fn noun_phrase_spans_are_counted() {
        let analysis = analyze("I am a software engineer and I build web applications");
        assert!(analysis.noun_phrases >= 2);
    }

    #[test]
    fn empty_text_yields_zeroes() {
        let analysis = analyze("");
        assert_eq!(analysis.word_count, 0);
        assert_eq!(analysis.noun_phrases, 0);
        assert_eq!(analysis.polarity, 0.0);
        assert_eq!(analysis.subjectivity, 0.0);
    }

    #[test]
    fn analysis_is_deterministic() {
        let text = "I led a team that improved performance by thirty percent";
        assert_eq!(analyze(text), analyze(text));
    }
}
