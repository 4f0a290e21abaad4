//! Best-effort extraction of a score from free-form model replies.
//!
//! Providers are asked to answer with JSON, but replies regularly arrive
//! wrapped in prose or with no JSON at all. Parsing runs in two stages:
//! the JSON-object-shaped substring first, then a bare "score: N" scan.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};

use super::{Result, ScoreResult, ScoringError};

static JSON_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));
static SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)score\D*(\d{1,2}(?:\.\d)?)").expect("valid regex"));

/// Parse a provider reply into a `ScoreResult`.
///
/// Stage one finds the outermost `{...}` block and accepts it when it parses
/// as an object carrying a `score` field. Stage two falls back to scanning
/// the raw text for a score token, reusing any parsed object fields and the
/// trimmed reply as feedback. Neither succeeding is a `ParseFailure`.
pub fn parse_reply(text: &str) -> Result<ScoreResult> {
    let parsed: Option<Map<String, Value>> = JSON_BLOCK_RE
        .find(text)
        .and_then(|m| serde_json::from_str::<Value>(m.as_str()).ok())
        .and_then(|v| v.as_object().cloned());

    if let Some(object) = &parsed {
        if object.contains_key("score") {
            return Ok(result_from_object(object.clone(), text));
        }
    }

    if let Some(caps) = SCORE_RE.captures(text) {
        if let Ok(score) = caps[1].parse::<f64>() {
            let mut object = parsed.unwrap_or_default();
            object.insert("score".to_string(), json!(score));
            if !object.contains_key("feedback") {
                object.insert("feedback".to_string(), json!(text.trim()));
            }
            return Ok(result_from_object(object, text));
        }
    }

    Err(ScoringError::ParseFailure)
}

fn result_from_object(mut object: Map<String, Value>, raw: &str) -> ScoreResult {
    let score = object
        .remove("score")
        .and_then(|v| coerce_score(&v))
        .unwrap_or(0.0);
    let feedback = match object.remove("feedback") {
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
        None => raw.trim().to_string(),
    };

    ScoreResult {
        score,
        feedback,
        extra: object,
    }
}

/// Accept JSON numbers and numeric strings; anything else is no score.
fn coerce_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
