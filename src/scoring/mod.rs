pub mod heuristic;
pub mod openai;
pub mod orchestrator;
pub mod pollinations;
pub mod reply;
pub mod text;

pub use heuristic::score as heuristic_score;
pub use openai::OpenAiScorer;
pub use orchestrator::{RemotePreference, ScoringEngine};
pub use pollinations::PollinationsScorer;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("API key for {0} is not configured")]
    MissingCredential(&'static str),
    #[error("unknown scoring provider: {0}")]
    UnknownProvider(String),
    #[error("provider request failed: {0}")]
    Provider(String),
    #[error("no usable score found in provider reply")]
    ParseFailure,
}

impl From<reqwest::Error> for ScoringError {
    fn from(err: reqwest::Error) -> Self {
        ScoringError::Provider(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;

/// Remote scoring backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AIProvider {
    OpenAI,
    Pollinations,
}

impl AIProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "openai" => Some(AIProvider::OpenAI),
            "pollinations" => Some(AIProvider::Pollinations),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AIProvider::OpenAI => "openai",
            AIProvider::Pollinations => "pollinations",
        }
    }
}

/// The contract every scorer satisfies: a 0-10 score and a feedback text.
/// Provider- or analyzer-specific fields (polarity, relevance, raw rubric
/// output) ride along in `extra` and are persisted untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: f64,
    pub feedback: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScoreResult {
    pub fn new(score: f64, feedback: impl Into<String>) -> Self {
        ScoreResult {
            score,
            feedback: feedback.into(),
            extra: Map::new(),
        }
    }

    pub fn with_extra(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// Serve one canned HTTP response on an ephemeral local port and return
    /// the base URL. Lets provider tests exercise the full request/parse
    /// path without the network.
    pub(crate) fn serve_once(content_type: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            content_type,
            body.len(),
            body
        );
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                // Drain the request (headers plus any Content-Length body)
                // before answering, so the client never sees a reset.
                let mut request = Vec::new();
                let mut buf = [0u8; 4096];
                loop {
                    match stream.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => {
                            request.extend_from_slice(&buf[..n]);
                            if request_complete(&request) {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });
        format!("http://{}", addr)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let body_len = text
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())?
            })
            .unwrap_or(0);
        request.len() >= header_end + 4 + body_len
    }

    /// A local address nothing listens on; connections are refused at once.
    pub(crate) fn refused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        drop(listener);
        format!("http://{}", addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_round_trips_through_str() {
        for provider in [AIProvider::OpenAI, AIProvider::Pollinations] {
            assert_eq!(AIProvider::from_str(provider.as_str()), Some(provider));
        }
        assert_eq!(AIProvider::from_str("gemini"), None);
    }

    #[test]
    fn score_result_preserves_extra_fields_through_json() {
        let result = ScoreResult::new(7.5, "Solid answer.")
            .with_extra("relevance", serde_json::json!(0.4));

        let json = serde_json::to_string(&result).unwrap();
        let back: ScoreResult = serde_json::from_str(&json).unwrap();

        assert_eq!(back, result);
        assert_eq!(back.extra["relevance"], serde_json::json!(0.4));
    }

    #[test]
    fn round1_rounds_to_one_decimal() {
        assert_eq!(round1(5.17), 5.2);
        assert_eq!(round1(0.04), 0.0);
        assert_eq!(round1(10.0), 10.0);
    }
}
