//! Static question catalog.
//!
//! A JSON document maps interview type ("hr", "technical") to a list of
//! question strings. The catalog is loaded once at manager construction and
//! shared read-only afterwards; a missing file or missing pool is an empty
//! pool, never an error.

use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::path::Path;

use crate::store::Domain;

const BUILTIN_CATALOG: &str = include_str!("../../questions.json");

pub struct QuestionCatalog {
    pools: HashMap<String, Vec<String>>,
}

impl QuestionCatalog {
    /// Load a catalog file, falling back to empty pools when the file is
    /// absent or unparseable.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let pools = match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(pools) => pools,
                Err(e) => {
                    warn!("failed to parse question catalog {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) => {
                warn!("failed to read question catalog {}: {}", path.display(), e);
                HashMap::new()
            }
        };
        QuestionCatalog { pools }
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Self {
        let pools = serde_json::from_str(BUILTIN_CATALOG).unwrap_or_else(|e| {
            warn!("builtin question catalog is invalid: {}", e);
            HashMap::new()
        });
        QuestionCatalog { pools }
    }

    pub fn from_pools(pools: HashMap<String, Vec<String>>) -> Self {
        QuestionCatalog { pools }
    }

    /// Uniformly random question for the given type, with replacement.
    /// `Mixed` draws uniformly across both pools.
    pub fn pick(&self, interview_type: Domain) -> Option<String> {
        let mut rng = rand::thread_rng();
        match interview_type {
            Domain::Hr | Domain::Technical => self
                .pool(interview_type.as_str())
                .choose(&mut rng)
                .cloned(),
            Domain::Mixed => {
                let hr = self.pool(Domain::Hr.as_str());
                let technical = self.pool(Domain::Technical.as_str());
                let total = hr.len() + technical.len();
                if total == 0 {
                    return None;
                }
                let index = rng.gen_range(0..total);
                if index < hr.len() {
                    Some(hr[index].clone())
                } else {
                    Some(technical[index - hr.len()].clone())
                }
            }
        }
    }

    pub fn pool(&self, interview_type: &str) -> &[String] {
        self.pools
            .get(interview_type)
            .map(|p| p.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.pools.values().all(|p| p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_both_pools() {
        let catalog = QuestionCatalog::builtin();
        assert!(!catalog.pool("hr").is_empty());
        assert!(!catalog.pool("technical").is_empty());
    }

    #[test]
    fn missing_file_yields_empty_pools() {
        let catalog = QuestionCatalog::load("/nonexistent/questions.json");
        assert!(catalog.is_empty());
        assert_eq!(catalog.pick(Domain::Hr), None);
    }

    #[test]
    fn missing_pool_yields_no_question() {
        let catalog = QuestionCatalog::from_pools(HashMap::from([(
            "hr".to_string(),
            vec!["Tell me about yourself.".to_string()],
        )]));
        assert_eq!(catalog.pick(Domain::Technical), None);
        assert!(catalog.pick(Domain::Hr).is_some());
    }

    #[test]
    fn pick_draws_from_the_requested_pool() {
        let catalog = QuestionCatalog::builtin();
        for _ in 0..20 {
            let question = catalog.pick(Domain::Hr).unwrap();
            assert!(catalog.pool("hr").contains(&question));
        }
    }

    #[test]
    fn mixed_draws_from_either_pool() {
        let catalog = QuestionCatalog::from_pools(HashMap::from([
            ("hr".to_string(), vec!["hr question".to_string()]),
            ("technical".to_string(), vec!["technical question".to_string()]),
        ]));

        let mut seen_hr = false;
        let mut seen_technical = false;
        for _ in 0..100 {
            match catalog.pick(Domain::Mixed).unwrap().as_str() {
                "hr question" => seen_hr = true,
                "technical question" => seen_technical = true,
                other => panic!("unexpected question: {}", other),
            }
        }
        assert!(seen_hr && seen_technical);
    }

    #[test]
    fn pick_repeats_questions_without_exhaustion() {
        let catalog = QuestionCatalog::from_pools(HashMap::from([(
            "hr".to_string(),
            vec!["only question".to_string()],
        )]));
        for _ in 0..3 {
            assert_eq!(catalog.pick(Domain::Hr).unwrap(), "only question");
        }
    }
}
