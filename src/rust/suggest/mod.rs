//! Prefix suggestions over a remote list of country names.

mod source;

use std::sync::Arc;

use serde::Serialize;

pub use source::{CountrySource, LookupError, RestCountriesSource, StaticCountrySource};

/// Suggestions for one query.
///
/// `degraded` is set when the upstream lookup failed and the empty list
/// stands in for an answer, as opposed to a lookup that simply matched nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    pub names: Vec<String>,
    pub degraded: bool,
}

/// Keeps the candidates whose lowercase form starts with the lowercase query.
///
/// Order is preserved and at most `limit` names are returned.
pub fn filter_by_prefix<I, S>(candidates: I, query: &str, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let query = query.to_lowercase();
    candidates
        .into_iter()
        .map(Into::into)
        .filter(|name: &String| name.to_lowercase().starts_with(&query))
        .take(limit)
        .collect()
}

pub struct SuggestionService {
    source: Arc<dyn CountrySource>,
    limit: usize,
}

impl SuggestionService {
    pub fn new(source: Arc<dyn CountrySource>, limit: usize) -> Self {
        Self { source, limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Fetches the candidate list and filters it by `query`.
    ///
    /// Never fails: a broken lookup yields an empty, degraded answer.
    pub async fn suggest(&self, query: &str) -> Suggestions {
        match self.source.country_names().await {
            Ok(candidates) => Suggestions {
                names: filter_by_prefix(candidates, query, self.limit),
                degraded: false,
            },
            Err(e) => {
                log::warn!("Country lookup failed, returning no suggestions: {}", e);
                Suggestions {
                    names: Vec::new(),
                    degraded: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    const CANDIDATES: [&str; 6] = ["Italy", "Iceland", "India", "Indonesia", "Ireland", "Israel"];

    struct FailingSource;

    #[async_trait]
    impl CountrySource for FailingSource {
        async fn country_names(&self) -> Result<Vec<String>, LookupError> {
            Err(LookupError::Unavailable("connection refused".into()))
        }
    }

    fn service(names: &[&str]) -> SuggestionService {
        SuggestionService::new(Arc::new(StaticCountrySource::new(names.to_vec())), 5)
    }

    #[test]
    fn test_prefix_is_case_insensitive() {
        assert_eq!(filter_by_prefix(CANDIDATES, "ita", 5), vec!["Italy"]);
        assert_eq!(filter_by_prefix(CANDIDATES, "IND", 5), vec!["India", "Indonesia"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(filter_by_prefix(CANDIDATES, "Zz", 5).is_empty());
    }

    #[test]
    fn test_empty_query_takes_first_five() {
        assert_eq!(
            filter_by_prefix(CANDIDATES, "", 5),
            vec!["Italy", "Iceland", "India", "Indonesia", "Ireland"]
        );
    }

    #[test]
    fn test_every_result_matches_and_is_capped() {
        let many: Vec<String> = (0..40).map(|i| format!("Land{}", i)).collect();
        for query in ["", "l", "LAND", "land1", "Land3", "x"] {
            let result = filter_by_prefix(many.clone(), query, 5);
            assert!(result.len() <= 5);
            let lowered = query.to_lowercase();
            assert!(result.iter().all(|name| name.to_lowercase().starts_with(&lowered)));
        }
    }

    #[tokio::test]
    async fn test_suggest_scenario() {
        let suggestions = service(&CANDIDATES).suggest("Ita").await;
        assert_eq!(suggestions.names, vec!["Italy"]);
        assert!(!suggestions.degraded);
    }

    #[tokio::test]
    async fn test_lookup_failure_degrades_to_empty() {
        let service = SuggestionService::new(Arc::new(FailingSource), 5);
        let suggestions = service.suggest("Ita").await;
        assert!(suggestions.names.is_empty());
        assert!(suggestions.degraded);
    }
}
