use std::sync::Arc;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::domain::search::SearchResult;

/// Orders remote search results by how closely they match the typed query.
#[derive(Clone)]
pub struct FuzzyRanker {
    matcher: Arc<SkimMatcherV2>,
}

impl Default for FuzzyRanker {
    fn default() -> Self {
        Self {
            matcher: Arc::new(SkimMatcherV2::default()),
        }
    }
}

impl FuzzyRanker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn score(&self, choice: &str, pattern: &str) -> Option<i64> {
        self.matcher.fuzzy_match(choice, pattern)
    }

    /// Scores every result and sorts best-first.
    ///
    /// The backend already filtered by the query, so results the matcher
    /// rejects are kept at the bottom instead of being dropped. The sort is
    /// stable to keep backend order among equal scores.
    #[must_use]
    pub fn rank(&self, results: Vec<SearchResult>, query: &str) -> Vec<SearchResult> {
        let query = query.trim();
        let mut scored: Vec<SearchResult> = results
            .into_iter()
            .map(|result| {
                let haystack = match &result.detail {
                    Some(detail) => format!("{} {detail}", result.name),
                    None => result.name.clone(),
                };
                let score = self.score(&haystack, query).unwrap_or(i64::MIN);
                result.with_score(score)
            })
            .collect();

        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ChatKind, Peer};

    fn result(id: i64, name: &str) -> SearchResult {
        SearchResult::new(Peer::new(id, 0, ChatKind::User), name)
    }

    #[test]
    fn test_rank_prefers_closer_match() {
        let ranker = FuzzyRanker::new();
        let ranked = ranker.rank(
            vec![result(1, "xxalxxixxcxxe"), result(2, "alice")],
            "alice",
        );
        assert_eq!(ranked[0].name, "alice");
    }

    #[test]
    fn test_rank_keeps_unmatched_last() {
        let ranker = FuzzyRanker::new();
        let ranked = ranker.rank(vec![result(1, "zzz"), result(2, "bob")], "bob");
        assert_eq!(ranked[0].name, "bob");
        assert_eq!(ranked[1].name, "zzz");
        assert_eq!(ranked[1].score, i64::MIN);
    }
}
