//! Fuzzy name matching for payee search
//!
//! A fixed decision ladder: each [`MatchTier`] is tried in order and the
//! first one that applies decides the score. Comparison is case-insensitive.
//!
//! | Tier          | Condition                                  | Score      |
//! |---------------|--------------------------------------------|------------|
//! | `Exact`       | names are equal                            | 100        |
//! | `Prefix`      | candidate starts with the query            | 90         |
//! | `Substring`   | candidate contains the query               | 70         |
//! | `Word`        | query words start/appear in candidate words | 30-60      |
//! | `Subsequence` | query chars appear in order in candidate   | (20, 40]   |

use serde::Serialize;

/// Maximum number of results returned by [`search`]
pub const MAX_RESULTS: usize = 10;

const WORD_PREFIX_POINTS: f64 = 50.0;
const WORD_CONTAINS_POINTS: f64 = 30.0;
const WORD_TIER_CAP: f64 = 60.0;
const SUBSEQUENCE_SCALE: f64 = 40.0;
const SUBSEQUENCE_THRESHOLD: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Exact,
    Prefix,
    Substring,
    Word,
    Subsequence,
}

impl MatchTier {
    /// Tiers in evaluation order
    pub const LADDER: [MatchTier; 5] = [
        MatchTier::Exact,
        MatchTier::Prefix,
        MatchTier::Substring,
        MatchTier::Word,
        MatchTier::Subsequence,
    ];

    /// Score for this tier, or `None` if the tier does not apply.
    /// Both inputs must already be lowercased.
    fn evaluate(&self, query: &str, candidate: &str) -> Option<f64> {
        match self {
            Self::Exact => (candidate == query).then_some(100.0),
            Self::Prefix => candidate.starts_with(query).then_some(90.0),
            Self::Substring => candidate.contains(query).then_some(70.0),
            Self::Word => {
                let score = word_score(query, candidate);
                (score > 0.0).then(|| score.min(WORD_TIER_CAP))
            }
            Self::Subsequence => {
                let score = subsequence_score(query, candidate);
                (score > SUBSEQUENCE_THRESHOLD).then_some(score)
            }
        }
    }
}

/// Outcome of comparing one query against one candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub tier: MatchTier,
    pub score: f64,
}

/// Run the ladder; `None` means no tier applied
pub fn match_name(query: &str, candidate: &str) -> Option<Match> {
    let query = query.to_lowercase();
    let candidate = candidate.to_lowercase();

    MatchTier::LADDER.iter().find_map(|tier| {
        tier.evaluate(&query, &candidate)
            .map(|score| Match { tier: *tier, score })
    })
}

/// Relevance of `candidate` for `query`; 0 means no match
pub fn score(query: &str, candidate: &str) -> f64 {
    match_name(query, candidate).map_or(0.0, |m| m.score)
}

/// Sum of per-word points; words are runs of non-whitespace, so leading,
/// trailing or repeated spaces never produce an empty word that would
/// prefix-match every candidate word
fn word_score(query: &str, candidate: &str) -> f64 {
    let candidate_words: Vec<&str> = candidate.split_whitespace().collect();

    query
        .split_whitespace()
        .map(|q| {
            candidate_words
                .iter()
                .find_map(|c| {
                    if c.starts_with(q) {
                        Some(WORD_PREFIX_POINTS)
                    } else if c.contains(q) {
                        Some(WORD_CONTAINS_POINTS)
                    } else {
                        None
                    }
                })
                .unwrap_or(0.0)
        })
        .sum()
}

fn subsequence_score(query: &str, candidate: &str) -> f64 {
    let query_len = query.chars().count();
    if query_len == 0 {
        return 0.0;
    }

    let mut remaining = candidate.chars();
    let mut matched = 0usize;
    for qc in query.chars() {
        // Greedy: take the leftmost occurrence after the cursor. A miss
        // leaves the cursor where it was.
        let mut probe = remaining.clone();
        if probe.any(|c| c == qc) {
            matched += 1;
            remaining = probe;
        }
    }

    matched as f64 / query_len as f64 * SUBSEQUENCE_SCALE
}

/// A scored candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scored<T> {
    pub item: T,
    pub score: f64,
}

/// Score every candidate, drop non-matches, order by descending score
/// (ties keep input order) and keep the best [`MAX_RESULTS`].
pub fn search<T, F>(query: &str, candidates: impl IntoIterator<Item = T>, name: F) -> Vec<Scored<T>>
where
    F: Fn(&T) -> &str,
{
    let mut scored: Vec<Scored<T>> = candidates
        .into_iter()
        .filter_map(|item| {
            let score = score(query, name(&item));
            (score > 0.0).then_some(Scored { item, score })
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(MAX_RESULTS);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(score("Coffee Shop", "coffee shop"), 100.0);
        assert_eq!(match_name("netflix", "NETFLIX").unwrap().tier, MatchTier::Exact);
    }

    #[test]
    fn test_prefix_match() {
        assert_eq!(score("coffee", "Coffee Shop"), 90.0);
    }

    #[test]
    fn test_substring_match() {
        assert_eq!(score("shop", "Coffee Shop"), 70.0);
        assert_eq!(match_name("ee sh", "Coffee Shop").unwrap().tier, MatchTier::Substring);
    }

    #[test]
    fn test_word_match_prefix_capped() {
        // "cof" and "sho" both start candidate words: 50 + 50 capped at 60
        let m = match_name("cof sho", "Coffee Shop").unwrap();
        assert_eq!(m.tier, MatchTier::Word);
        assert_eq!(m.score, 60.0);
    }

    #[test]
    fn test_word_match_single_prefix() {
        // "market" starts "Market"; "xyz" matches nothing
        assert_eq!(score("market xyz", "Whole Foods Market"), 50.0);
    }

    #[test]
    fn test_word_match_contains_only() {
        // "ood" is inside "foods" but no word starts with it
        assert_eq!(score("ood zzz", "Whole Foods"), 30.0);
    }

    #[test]
    fn test_word_match_ignores_surrounding_whitespace() {
        assert_eq!(score(" xyz", "Coffee Shop"), 0.0);
        assert_eq!(score("xyz  ", "Coffee Shop"), 0.0);
        assert_eq!(score("  market   xyz", "Whole Foods Market"), 50.0);
    }

    #[test]
    fn test_word_match_first_candidate_word_wins() {
        // First candidate word containing "oo" is "books" (contains, 30);
        // the scan stops there even though "oolong" would be a prefix hit.
        assert_eq!(score("oo qq", "books oolong"), 30.0);
    }

    #[test]
    fn test_subsequence_match() {
        // all 4 chars of "cfsp" appear in order in "coffee shop": 40
        let m = match_name("cfsp", "Coffee Shop").unwrap();
        assert_eq!(m.tier, MatchTier::Subsequence);
        assert_eq!(m.score, 40.0);
    }

    #[test]
    fn test_subsequence_partial() {
        // c, f match; z misses; p matches after f: 3/4 * 40 = 30
        assert_eq!(score("cfzp", "Coffee Shop"), 30.0);
    }

    #[test]
    fn test_subsequence_at_threshold_is_no_match() {
        // 2 of 4 chars: exactly 20, which does not exceed the threshold
        assert_eq!(score("cqzf", "Coffee"), 0.0);
    }

    #[test]
    fn test_no_match() {
        assert_eq!(score("xyz123", "Coffee Shop"), 0.0);
        assert!(match_name("xyz123", "Coffee Shop").is_none());
    }

    #[test]
    fn test_empty_query_is_prefix_of_everything() {
        assert_eq!(score("", "Coffee Shop"), 90.0);
        assert_eq!(score("", ""), 100.0);
    }

    #[test]
    fn test_score_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(score("amzn mktp", "Amazon Marketplace"), score("amzn mktp", "Amazon Marketplace"));
        }
    }

    #[test]
    fn test_search_orders_and_filters() {
        let names = vec!["Coffee Shop", "The Coffee House", "Gas Station", "Coffee"];
        let results = search("coffee", names, |n| *n);
        let ordered: Vec<&str> = results.iter().map(|r| r.item).collect();
        assert_eq!(ordered, vec!["Coffee", "Coffee Shop", "The Coffee House"]);
        assert_eq!(results[0].score, 100.0);
        assert_eq!(results[1].score, 90.0);
        assert_eq!(results[2].score, 70.0);
    }

    #[test]
    fn test_search_is_stable_on_ties() {
        let names = vec!["Shop B", "Shop A", "Shop C"];
        let results = search("shop", names, |n| *n);
        let ordered: Vec<&str> = results.iter().map(|r| r.item).collect();
        assert_eq!(ordered, vec!["Shop B", "Shop A", "Shop C"]);
    }

    #[test]
    fn test_search_caps_results() {
        let names: Vec<String> = (0..25).map(|i| format!("Store {}", i)).collect();
        let results = search("store", names, |n| n.as_str());
        assert_eq!(results.len(), MAX_RESULTS);
        assert_eq!(results[0].item, "Store 0");
    }

    #[test]
    fn test_search_no_results() {
        let results = search("xyz123", vec!["Coffee Shop"], |n| *n);
        assert!(results.is_empty());
    }
}
