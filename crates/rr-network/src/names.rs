//! Street-name keys and fuzzy suggestions.
//!
//! Lookup keys are compared after [`normalize_name`].  When a closure names a
//! street that is not in the index, [`rank_suggestions`] offers the closest
//! registered keys instead.

use strsim::{jaro_winkler, normalized_levenshtein};

/// Suggestions scoring below this are dropped.
const MIN_SCORE: f64 = 0.6;

/// Trim, collapse inner whitespace, and upper-case.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Similarity in [0, 1] between two already-normalized names.
///
/// Jaro-Winkler rewards shared prefixes (most typos in a street name come
/// after the first few letters); Levenshtein catches dropped characters.
pub fn similarity(a: &str, b: &str) -> f64 {
    jaro_winkler(a, b) * 0.7 + normalized_levenshtein(a, b) * 0.3
}

/// The `limit` best-scoring candidates for `query`, best first.  Ties keep
/// candidate order.
pub fn rank_suggestions<'a, I>(query: &str, candidates: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let query = normalize_name(query);
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .map(|c| (similarity(&query, c), c))
        .filter(|(score, _)| *score >= MIN_SCORE)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, c)| c.to_owned()).collect()
}
