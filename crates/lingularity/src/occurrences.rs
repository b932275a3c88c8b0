use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use lingua_types::Pos;
use serde::{Deserialize, Serialize};

use crate::store::TokenMap;

/// Corpus-wide occurrence count of every normalized token.
///
/// A token is counted at most once per paraphrase cluster, so sentences
/// translating the same reference sentence do not inflate each other's tokens.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TokenOccurrencesMap {
    counts: HashMap<String, usize>,
    #[serde(skip)]
    mean: OnceLock<f64>,
}

impl TokenOccurrencesMap {
    /// Count tokens over paraphrase clusters.
    ///
    /// Each cluster yields the tokens of its sentences, optionally tagged. Tagged
    /// tokens count only when their part of speech is a content or adposition
    /// class (see [`Pos::counts_as_occurrence`]); untagged tokens always count.
    pub fn create<C, T>(clusters: C) -> Self
    where
        C: IntoIterator<Item = T>,
        T: IntoIterator<Item = (String, Option<Pos>)>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for cluster in clusters {
            let tokens: HashSet<String> = cluster
                .into_iter()
                .filter(|(_, pos)| pos.is_none_or(Pos::counts_as_occurrence))
                .map(|(token, _)| token)
                .collect();
            for token in tokens {
                *counts.entry(token).or_default() += 1;
            }
        }
        Self {
            counts,
            mean: OnceLock::new(),
        }
    }

    /// Occurrence count of `token`, 0 when absent.
    pub fn get(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.counts.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts.iter().map(|(token, count)| (token.as_str(), *count))
    }

    /// Arithmetic mean of all counts; 0.0 for an empty map.
    pub fn occurrence_mean(&self) -> f64 {
        *self.mean.get_or_init(|| {
            if self.counts.is_empty() {
                return 0.0;
            }
            self.counts.values().sum::<usize>() as f64 / self.counts.len() as f64
        })
    }

    /// Median of all counts, truncated to an integer; 0 for an empty map.
    pub fn occurrence_median(&self) -> usize {
        let mut values: Vec<usize> = self.counts.values().copied().collect();
        if values.is_empty() {
            return 0;
        }
        values.sort_unstable();
        let mid = values.len() / 2;
        if values.len() % 2 == 1 {
            values[mid]
        } else {
            (values[mid - 1] + values[mid]) / 2
        }
    }
}

impl PartialEq for TokenOccurrencesMap {
    fn eq(&self, other: &Self) -> bool {
        self.counts == other.counts
    }
}

impl TokenMap for TokenOccurrencesMap {}

#[cfg(test)]
mod tests {
    use super::*;

    fn untagged(tokens: &[&str]) -> Vec<(String, Option<Pos>)> {
        tokens.iter().map(|t| (t.to_string(), None)).collect()
    }

    fn clusters() -> Vec<Vec<(String, Option<Pos>)>> {
        vec![
            // two paraphrases of one reference sentence
            [untagged(&["tom", "è", "casa"]), untagged(&["tom", "sta", "casa"])].concat(),
            untagged(&["la", "casa", "grande"]),
            untagged(&["tom", "dorme"]),
        ]
    }

    #[test]
    fn counts_once_per_cluster() {
        let map = TokenOccurrencesMap::create(clusters());
        assert_eq!(map.get("tom"), 2);
        assert_eq!(map.get("casa"), 2);
        assert_eq!(map.get("sta"), 1);
        assert_eq!(map.get("assente"), 0);
        assert_eq!(map.len(), 7);
    }

    #[test]
    fn recreation_is_idempotent() {
        assert_eq!(
            TokenOccurrencesMap::create(clusters()),
            TokenOccurrencesMap::create(clusters())
        );
    }

    #[test]
    fn pos_tags_filter_counted_tokens() {
        let map = TokenOccurrencesMap::create(vec![vec![
            ("gatto".to_string(), Some(Pos::Noun)),
            ("il".to_string(), Some(Pos::Det)),
            ("dorme".to_string(), Some(Pos::Verb)),
            ("su".to_string(), Some(Pos::Adp)),
            ("lui".to_string(), Some(Pos::Pron)),
        ]]);
        assert!(map.contains("gatto"));
        assert!(map.contains("su"));
        assert!(!map.contains("il"));
        assert!(!map.contains("lui"));
    }

    #[test]
    fn mean_and_median() {
        let map = TokenOccurrencesMap::create(clusters());
        // counts: tom 2, casa 2, è 1, sta 1, la 1, grande 1, dorme 1
        assert!((map.occurrence_mean() - 9.0 / 7.0).abs() < 1e-9);
        assert_eq!(map.occurrence_median(), 1);

        let empty = TokenOccurrencesMap::default();
        assert_eq!(empty.occurrence_mean(), 0.0);
        assert_eq!(empty.occurrence_median(), 0);
    }

    #[test]
    fn even_median_truncates_middle_average() {
        let map = TokenOccurrencesMap::create(vec![
            untagged(&["uno", "due"]),
            untagged(&["uno"]),
            untagged(&["uno"]),
            untagged(&["uno"]),
        ]);
        // counts 1 and 4
        assert_eq!(map.occurrence_median(), 2);
    }
}
