use std::collections::HashMap;

use bitvec::prelude::*;
use lingua_normalize::{Normalizer, NormalizerKind};
use lingua_types::SentenceIndex;
use serde::{Deserialize, Serialize};

use crate::store::TokenMap;

type BitSet = BitVec<usize, Lsb0>;

/// Inverted index from normalized token to the sentences comprising it.
///
/// Records the [`NormalizerKind`] it was built with so lookups normalize
/// vocables the same way the sentences were.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenSentenceIndicesMap {
    normalizer: NormalizerKind,
    sentence_count: usize,
    indices: HashMap<String, Vec<SentenceIndex>>,
}

impl TokenSentenceIndicesMap {
    pub fn new(normalizer: NormalizerKind) -> Self {
        Self {
            normalizer,
            sentence_count: 0,
            indices: HashMap::new(),
        }
    }

    /// Index the unique normalized tokens of every sentence, by sentence index.
    pub fn create<S, T>(normalizer: NormalizerKind, sentences_types: S) -> Self
    where
        S: IntoIterator<Item = T>,
        T: IntoIterator<Item = String>,
    {
        let mut map = Self::new(normalizer);
        for (sentence_index, types) in sentences_types.into_iter().enumerate() {
            for token in types {
                map.insert(token, sentence_index);
            }
            map.sentence_count = sentence_index + 1;
        }
        map
    }

    /// Append `sentence_index` to the list of `token`, creating it when absent.
    pub fn insert(&mut self, token: String, sentence_index: SentenceIndex) {
        self.indices.entry(token).or_default().push(sentence_index);
        self.sentence_count = self.sentence_count.max(sentence_index + 1);
    }

    pub fn get(&self, token: &str) -> Option<&[SentenceIndex]> {
        self.indices.get(token).map(Vec::as_slice)
    }

    pub fn normalizer_kind(&self) -> NormalizerKind {
        self.normalizer
    }

    /// Number of sentences the map spans.
    pub fn sentence_count(&self) -> usize {
        self.sentence_count
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SentenceIndex])> + '_ {
        self.indices
            .iter()
            .map(|(token, indices)| (token.as_str(), indices.as_slice()))
    }

    /// Best-fit sentence indices for a vocable, ascending; `None` when no token matches.
    ///
    /// The vocable's tokens are ordered least relevant first. Sentences
    /// comprising all matched tokens are preferred; while that intersection is
    /// empty the least relevant token is dropped, down to the sentences of the
    /// most relevant token alone.
    pub fn comprising_sentence_indices(
        &self,
        vocable: &str,
        normalizer: &Normalizer,
    ) -> Option<Vec<SentenceIndex>> {
        let sets: Vec<BitSet> = normalizer
            .relevance_sorted_types(vocable)
            .iter()
            .filter_map(|token| self.indices.get(token))
            .map(|indices| self.bitset(indices))
            .collect();

        for start in 0..sets.len() {
            let mut candidates = sets[start].clone();
            for set in &sets[start + 1..] {
                candidates &= set;
                if candidates.not_any() {
                    break;
                }
            }
            if candidates.any() || start + 1 == sets.len() {
                return Some(candidates.iter_ones().collect());
            }
        }
        None
    }

    fn bitset(&self, indices: &[SentenceIndex]) -> BitSet {
        let mut set = bitvec![usize, Lsb0; 0; self.sentence_count];
        for &index in indices {
            if index < self.sentence_count {
                set.set(index, true);
            }
        }
        set
    }
}

impl TokenMap for TokenSentenceIndicesMap {}
