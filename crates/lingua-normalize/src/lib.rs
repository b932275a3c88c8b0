//! Turn sentences and vocables into indexable tokens.
//!
//! Three strategies share one interface, the [`Normalizer`]:
//! 1. `Lemma`: part-of-speech aware lemmatization backed by a lexicon file.
//! 2. `Stem`: Snowball stemming.
//! 3. `Identity`: lowercase meaningful tokens, available for every language.
//!
//! [`Normalizer::select`] walks that list once and keeps the first strategy
//! available for the language.
//!
//! # Example
//! ```
//! use lingua_normalize::{Normalizer, NormalizerKind};
//!
//! # fn main() -> anyhow::Result<()> {
//! let normalizer = Normalizer::select("Italian", None)?;
//! assert_eq!(normalizer.kind(), NormalizerKind::Stem);
//!
//! let types = normalizer.normalized_types("Le case rosse.");
//! assert!(types.contains("cas"));
//! # Ok(()) }
//! ```

pub mod lemma;
pub mod stem;
pub mod text;

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use lingua_types::Pos;
use serde::{Deserialize, Serialize};

pub use lemma::{LemmatizedToken, Lemmatizer, LexiconLemmatizer};
pub use stem::{Stemmer, SnowballStemmer};

/// Which normalization strategy produced a set of tokens.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizerKind {
    Identity,
    Stem,
    Lemma,
}

impl NormalizerKind {
    /// Strategy [`Normalizer::select`] would pick, without loading anything.
    pub fn available_for(language: &str, lexicon_dir: Option<&Path>) -> Self {
        if lexicon_dir.is_some_and(|dir| LexiconLemmatizer::is_available_for(dir, language)) {
            NormalizerKind::Lemma
        } else if SnowballStemmer::is_available_for(language) {
            NormalizerKind::Stem
        } else {
            NormalizerKind::Identity
        }
    }
}

impl fmt::Display for NormalizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NormalizerKind::Identity => "identity",
            NormalizerKind::Stem => "stem",
            NormalizerKind::Lemma => "lemma",
        })
    }
}

/// Tokenization strategy applied to both indexed sentences and looked-up vocables.
#[derive(Clone)]
pub enum Normalizer {
    Identity,
    Stem(Arc<dyn Stemmer>),
    Lemma(Arc<dyn Lemmatizer>),
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Normalizer::{}", self.kind())
    }
}

impl Normalizer {
    /// Pick the best strategy available for `language`: lemma, then stem, then identity.
    ///
    /// Lemmatization is considered only when `lexicon_dir` holds a lexicon for
    /// the language.
    pub fn select(language: &str, lexicon_dir: Option<&Path>) -> Result<Self> {
        Ok(match (NormalizerKind::available_for(language, lexicon_dir), lexicon_dir) {
            (NormalizerKind::Lemma, Some(dir)) => {
                Normalizer::Lemma(Arc::new(LexiconLemmatizer::load(dir, language)?))
            }
            (NormalizerKind::Stem, _) => match SnowballStemmer::for_language(language) {
                Some(stemmer) => Normalizer::Stem(Arc::new(stemmer)),
                None => Normalizer::Identity,
            },
            _ => Normalizer::Identity,
        })
    }

    pub fn kind(&self) -> NormalizerKind {
        match self {
            Normalizer::Identity => NormalizerKind::Identity,
            Normalizer::Stem(_) => NormalizerKind::Stem,
            Normalizer::Lemma(_) => NormalizerKind::Lemma,
        }
    }

    /// Unique, lowercase, normalized tokens of a sentence as stored in an index.
    pub fn normalized_types(&self, sentence: &str) -> HashSet<String> {
        match self {
            Normalizer::Identity => lowercase_types(sentence),
            Normalizer::Stem(stemmer) => lowercase_types(sentence)
                .iter()
                .map(|token| stemmer.stem(token))
                .collect(),
            Normalizer::Lemma(lemmatizer) => indexable_lemmas(lemmatizer.as_ref(), sentence)
                .into_iter()
                .map(|token| token.lemma)
                .collect(),
        }
    }

    /// Like [`normalized_types`](Self::normalized_types), keeping the tag where
    /// the strategy assigns one.
    pub fn normalized_types_with_pos(&self, sentence: &str) -> HashSet<(String, Option<Pos>)> {
        match self {
            Normalizer::Lemma(lemmatizer) => indexable_lemmas(lemmatizer.as_ref(), sentence)
                .into_iter()
                .map(|token| (token.lemma, Some(token.pos)))
                .collect(),
            _ => self
                .normalized_types(sentence)
                .into_iter()
                .map(|token| (token, None))
                .collect(),
        }
    }

    /// Normalized tokens of a vocable, least relevant first.
    ///
    /// Identity and stem order by token length (an article + noun vocable
    /// reduces to the noun alone); lemma orders by pertinence tier and falls
    /// back to length when no token carries a tier.
    pub fn relevance_sorted_types(&self, vocable: &str) -> Vec<String> {
        match self {
            Normalizer::Identity => length_sorted_meaningful_types(vocable),
            Normalizer::Stem(stemmer) => length_sorted_meaningful_types(vocable)
                .iter()
                .map(|token| stemmer.stem(token))
                .collect(),
            Normalizer::Lemma(lemmatizer) => {
                let mut tokens: Vec<LemmatizedToken> =
                    indexable_lemmas(lemmatizer.as_ref(), vocable)
                        .into_iter()
                        .collect::<HashSet<_>>()
                        .into_iter()
                        .collect();
                if tokens.iter().all(|token| token.pos.pertinence().is_none()) {
                    tokens.sort_by(|a, b| by_length(&a.lemma, &b.lemma));
                } else {
                    tokens.sort_by(|a, b| {
                        a.pos
                            .pertinence()
                            .cmp(&b.pos.pertinence())
                            .then_with(|| by_length(&a.lemma, &b.lemma))
                    });
                }
                tokens.into_iter().map(|token| token.lemma).collect()
            }
        }
    }
}

fn lowercase_types(sentence: &str) -> HashSet<String> {
    text::meaningful_types(sentence, true)
        .into_iter()
        .map(|token| token.to_lowercase())
        .collect()
}

fn indexable_lemmas(lemmatizer: &dyn Lemmatizer, text: &str) -> Vec<LemmatizedToken> {
    lemmatizer
        .lemmatize(&text::strip_special_characters(text, false, false))
        .into_iter()
        .filter(|token| token.pos.is_indexable())
        .collect()
}

fn length_sorted_meaningful_types(vocable: &str) -> Vec<String> {
    if let Some(noun) = text::article_stripped_noun(vocable) {
        return vec![noun.to_lowercase()];
    }
    let mut types: Vec<String> = lowercase_types(vocable).into_iter().collect();
    types.sort_by(|a, b| by_length(a, b));
    types
}

fn by_length(a: &str, b: &str) -> std::cmp::Ordering {
    a.chars()
        .count()
        .cmp(&b.chars().count())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn selection_prefers_lemma_then_stem_then_identity() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("italian.tsv"), "case\tcasa\tNOUN\n").unwrap();

        let lemma = Normalizer::select("Italian", Some(dir.path())).unwrap();
        assert_eq!(lemma.kind(), NormalizerKind::Lemma);

        let stem = Normalizer::select("Spanish", Some(dir.path())).unwrap();
        assert_eq!(stem.kind(), NormalizerKind::Stem);
        for language in ["Swedish", "Russian", "Danish", "Norwegian", "Romanian", "Finnish"] {
            assert_eq!(
                Normalizer::select(language, None).unwrap().kind(),
                NormalizerKind::Stem,
                "{language}"
            );
        }

        let identity = Normalizer::select("Basque", None).unwrap();
        assert_eq!(identity.kind(), NormalizerKind::Identity);
        assert_eq!(
            NormalizerKind::available_for("Basque", Some(dir.path())),
            NormalizerKind::Identity
        );
    }

    #[test]
    fn identity_types_are_lowercase() {
        let types = Normalizer::Identity.normalized_types("Tom's Casa, 42 volte!");
        let mut types: Vec<_> = types.into_iter().collect();
        types.sort();
        assert_eq!(types, vec!["casa", "s", "tom", "volte"]);
    }

    #[test]
    fn identity_sorts_vocable_tokens_by_length() {
        assert_eq!(
            Normalizer::Identity.relevance_sorted_types("la casa rossa"),
            vec!["la", "casa", "rossa"]
        );
        assert_eq!(
            Normalizer::Identity.relevance_sorted_types("l'amour"),
            vec!["amour"]
        );
        assert!(Normalizer::Identity.relevance_sorted_types("?!").is_empty());
    }

    #[test]
    fn lemma_sorts_by_pertinence_and_drops_excluded_tags() {
        let lemmatizer = LexiconLemmatizer::from_entries([
            ("di", "di", Pos::Adp),
            ("la", "il", Pos::Det),
            ("corsa", "corsa", Pos::Noun),
            ("tre", "tre", Pos::Num),
        ]);
        let normalizer = Normalizer::Lemma(Arc::new(lemmatizer));
        assert_eq!(
            normalizer.relevance_sorted_types("la corsa di tre"),
            vec!["di", "tre", "corsa"]
        );
        let with_pos = normalizer.normalized_types_with_pos("la corsa");
        assert!(with_pos.contains(&("corsa".to_string(), Some(Pos::Noun))));
        assert_eq!(with_pos.len(), 1);
    }
}
