//! A training session: one language and direction with its corpus, token maps
//! and forename convertor, opened once and read from for every exercise.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use lingua_corpus::{BilingualCorpus, LoadMode, Metadata};
use lingua_normalize::Normalizer;
use lingua_types::{Direction, Pos, SentenceIndex, SentencePair};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::forenames::ForenameConvertor;
use crate::occurrences::TokenOccurrencesMap;
use crate::sentence_indices::TokenSentenceIndicesMap;
use crate::store::{MapError, MapStore};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no corpus available for {0}")]
    UnknownLanguage(String),
    #[error("failed to load corpus: {0:#}")]
    Corpus(anyhow::Error),
    #[error("failed to set up normalizer: {0:#}")]
    Normalizer(anyhow::Error),
    #[error(transparent)]
    Maps(#[from] MapError),
}

/// Where corpora, lexicons and token maps live.
#[derive(Clone, Debug)]
pub struct DataPaths {
    pub corpora_dir: PathBuf,
    pub lexicon_dir: Option<PathBuf>,
    pub token_maps_dir: PathBuf,
}

impl DataPaths {
    /// Standard layout below one data root.
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            corpora_dir: root.join("corpora"),
            lexicon_dir: Some(root.join("lexicons")),
            token_maps_dir: root.join("token-maps"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub reference_language: String,
    pub load_mode: LoadMode,
    /// Write freshly built token maps to the map store.
    pub persist_maps: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            reference_language: "English".to_string(),
            load_mode: LoadMode::Mmap,
            persist_maps: true,
        }
    }
}

/// Sentence selection policy of the sentence-translation trainer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrainingMode {
    /// Sentences comprising at least one token of at most mean occurrence.
    Simple,
    /// Sentences whose tokens all occur at least as often as the mean.
    DictionExpansion,
    /// The whole corpus.
    #[default]
    Random,
}

impl fmt::Display for TrainingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrainingMode::Simple => "simple",
            TrainingMode::DictionExpansion => "diction-expansion",
            TrainingMode::Random => "random",
        })
    }
}

#[derive(Debug)]
pub struct TrainingSession {
    language: String,
    direction: Direction,
    corpus: BilingualCorpus,
    normalizer: Normalizer,
    sentence_indices: TokenSentenceIndicesMap,
    occurrences: TokenOccurrencesMap,
    forename_convertor: Option<ForenameConvertor>,
}

impl TrainingSession {
    /// Load the corpus of `language`, load or build its token maps and set up
    /// forename substitution when metadata allows it.
    pub fn open<R: Rng + ?Sized>(
        paths: &DataPaths,
        metadata: &Metadata,
        language: &str,
        direction: Direction,
        options: &SessionOptions,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        let corpus_path = BilingualCorpus::path_for(&paths.corpora_dir, language);
        if !corpus_path.is_file() {
            return Err(SessionError::UnknownLanguage(language.to_string()));
        }

        let start = Instant::now();
        let mut corpus = BilingualCorpus::load_with_mode(&corpus_path, direction, options.load_mode)
            .map_err(SessionError::Corpus)?;
        corpus.strip_bilaterally_present_quotes();
        if corpus.skipped_lines() > 0 {
            warn!(
                "skipped {} malformed lines in {}",
                corpus.skipped_lines(),
                corpus_path.display()
            );
        }
        info!(
            "loaded {} sentence pairs for {language} in {} ms",
            corpus.len(),
            start.elapsed().as_millis()
        );

        let learnt_language = match direction {
            Direction::Standard => language,
            Direction::Reversed => options.reference_language.as_str(),
        };
        let normalizer = Normalizer::select(learnt_language, paths.lexicon_dir.as_deref())
            .map_err(SessionError::Normalizer)?;
        info!("normalizing {learnt_language} with {}", normalizer.kind());

        let store = MapStore::new(&paths.token_maps_dir);
        let map_key = map_key(language, direction);
        let (sentence_indices, occurrences) =
            load_or_create_token_maps(&store, &map_key, &corpus, &normalizer, options.persist_maps)?;

        let forename_convertor = forenames_available(metadata, language, direction, options)
            .then(|| {
                ForenameConvertor::new(
                    metadata,
                    language,
                    &options.reference_language,
                    direction,
                    rng,
                )
            });
        if forename_convertor.is_none() {
            info!("no forename substitution for {language}");
        }

        Ok(Self {
            language: language.to_string(),
            direction,
            corpus,
            normalizer,
            sentence_indices,
            occurrences,
            forename_convertor,
        })
    }

    /// Assemble a session from parts already in memory.
    pub fn from_parts(
        language: impl Into<String>,
        corpus: BilingualCorpus,
        normalizer: Normalizer,
        forename_convertor: Option<ForenameConvertor>,
    ) -> Self {
        let (sentence_indices, occurrences) = create_token_maps(&corpus, &normalizer);
        Self {
            language: language.into(),
            direction: corpus.direction(),
            corpus,
            normalizer,
            sentence_indices,
            occurrences,
            forename_convertor,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn corpus(&self) -> &BilingualCorpus {
        &self.corpus
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn sentence_indices(&self) -> &TokenSentenceIndicesMap {
        &self.sentence_indices
    }

    pub fn occurrences(&self) -> &TokenOccurrencesMap {
        &self.occurrences
    }

    pub fn forename_convertor(&self) -> Option<&ForenameConvertor> {
        self.forename_convertor.as_ref()
    }

    /// Up to `n` shuffled example pairs for `vocable`; `None` when no sentence matches.
    pub fn related_sentence_pairs<R: Rng + ?Sized>(
        &self,
        vocable: &str,
        n: usize,
        rng: &mut R,
    ) -> Option<Vec<SentencePair>> {
        let mut indices = self
            .sentence_indices
            .comprising_sentence_indices(vocable, &self.normalizer)?;
        indices.shuffle(rng);
        Some(self.converted_pairs(&indices[..n.min(indices.len())], rng))
    }

    /// Indices of the sentences `mode` trains on, ascending.
    pub fn mode_sentence_indices(&self, mode: TrainingMode) -> Vec<SentenceIndex> {
        match mode {
            TrainingMode::Random => (0..self.corpus.len()).collect(),
            TrainingMode::Simple => {
                let mean = self.occurrences.occurrence_mean();
                let indices: BTreeSet<SentenceIndex> = self
                    .occurrences
                    .iter()
                    .filter(|(_, count)| *count as f64 <= mean)
                    .filter_map(|(token, _)| self.sentence_indices.get(token))
                    .flatten()
                    .copied()
                    .collect();
                indices.into_iter().collect()
            }
            TrainingMode::DictionExpansion => {
                let mean = self.occurrences.occurrence_mean();
                let mut sentence_tokens: BTreeMap<SentenceIndex, Vec<&str>> = BTreeMap::new();
                for (token, indices) in self.sentence_indices.iter() {
                    for &index in indices {
                        sentence_tokens.entry(index).or_default().push(token);
                    }
                }
                sentence_tokens
                    .into_iter()
                    .filter(|(_, tokens)| {
                        tokens
                            .iter()
                            .filter(|token| self.occurrences.contains(token))
                            .all(|token| self.occurrences.get(token) as f64 >= mean)
                    })
                    .map(|(index, _)| index)
                    .collect()
            }
        }
    }

    /// Up to `n` shuffled pairs selected by `mode`, with the mode's total.
    pub fn training_sentence_pairs<R: Rng + ?Sized>(
        &self,
        mode: TrainingMode,
        n: usize,
        rng: &mut R,
    ) -> (usize, Vec<SentencePair>) {
        let mut indices = self.mode_sentence_indices(mode);
        let total = indices.len();
        indices.shuffle(rng);
        (total, self.converted_pairs(&indices[..n.min(total)], rng))
    }

    fn converted_pairs<R: Rng + ?Sized>(
        &self,
        indices: &[SentenceIndex],
        rng: &mut R,
    ) -> Vec<SentencePair> {
        indices
            .iter()
            .filter_map(|index| self.corpus.get(*index))
            .map(|pair| match &self.forename_convertor {
                Some(convertor) => convertor.convert(pair, rng),
                None => pair.clone(),
            })
            .collect()
    }
}

/// Build the sentence-indices map over the learnt sentences and the
/// occurrences map over their paraphrase clusters.
pub fn create_token_maps(
    corpus: &BilingualCorpus,
    normalizer: &Normalizer,
) -> (TokenSentenceIndicesMap, TokenOccurrencesMap) {
    let start = Instant::now();
    let sentence_types: Vec<HashSet<(String, Option<Pos>)>> = corpus
        .learnt_sentences()
        .map(|sentence| normalizer.normalized_types_with_pos(sentence))
        .collect();

    let sentence_indices = TokenSentenceIndicesMap::create(
        normalizer.kind(),
        sentence_types.iter().map(|types| {
            types
                .iter()
                .map(|(token, _)| token.clone())
                .collect::<HashSet<String>>()
        }),
    );
    let occurrences = TokenOccurrencesMap::create(corpus.paraphrase_clusters().into_iter().map(
        |cluster| {
            cluster
                .flat_map(|index| sentence_types[index].iter().cloned())
                .collect::<Vec<_>>()
        },
    ));

    info!(
        "built token maps: {} indexed tokens, {} counted tokens in {} ms",
        sentence_indices.len(),
        occurrences.len(),
        start.elapsed().as_millis()
    );
    (sentence_indices, occurrences)
}

fn load_or_create_token_maps(
    store: &MapStore,
    key: &str,
    corpus: &BilingualCorpus,
    normalizer: &Normalizer,
    persist: bool,
) -> Result<(TokenSentenceIndicesMap, TokenOccurrencesMap), SessionError> {
    if store.exists::<TokenSentenceIndicesMap>(key) && store.exists::<TokenOccurrencesMap>(key) {
        let sentence_indices: TokenSentenceIndicesMap = store.load(key)?;
        if sentence_indices.normalizer_kind() == normalizer.kind()
            && sentence_indices.sentence_count() == corpus.len()
        {
            let occurrences: TokenOccurrencesMap = store.load(key)?;
            info!("loaded token maps for {key} from {}", store.root().display());
            return Ok((sentence_indices, occurrences));
        }
        warn!("stored token maps for {key} are stale, rebuilding");
    }

    let (sentence_indices, occurrences) = create_token_maps(corpus, normalizer);
    if persist {
        store.save(key, &sentence_indices)?;
        store.save(key, &occurrences)?;
    }
    Ok((sentence_indices, occurrences))
}

/// Store key of a language's maps; reversed sessions index the reference column.
fn map_key(language: &str, direction: Direction) -> String {
    match direction {
        Direction::Standard => language.to_string(),
        Direction::Reversed => format!("{language}-reversed"),
    }
}

fn forenames_available(
    metadata: &Metadata,
    language: &str,
    direction: Direction,
    options: &SessionOptions,
) -> bool {
    ForenameConvertor::available_for(metadata, language)
        && (!direction.is_reversed()
            || metadata
                .data_beset_countries(&options.reference_language)
                .is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn session() -> TrainingSession {
        let pairs = [
            ("Tom is at home.", "Tom è a casa."),
            ("Tom is at home.", "Tom sta a casa."),
            ("The house is red.", "La casa è rossa."),
            ("I sleep.", "Io dormo."),
        ]
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();
        TrainingSession::from_parts(
            "Italian",
            BilingualCorpus::from_pairs(pairs, Direction::Standard),
            Normalizer::Identity,
            None,
        )
    }

    #[test]
    fn occurrences_count_paraphrases_once() {
        let session = session();
        assert_eq!(session.occurrences().get("tom"), 1);
        assert_eq!(session.occurrences().get("casa"), 2);
        assert_eq!(session.sentence_indices().get("tom"), Some(&[0, 1][..]));
    }

    #[test]
    fn related_pairs_are_bounded_and_relevant() {
        let session = session();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let pairs = session.related_sentence_pairs("casa", 2, &mut rng).unwrap();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|(_, learnt)| learnt.contains("casa")));
        assert_eq!(session.related_sentence_pairs("gatto", 2, &mut rng), None);
    }

    #[test]
    fn modes_split_by_occurrence_mean() {
        let session = session();
        // counts: tom 1, è 2, a 1, casa 2, sta 1, la 1, rossa 1, io 1, dormo 1
        assert!(session.occurrences().occurrence_mean() < 2.0);
        assert_eq!(session.mode_sentence_indices(TrainingMode::Random), vec![0, 1, 2, 3]);
        assert_eq!(session.mode_sentence_indices(TrainingMode::Simple), vec![0, 1, 2, 3]);
        assert!(session.mode_sentence_indices(TrainingMode::DictionExpansion).is_empty());

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let (total, pairs) = session.training_sentence_pairs(TrainingMode::Random, 3, &mut rng);
        assert_eq!(total, 4);
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn training_modes_render_kebab_case() {
        assert_eq!(TrainingMode::DictionExpansion.to_string(), "diction-expansion");
        let mode: TrainingMode = serde_json::from_str("\"diction-expansion\"").unwrap();
        assert_eq!(mode, TrainingMode::DictionExpansion);
    }
}
