use std::path::PathBuf;

use lingua_corpus::Metadata;
use lingua_normalize::NormalizerKind;
use lingua_types::Direction;
use lingularity::{
    DEFAULT_FORENAMES, DataPaths, MapStore, SessionError, SessionOptions, TokenOccurrencesMap,
    TokenSentenceIndicesMap, TrainingMode, TrainingSession,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("data")
}

fn paths(token_maps_dir: &std::path::Path) -> DataPaths {
    DataPaths {
        token_maps_dir: token_maps_dir.to_path_buf(),
        ..DataPaths::from_root(data_dir())
    }
}

fn metadata() -> Metadata {
    Metadata::load(data_dir().join("metadata")).expect("load metadata")
}

fn open(
    token_maps_dir: &std::path::Path,
    language: &str,
    direction: Direction,
) -> Result<TrainingSession, SessionError> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    TrainingSession::open(
        &paths(token_maps_dir),
        &metadata(),
        language,
        direction,
        &SessionOptions::default(),
        &mut rng,
    )
}

#[test]
fn opens_italian_session_and_persists_maps() {
    let maps = tempfile::tempdir().unwrap();
    let session = open(maps.path(), "Italian", Direction::Standard).expect("open session");

    assert_eq!(session.corpus().len(), 7);
    assert_eq!(session.corpus().get(4).unwrap().1, " disse lei.");
    assert_eq!(session.normalizer().kind(), NormalizerKind::Stem);
    assert_eq!(session.forename_convertor().unwrap().country(), "Italy");

    let store = MapStore::new(maps.path());
    assert!(store.exists::<TokenSentenceIndicesMap>("Italian"));
    assert!(store.exists::<TokenOccurrencesMap>("Italian"));
    assert!(maps.path().join("Italian").join("occurrences-map.json").is_file());
}

#[test]
fn reopened_session_answers_identically() {
    let maps = tempfile::tempdir().unwrap();
    let first = open(maps.path(), "Italian", Direction::Standard).unwrap();
    let second = open(maps.path(), "Italian", Direction::Standard).unwrap();

    assert_eq!(first.sentence_indices(), second.sentence_indices());
    assert_eq!(first.occurrences(), second.occurrences());
    for vocable in ["rossa", "la casa", "rasoio", "gatto"] {
        assert_eq!(
            first
                .sentence_indices()
                .comprising_sentence_indices(vocable, first.normalizer()),
            second
                .sentence_indices()
                .comprising_sentence_indices(vocable, second.normalizer()),
        );
    }
}

#[test]
fn related_pairs_resolve_stems() {
    let maps = tempfile::tempdir().unwrap();
    let session = open(maps.path(), "Italian", Direction::Standard).unwrap();
    assert_eq!(
        session
            .sentence_indices()
            .comprising_sentence_indices("rossa", session.normalizer()),
        Some(vec![2, 6])
    );

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let pairs = session.related_sentence_pairs("rossa", 5, &mut rng).unwrap();
    assert_eq!(pairs.len(), 2);
    assert!(pairs.iter().all(|(_, learnt)| learnt.contains("ross")));
    assert!(pairs.iter().all(|(shown, _)| !shown.contains("Mary")));
    assert!(session.related_sentence_pairs("gatto", 5, &mut rng).is_none());
}

#[test]
fn substitutes_every_placeholder_without_collisions() {
    let maps = tempfile::tempdir().unwrap();
    let session = open(maps.path(), "Italian", Direction::Standard).unwrap();
    let metadata = metadata();
    let italy = metadata.country("Italy").unwrap();

    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let pairs = session.related_sentence_pairs("rasoio", 1, &mut rng).unwrap();
        let (shown, learnt) = &pairs[0];
        for name in DEFAULT_FORENAMES {
            assert!(!shown.contains(name), "{shown}");
            assert!(!learnt.contains(name), "{learnt}");
        }

        let words: Vec<&str> = shown.split(' ').collect();
        let (tom, mary, john, alice) = (words[0], words[2], words[4], words[8]);
        assert_ne!(tom, john);
        assert_ne!(mary, alice);
        assert!(italy.male_forenames.latin_spelling.iter().any(|n| n == tom));
        assert!(italy.female_forenames.latin_spelling.iter().any(|n| n == alice));
        assert_eq!(
            learnt,
            &format!("{tom} disse a {mary} che {john} voleva chiedere ad {alice} un rasoio.")
        );
    }
}

#[test]
fn reversed_session_learns_reference_language() {
    let maps = tempfile::tempdir().unwrap();
    let session = open(maps.path(), "Italian", Direction::Reversed).unwrap();

    assert_eq!(session.forename_convertor().unwrap().country(), "Ireland");
    assert!(
        maps.path()
            .join("Italian-reversed")
            .join("sentence-indices-map.json")
            .is_file()
    );

    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let pairs = session.related_sentence_pairs("house", 5, &mut rng).unwrap();
    assert_eq!(pairs.len(), 2);
    for (shown, learnt) in &pairs {
        assert!(learnt.contains("house"));
        assert!(shown.contains("casa"));
        assert!(!learnt.contains("Mary"));
    }
}

#[test]
fn lemma_session_indexes_lemmas() {
    let maps = tempfile::tempdir().unwrap();
    let session = open(maps.path(), "French", Direction::Standard).unwrap();

    assert_eq!(session.normalizer().kind(), NormalizerKind::Lemma);
    assert!(session.forename_convertor().is_none());
    assert_eq!(session.sentence_indices().get("je"), Some(&[2][..]));
    assert!(!session.occurrences().contains("je"));
    assert_eq!(session.occurrences().get("chat"), 3);

    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut learnt: Vec<String> = session
        .related_sentence_pairs("chats dorment", 10, &mut rng)
        .unwrap()
        .into_iter()
        .map(|(_, learnt)| learnt)
        .collect();
    learnt.sort();
    assert_eq!(learnt, vec!["Le chat dort.", "Les chats dorment."]);
}

#[test]
fn training_modes_select_subsets() {
    let maps = tempfile::tempdir().unwrap();
    let session = open(maps.path(), "Italian", Direction::Standard).unwrap();
    let all = session.mode_sentence_indices(TrainingMode::Random);
    assert_eq!(all, (0..7).collect::<Vec<_>>());
    for mode in [TrainingMode::Simple, TrainingMode::DictionExpansion] {
        assert!(
            session
                .mode_sentence_indices(mode)
                .iter()
                .all(|index| all.contains(index))
        );
    }

    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let (total, pairs) = session.training_sentence_pairs(TrainingMode::Simple, 2, &mut rng);
    assert!(total >= pairs.len());
    assert!(pairs.len() <= 2);
}

#[test]
fn unknown_language_is_reported() {
    let maps = tempfile::tempdir().unwrap();
    let err = open(maps.path(), "Klingon", Direction::Standard).unwrap_err();
    assert!(matches!(err, SessionError::UnknownLanguage(ref language) if language == "Klingon"));
}
