//! Build and persist token maps for every language with a corpus.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use lingua_corpus::{BilingualCorpus, LoadMode};
use lingua_normalize::Normalizer;
use lingua_types::Direction;
use lingularity::{DataPaths, MapStore, create_token_maps};

fn main() -> Result<()> {
    let data_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p lingularity --example build_maps -- <data-dir> [--force]")?;
    let force = env::args().any(|arg| arg == "--force");
    let paths = DataPaths::from_root(&data_dir);
    let store = MapStore::new(&paths.token_maps_dir);

    let mut languages: Vec<String> = std::fs::read_dir(&paths.corpora_dir)
        .with_context(|| format!("reading {}", paths.corpora_dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            (path.extension()? == "txt")
                .then(|| path.file_stem()?.to_str().map(str::to_string))
                .flatten()
        })
        .collect();
    languages.sort();

    for language in languages {
        if !force && store.exists::<lingularity::TokenSentenceIndicesMap>(&language) {
            println!("{language}: maps present, skipping");
            continue;
        }
        let mut corpus = BilingualCorpus::load_with_mode(
            BilingualCorpus::path_for(&paths.corpora_dir, &language),
            Direction::Standard,
            LoadMode::Mmap,
        )?;
        corpus.strip_bilaterally_present_quotes();
        let normalizer = Normalizer::select(&language, paths.lexicon_dir.as_deref())?;
        let (sentence_indices, occurrences) = create_token_maps(&corpus, &normalizer);
        store.save(&language, &sentence_indices)?;
        store.save(&language, &occurrences)?;
        println!(
            "{language}: {} normalizer, {} indexed tokens, occurrence mean {:.2}, median {}",
            normalizer.kind(),
            sentence_indices.len(),
            occurrences.occurrence_mean(),
            occurrences.occurrence_median()
        );
    }
    Ok(())
}
