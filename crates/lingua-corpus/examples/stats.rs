use std::env;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use lingua_corpus::{BilingualCorpus, LoadMode, Metadata};
use lingua_types::Direction;

fn main() -> Result<()> {
    let data_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p lingua-corpus --example stats -- <data-dir> <Language>")?;
    let language = env::args()
        .nth(2)
        .context("usage: cargo run -p lingua-corpus --example stats -- <data-dir> <Language>")?;

    let start = Instant::now();
    let corpus = BilingualCorpus::load_with_mode(
        BilingualCorpus::path_for(data_dir.join("corpora"), &language),
        Direction::Standard,
        LoadMode::Mmap,
    )
    .with_context(|| format!("loading {language} corpus from {}", data_dir.display()))?;
    let elapsed = start.elapsed();

    let clusters = corpus.paraphrase_clusters();
    let largest = clusters.iter().map(|c| c.len()).max().unwrap_or(0);

    println!("Corpus: {language} ({} ms)", elapsed.as_millis());
    println!("Sentence pairs   : {}", corpus.len());
    println!("Skipped lines    : {}", corpus.skipped_lines());
    println!("Paraphrase clusters: {}", clusters.len());
    println!("Largest cluster  : {largest}");

    let metadata = Metadata::load(data_dir.join("metadata"))?;
    match metadata.data_beset_countries(&language) {
        Some(countries) => println!("Forename countries: {}", countries.join(", ")),
        None => println!("Forename countries: none"),
    }

    Ok(())
}
