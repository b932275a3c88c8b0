use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use lingua_normalize::Normalizer;

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let language = args
        .next()
        .context("usage: cargo run -p lingua-normalize --example tokens -- <Language> <text> [lexicon-dir]")?;
    let text = args.next().context("missing text")?;
    let lexicon_dir = args.next().map(PathBuf::from);

    let normalizer = Normalizer::select(&language, lexicon_dir.as_deref())?;
    println!("Normalizer: {}", normalizer.kind());

    let mut types: Vec<_> = normalizer
        .normalized_types_with_pos(&text)
        .into_iter()
        .collect();
    types.sort();
    for (token, pos) in types {
        match pos {
            Some(pos) => println!("{token}\t{pos}"),
            None => println!("{token}"),
        }
    }
    println!(
        "Lookup order: {}",
        normalizer.relevance_sorted_types(&text).join(" < ")
    );
    Ok(())
}
