//! Load bilingual sentence corpora and the metadata describing their languages.
//!
//! A corpus file holds one `reference<TAB>target` sentence pair per line, UTF-8
//! encoded, named after the target language (`corpora/Italian.txt`). Pairs keep
//! their file order for the lifetime of a [`BilingualCorpus`], so a
//! [`SentenceIndex`] stays valid as long as the corpus is loaded.
//!
//! Callers choose between memory-mapped files or owned buffers at read time via
//! [`LoadMode`]; either way the parsed pairs are owned by the corpus.
//!
//! # Example
//! ```no_run
//! use lingua_corpus::{BilingualCorpus, LoadMode};
//! use lingua_types::Direction;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut corpus = BilingualCorpus::load_with_mode(
//!     "data/corpora/Italian.txt",
//!     Direction::Standard,
//!     LoadMode::Mmap,
//! )?;
//! corpus.strip_bilaterally_present_quotes();
//! for (shown, learnt) in corpus.pairs().iter().take(3) {
//!     println!("{shown} -> {learnt}");
//! }
//! # Ok(()) }
//! ```

pub mod metadata;

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lingua_normalize::text::{quoted_substrings, strip_special_characters, strip_unicode_artifacts};
use lingua_types::{Direction, SentenceIndex, SentencePair};
use memmap2::Mmap;

pub use metadata::{
    GenderForenames, LanguageMetadata, LanguageProperties, Metadata, SubstitutionForenames,
    Translations,
};

/// Strategy for reading corpus files.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map the file while parsing.
    #[default]
    Mmap,
    /// Read the file into an owned buffer (portable fallback).
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

/// Ordered sentence pairs of one language against the reference language.
///
/// Column 0 of every pair is the sentence shown to the learner, column 1 the
/// sentence being learnt. With [`Direction::Reversed`] the file columns are
/// swapped at load time.
#[derive(Clone, Debug)]
pub struct BilingualCorpus {
    pairs: Vec<SentencePair>,
    direction: Direction,
    skipped_lines: usize,
}

impl BilingualCorpus {
    /// `<corpora_dir>/<Language>.txt`
    pub fn path_for(corpora_dir: impl AsRef<Path>, language: &str) -> PathBuf {
        corpora_dir.as_ref().join(format!("{language}.txt"))
    }

    /// Load a corpus file, memory-mapping it while parsing.
    pub fn load(path: impl AsRef<Path>, direction: Direction) -> Result<Self> {
        Self::load_with_mode(path, direction, LoadMode::Mmap)
    }

    /// Load a corpus file choosing between mmap and owned buffers at runtime.
    ///
    /// Unicode scraping artifacts are stripped from every line. Lines without a
    /// tab separator are skipped and counted.
    pub fn load_with_mode(
        path: impl AsRef<Path>,
        direction: Direction,
        mode: LoadMode,
    ) -> Result<Self> {
        let path = path.as_ref();
        let buffer = load_file(path, mode)?;

        let mut pairs = Vec::new();
        let mut skipped_lines = 0usize;
        for (lineno, raw_line) in buffer.as_slice().split(|b| *b == b'\n').enumerate() {
            let line = strip_cr(raw_line);
            if line.is_empty() {
                continue;
            }
            let line = std::str::from_utf8(line)
                .with_context(|| format!("line {} in {} is not utf8", lineno + 1, path.display()))?;
            let line = strip_unicode_artifacts(line);
            let mut columns = line.split('\t');
            match (columns.next(), columns.next()) {
                (Some(reference), Some(target)) => {
                    pairs.push((reference.to_string(), target.to_string()));
                }
                _ => skipped_lines += 1,
            }
        }

        let mut corpus = Self::from_pairs(pairs, direction);
        corpus.skipped_lines = skipped_lines;
        Ok(corpus)
    }

    /// Build a corpus from `(reference, target)` pairs in file order.
    pub fn from_pairs(pairs: Vec<SentencePair>, direction: Direction) -> Self {
        let pairs = match direction {
            Direction::Standard => pairs,
            Direction::Reversed => pairs
                .into_iter()
                .map(|(reference, target)| (target, reference))
                .collect(),
        };
        Self {
            pairs,
            direction,
            skipped_lines: 0,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of lines dropped at load time for lacking a tab separator.
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    pub fn pairs(&self) -> &[SentencePair] {
        &self.pairs
    }

    pub fn get(&self, index: SentenceIndex) -> Option<&SentencePair> {
        self.pairs.get(index)
    }

    /// Sentences of the language being learnt, by sentence index.
    pub fn learnt_sentences(&self) -> impl Iterator<Item = &str> + '_ {
        self.pairs.iter().map(|(_, learnt)| learnt.as_str())
    }

    /// Sentences shown as prompt, by sentence index.
    pub fn shown_sentences(&self) -> impl Iterator<Item = &str> + '_ {
        self.pairs.iter().map(|(shown, _)| shown.as_str())
    }

    /// Sentences of the reference language (the first file column).
    pub fn reference_sentences(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.pairs.len()).filter_map(|index| self.reference_sentence(index))
    }

    /// Sentences of the corpus' target language (the second file column).
    pub fn target_sentences(&self) -> impl Iterator<Item = &str> + '_ {
        self.pairs.iter().map(|(shown, learnt)| match self.direction {
            Direction::Standard => learnt.as_str(),
            Direction::Reversed => shown.as_str(),
        })
    }

    /// Sentence of the reference language (the first file column) at `index`.
    pub fn reference_sentence(&self, index: SentenceIndex) -> Option<&str> {
        self.pairs.get(index).map(|(shown, learnt)| match self.direction {
            Direction::Standard => shown.as_str(),
            Direction::Reversed => learnt.as_str(),
        })
    }

    /// Learnt-language translation of the first pair whose shown sentence equals `sentence`.
    pub fn query_translation(&self, sentence: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(shown, _)| shown == sentence)
            .map(|(_, learnt)| learnt.as_str())
    }

    /// Remove double-quoted passages present in both sentences of a pair.
    ///
    /// A quote counts as present on both sides when its punctuation-stripped
    /// form occurs among the quotes of either sentence, wherever it sits, so
    /// `"King of the Road!"` and `"King of the Road."` match. Matching quotes
    /// are removed together with their quotation marks; one-sided quotes stay.
    pub fn strip_bilaterally_present_quotes(&mut self) {
        let stripped = |quote: &str| strip_special_characters(quote, false, false);
        for (shown, learnt) in &mut self.pairs {
            let learnt_quotes: HashSet<String> = quoted_substrings(learnt)
                .into_iter()
                .map(stripped)
                .collect();
            let shared: HashSet<String> = quoted_substrings(shown)
                .into_iter()
                .map(stripped)
                .filter(|quote| learnt_quotes.contains(quote))
                .collect();
            if shared.is_empty() {
                continue;
            }
            for sentence in [shown, learnt] {
                let quotes: Vec<String> = quoted_substrings(sentence)
                    .into_iter()
                    .filter(|quote| shared.contains(&stripped(quote)))
                    .map(|quote| format!("\"{quote}\""))
                    .collect();
                for quote in &quotes {
                    *sentence = sentence.replace(quote.as_str(), "");
                }
            }
        }
    }

    /// Runs of consecutive pairs translating the same reference sentence.
    ///
    /// Corpora list alternative translations of one reference sentence on
    /// adjacent lines; each run is one paraphrase cluster.
    pub fn paraphrase_clusters(&self) -> Vec<Range<SentenceIndex>> {
        let mut clusters = Vec::new();
        let mut start = 0usize;
        for index in 1..=self.pairs.len() {
            if index == self.pairs.len()
                || self.reference_sentence(index) != self.reference_sentence(start)
            {
                clusters.push(start..index);
                start = index;
            }
        }
        clusters
    }
}

fn load_file(path: &Path, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}
