//! Lexicon-backed lemmatization.
//!
//! A lexicon is a tab-separated file with one `form<TAB>lemma<TAB>UPOS` entry
//! per line, named after the language (`lexicons/italian.tsv`). Blank lines and
//! lines starting with `#` are ignored.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use lingua_types::Pos;

use crate::text::meaningful_tokens;

/// A lemma paired with the part of speech it was tagged with.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LemmatizedToken {
    pub lemma: String,
    pub pos: Pos,
}

/// Maps running text to lemmas with part-of-speech tags.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, text: &str) -> Vec<LemmatizedToken>;
}

/// Dictionary lookup lemmatizer keyed by lowercase surface form.
///
/// Forms missing from the lexicon are tagged `PROPN` when capitalised and
/// `NOUN` otherwise, with the lowercase surface form as lemma.
#[derive(Clone, Debug, Default)]
pub struct LexiconLemmatizer {
    entries: HashMap<String, (String, Pos)>,
}

impl LexiconLemmatizer {
    pub fn lexicon_path(lexicon_dir: impl AsRef<Path>, language: &str) -> PathBuf {
        lexicon_dir
            .as_ref()
            .join(format!("{}.tsv", language.to_lowercase()))
    }

    pub fn is_available_for(lexicon_dir: impl AsRef<Path>, language: &str) -> bool {
        Self::lexicon_path(lexicon_dir, language).exists()
    }

    /// Load the lexicon of `language` from `lexicon_dir`.
    pub fn load(lexicon_dir: impl AsRef<Path>, language: &str) -> Result<Self> {
        let path = Self::lexicon_path(lexicon_dir, language);
        Ok(Self {
            entries: load_lexicon(&path)?,
        })
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str, Pos)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(form, lemma, pos)| (form.to_lowercase(), (lemma.to_lowercase(), pos)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Lemmatizer for LexiconLemmatizer {
    fn lemmatize(&self, text: &str) -> Vec<LemmatizedToken> {
        meaningful_tokens(text, true)
            .into_iter()
            .map(|token| {
                let lowered = token.to_lowercase();
                match self.entries.get(&lowered) {
                    Some((lemma, pos)) => LemmatizedToken {
                        lemma: lemma.clone(),
                        pos: *pos,
                    },
                    None => {
                        let capitalised = token.chars().next().is_some_and(char::is_uppercase);
                        LemmatizedToken {
                            lemma: lowered,
                            pos: if capitalised { Pos::Propn } else { Pos::Noun },
                        }
                    }
                }
            })
            .collect()
    }
}

fn load_lexicon(path: &Path) -> Result<HashMap<String, (String, Pos)>> {
    let file = File::open(path).with_context(|| format!("open lexicon {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut entries = HashMap::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line =
            line.with_context(|| format!("read line {} in {}", lineno + 1, path.display()))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split('\t');
        let (Some(form), Some(lemma), Some(tag)) = (parts.next(), parts.next(), parts.next())
        else {
            bail!(
                "line {} in {}: expected form, lemma and tag",
                lineno + 1,
                path.display()
            );
        };
        let Some(pos) = Pos::from_tag(tag.trim()) else {
            bail!(
                "line {} in {}: unknown part-of-speech tag {tag:?}",
                lineno + 1,
                path.display()
            );
        };
        entries.insert(form.to_lowercase(), (lemma.to_lowercase(), pos));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_known_forms_case_insensitively() {
        let lemmatizer = LexiconLemmatizer::from_entries([
            ("Gatti", "gatto", Pos::Noun),
            ("dormono", "dormire", Pos::Verb),
            ("i", "il", Pos::Det),
        ]);
        let tokens = lemmatizer.lemmatize("I gatti dormono.");
        assert_eq!(
            tokens,
            vec![
                LemmatizedToken { lemma: "il".into(), pos: Pos::Det },
                LemmatizedToken { lemma: "gatto".into(), pos: Pos::Noun },
                LemmatizedToken { lemma: "dormire".into(), pos: Pos::Verb },
            ]
        );
    }

    #[test]
    fn tags_unknown_forms_by_capitalisation() {
        let lemmatizer = LexiconLemmatizer::default();
        let tokens = lemmatizer.lemmatize("Roma brilla");
        assert_eq!(tokens[0].pos, Pos::Propn);
        assert_eq!(tokens[0].lemma, "roma");
        assert_eq!(tokens[1].pos, Pos::Noun);
    }
}
