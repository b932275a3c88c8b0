//! On-disk persistence of token maps, one JSON document per language and map type.
//!
//! Maps live at `<root>/<Language>/<map-name>.json`, the map name being derived
//! from the map's type name (see [`map_name`]).

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// A serializable map persisted per language.
pub trait TokenMap: Serialize + DeserializeOwned {
    /// File stem under which the map is stored.
    fn map_name() -> String {
        map_name(std::any::type_name::<Self>())
    }
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("map (de)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("no {name} stored for {language}")]
    Missing { language: String, name: String },
}

/// Drop the leading word of a type name and dash-join the rest in lowercase.
///
/// ```
/// use lingularity::store::map_name;
///
/// assert_eq!(map_name("TokenOccurrencesMap"), "occurrences-map");
/// assert_eq!(map_name("lingularity::TokenSentenceIndicesMap"), "sentence-indices-map");
/// ```
pub fn map_name(type_name: &str) -> String {
    let name = type_name.rsplit("::").next().unwrap_or(type_name);
    let mut words: Vec<String> = Vec::new();
    for ch in name.chars() {
        if ch.is_uppercase() || words.is_empty() {
            words.push(String::new());
        }
        if let Some(word) = words.last_mut() {
            word.extend(ch.to_lowercase());
        }
    }
    words
        .into_iter()
        .skip(1)
        .collect::<Vec<_>>()
        .join("-")
}

/// Directory of per-language token maps.
#[derive(Clone, Debug)]
pub struct MapStore {
    root: PathBuf,
}

impl MapStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for<M: TokenMap>(&self, language: &str) -> PathBuf {
        self.root
            .join(language)
            .join(format!("{}.json", M::map_name()))
    }

    pub fn exists<M: TokenMap>(&self, language: &str) -> bool {
        self.path_for::<M>(language).is_file()
    }

    /// Write `map` atomically, creating the language directory when needed.
    pub fn save<M: TokenMap>(&self, language: &str, map: &M) -> Result<PathBuf, MapError> {
        let path = self.path_for::<M>(language);
        let dir = self.root.join(language);
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, map)?;
            writer.flush()?;
        }
        tmp.persist(&path).map_err(|err| MapError::Io(err.error))?;
        debug!("saved {} for {language} to {}", M::map_name(), path.display());
        Ok(path)
    }

    pub fn load<M: TokenMap>(&self, language: &str) -> Result<M, MapError> {
        let path = self.path_for::<M>(language);
        if !path.is_file() {
            return Err(MapError::Missing {
                language: language.to_string(),
                name: M::map_name(),
            });
        }
        let reader = BufReader::new(File::open(&path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
