//! Snowball stemming.
//!
//! Languages are matched case-insensitively against the algorithms shipped by
//! `rust-stemmers`.

use std::fmt;

use rust_stemmers::Algorithm;

/// Reduces an inflected token to a stem shared by its inflections.
pub trait Stemmer: Send + Sync {
    fn stem(&self, token: &str) -> String;
}

/// Snowball stemmer for one of [`SnowballStemmer::LANGUAGES`].
pub struct SnowballStemmer {
    language: &'static str,
    inner: rust_stemmers::Stemmer,
}

impl SnowballStemmer {
    pub const LANGUAGES: [&'static str; 18] = [
        "Arabic",
        "Danish",
        "Dutch",
        "English",
        "Finnish",
        "French",
        "German",
        "Greek",
        "Hungarian",
        "Italian",
        "Norwegian",
        "Portuguese",
        "Romanian",
        "Russian",
        "Spanish",
        "Swedish",
        "Tamil",
        "Turkish",
    ];

    pub fn is_available_for(language: &str) -> bool {
        algorithm_for(language).is_some()
    }

    pub fn for_language(language: &str) -> Option<Self> {
        let (language, algorithm) = algorithm_for(language)?;
        Some(Self {
            language,
            inner: rust_stemmers::Stemmer::create(algorithm),
        })
    }

    pub fn language(&self) -> &'static str {
        self.language
    }
}

impl fmt::Debug for SnowballStemmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowballStemmer")
            .field("language", &self.language)
            .finish()
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, token: &str) -> String {
        self.inner.stem(&token.to_lowercase()).into_owned()
    }
}

fn algorithm_for(language: &str) -> Option<(&'static str, Algorithm)> {
    let algorithm = match language.to_lowercase().as_str() {
        "arabic" => Algorithm::Arabic,
        "danish" => Algorithm::Danish,
        "dutch" => Algorithm::Dutch,
        "english" => Algorithm::English,
        "finnish" => Algorithm::Finnish,
        "french" => Algorithm::French,
        "german" => Algorithm::German,
        "greek" => Algorithm::Greek,
        "hungarian" => Algorithm::Hungarian,
        "italian" => Algorithm::Italian,
        "norwegian" => Algorithm::Norwegian,
        "portuguese" => Algorithm::Portuguese,
        "romanian" => Algorithm::Romanian,
        "russian" => Algorithm::Russian,
        "spanish" => Algorithm::Spanish,
        "swedish" => Algorithm::Swedish,
        "tamil" => Algorithm::Tamil,
        "turkish" => Algorithm::Turkish,
        _ => return None,
    };
    let name = SnowballStemmer::LANGUAGES
        .iter()
        .find(|name| name.eq_ignore_ascii_case(language))?;
    Some((name, algorithm))
}
