//! Per-language and per-country metadata documents.
//!
//! `language.json` maps a language name to its [`LanguageMetadata`];
//! `country.json` maps a country name to its [`SubstitutionForenames`] or
//! `null` when no forename data is available for it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lingua_types::Gender;
use serde::{Deserialize, Serialize};

pub const LANGUAGE_METADATA_FILE: &str = "language.json";
pub const COUNTRY_METADATA_FILE: &str = "country.json";

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageMetadata {
    pub properties: LanguageProperties,
    #[serde(default)]
    pub countries_employed_in: Vec<String>,
    #[serde(default)]
    pub translations: Translations,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageProperties {
    pub uses_latin_script: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Translations {
    /// Translations of each default forename, keyed by its English spelling.
    #[serde(default)]
    pub default_forenames: Option<HashMap<String, Vec<String>>>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderForenames {
    pub latin_spelling: Vec<String>,
    #[serde(default)]
    pub native_spelling: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstitutionForenames {
    pub male_forenames: GenderForenames,
    pub female_forenames: GenderForenames,
    #[serde(default)]
    pub demonym: Option<String>,
}

impl SubstitutionForenames {
    pub fn forenames(&self, gender: Gender) -> &GenderForenames {
        match gender {
            Gender::Male => &self.male_forenames,
            Gender::Female => &self.female_forenames,
        }
    }

    /// Whether both genders carry native-script spellings.
    pub fn has_native_spellings(&self) -> bool {
        [&self.male_forenames, &self.female_forenames]
            .iter()
            .all(|forenames| forenames.native_spelling.is_some())
    }
}

/// Parsed language and country documents.
#[derive(Clone, Debug, Default)]
pub struct Metadata {
    languages: HashMap<String, LanguageMetadata>,
    countries: HashMap<String, Option<SubstitutionForenames>>,
}

impl Metadata {
    /// Load `language.json` and `country.json` from `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let language_path = dir.join(LANGUAGE_METADATA_FILE);
        let country_path = dir.join(COUNTRY_METADATA_FILE);
        let language_json = fs::read_to_string(&language_path)
            .with_context(|| format!("open {}", language_path.display()))?;
        let country_json = fs::read_to_string(&country_path)
            .with_context(|| format!("open {}", country_path.display()))?;
        Self::from_json(&language_json, &country_json)
            .with_context(|| format!("parse metadata in {}", dir.display()))
    }

    pub fn from_json(language_json: &str, country_json: &str) -> Result<Self> {
        let languages =
            serde_json::from_str(language_json).context("malformed language metadata")?;
        let countries = serde_json::from_str(country_json).context("malformed country metadata")?;
        Ok(Self {
            languages,
            countries,
        })
    }

    pub fn language(&self, language: &str) -> Option<&LanguageMetadata> {
        self.languages.get(language)
    }

    /// Forename data for `country`, `None` when unknown or explicitly absent.
    pub fn country(&self, country: &str) -> Option<&SubstitutionForenames> {
        self.countries.get(country).and_then(Option::as_ref)
    }

    /// Sorted names of every language with metadata.
    pub fn languages(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Countries employing `language` whose forename data is usable for it.
    ///
    /// Languages without Latin script additionally need native spellings for
    /// both genders. `None` when no country qualifies.
    pub fn data_beset_countries(&self, language: &str) -> Option<Vec<&str>> {
        let metadata = self.language(language)?;
        let latin = metadata.properties.uses_latin_script;
        let countries: Vec<&str> = metadata
            .countries_employed_in
            .iter()
            .filter(|country| {
                self.country(country)
                    .is_some_and(|forenames| latin || forenames.has_native_spellings())
            })
            .map(String::as_str)
            .collect();
        (!countries.is_empty()).then_some(countries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LANGUAGES: &str = r#"{
        "Japanese": {
            "properties": {"usesLatinScript": false},
            "countriesEmployedIn": ["Japan", "Palau"],
            "translations": {"defaultForenames": {"Tom": ["トム"]}}
        },
        "Spanish": {
            "properties": {"usesLatinScript": true},
            "countriesEmployedIn": ["Spain", "Andorra", "Atlantis"]
        }
    }"#;

    const COUNTRIES: &str = r#"{
        "Japan": {
            "maleForenames": {"latinSpelling": ["Haruto"], "nativeSpelling": ["陽翔"]},
            "femaleForenames": {"latinSpelling": ["Yui"], "nativeSpelling": ["結衣"]},
            "demonym": "Japanese"
        },
        "Palau": {
            "maleForenames": {"latinSpelling": ["Ngiraked"], "nativeSpelling": null},
            "femaleForenames": {"latinSpelling": ["Dirraklang"], "nativeSpelling": null}
        },
        "Spain": {
            "maleForenames": {"latinSpelling": ["Hugo"]},
            "femaleForenames": {"latinSpelling": ["Lucía"]}
        },
        "Andorra": null
    }"#;

    #[test]
    fn data_beset_countries_respect_script() {
        let metadata = Metadata::from_json(LANGUAGES, COUNTRIES).unwrap();
        assert_eq!(metadata.data_beset_countries("Japanese"), Some(vec!["Japan"]));
        assert_eq!(metadata.data_beset_countries("Spanish"), Some(vec!["Spain"]));
        assert_eq!(metadata.data_beset_countries("Klingon"), None);
    }

    #[test]
    fn missing_translations_default_to_none() {
        let metadata = Metadata::from_json(LANGUAGES, COUNTRIES).unwrap();
        let spanish = metadata.language("Spanish").unwrap();
        assert!(spanish.translations.default_forenames.is_none());
        assert_eq!(metadata.languages(), vec!["Japanese", "Spanish"]);
        assert_eq!(
            metadata.country("Japan").unwrap().demonym.as_deref(),
            Some("Japanese")
        );
        assert!(metadata.country("Andorra").is_none());
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(Metadata::from_json("{", COUNTRIES).is_err());
        assert!(Metadata::from_json(LANGUAGES, r#"{"Spain": 3}"#).is_err());
    }
}
