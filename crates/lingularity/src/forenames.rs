//! Replace the corpus' stock character names with names common in a country
//! where the language is spoken.
//!
//! Corpora reuse a small cast of placeholder forenames ([`DEFAULT_FORENAMES`]).
//! A [`ForenameConvertor`] detects placeholders realized in both sentences of a
//! pair and substitutes each with one replacement drawn from the pool of the
//! placeholder's gender, in Latin or native script as the sentence requires.

use lingua_corpus::{Metadata, SubstitutionForenames};
use lingua_normalize::text::split_multiple;
use lingua_types::{Direction, Gender, Script, SentencePair};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::info;

/// Placeholder roster: two male, then two female forenames.
pub const DEFAULT_FORENAMES: [&str; 4] = ["Tom", "John", "Mary", "Alice"];

const NAME_DELIMITERS: &[char] = &['\'', '?', '!', '.', ','];

fn gender_of(roster_index: usize) -> Gender {
    if roster_index < 2 {
        Gender::Male
    } else {
        Gender::Female
    }
}

/// Sentence-pair forename substitution for one language and direction.
#[derive(Clone, Debug)]
pub struct ForenameConvertor {
    direction: Direction,
    country: String,
    demonym: Option<String>,
    uses_latin_script: bool,
    /// Localized spellings of each placeholder, parallel to [`DEFAULT_FORENAMES`].
    default_forename_translations: Vec<Vec<String>>,
    /// `[gender][script]` replacement pools.
    replacement_forenames: [[Vec<String>; 2]; 2],
}

impl ForenameConvertor {
    /// Whether `language` has default-forename translations and at least one
    /// country with usable substitution forenames.
    pub fn available_for(metadata: &Metadata, language: &str) -> bool {
        let translated = metadata
            .language(language)
            .and_then(|meta| meta.translations.default_forenames.as_ref())
            .is_some_and(|translations| !translations.is_empty());
        translated && metadata.data_beset_countries(language).is_some()
    }

    /// Build a convertor for `language`, drawing the substitution country at
    /// random among the data-beset countries of the language being learnt.
    ///
    /// # Panics
    /// Panics if [`available_for`](Self::available_for) does not hold for
    /// `language`, or for `reference_language` when `direction` is reversed.
    pub fn new<R: Rng + ?Sized>(
        metadata: &Metadata,
        language: &str,
        reference_language: &str,
        direction: Direction,
        rng: &mut R,
    ) -> Self {
        let substitution_language = if direction.is_reversed() {
            reference_language
        } else {
            language
        };
        let Some((country, forenames)) = metadata
            .data_beset_countries(substitution_language)
            .and_then(|countries| countries.choose(rng).copied())
            .and_then(|country| Some((country, metadata.country(country)?)))
        else {
            panic!("no substitution forenames available for {substitution_language}");
        };
        let Some(language_metadata) = metadata.language(language) else {
            panic!("no metadata for {language}");
        };
        let translations = language_metadata
            .translations
            .default_forenames
            .as_ref()
            .map(|translations| {
                DEFAULT_FORENAMES
                    .iter()
                    .map(|name| translations.get(*name).cloned().unwrap_or_default())
                    .collect()
            })
            .unwrap_or_else(|| vec![Vec::new(); DEFAULT_FORENAMES.len()]);

        info!("using forenames originating from {country}");
        Self::from_parts(
            direction,
            country,
            forenames,
            language_metadata.properties.uses_latin_script,
            translations,
        )
    }

    /// Build a convertor from already chosen substitution data.
    pub fn from_parts(
        direction: Direction,
        country: &str,
        forenames: &SubstitutionForenames,
        uses_latin_script: bool,
        default_forename_translations: Vec<Vec<String>>,
    ) -> Self {
        let pools = |gender: Gender| {
            let spellings = forenames.forenames(gender);
            let latin = spellings.latin_spelling.clone();
            let native = spellings
                .native_spelling
                .clone()
                .unwrap_or_else(|| latin.clone());
            [latin, native]
        };
        Self {
            direction,
            country: country.to_string(),
            demonym: forenames.demonym.clone(),
            uses_latin_script,
            default_forename_translations,
            replacement_forenames: [pools(Gender::Male), pools(Gender::Female)],
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn demonym(&self) -> Option<&str> {
        self.demonym.as_deref()
    }

    /// Substitute the placeholders realized in both sentences of `pair`.
    pub fn convert<R: Rng + ?Sized>(&self, pair: &SentencePair, rng: &mut R) -> SentencePair {
        match self.direction {
            Direction::Standard => self.convert_pair(&pair.0, &pair.1, rng),
            Direction::Reversed => {
                let (reference, target) = self.convert_pair(&pair.1, &pair.0, rng);
                (target, reference)
            }
        }
    }

    fn convert_pair<R: Rng + ?Sized>(
        &self,
        reference: &str,
        target: &str,
        rng: &mut R,
    ) -> SentencePair {
        let original: [Vec<String>; 2] = [
            reference.split(' ').map(str::to_string).collect(),
            target.split(' ').map(str::to_string).collect(),
        ];
        let mut fragments = original.clone();
        // last index drawn per gender, so two placeholders of one gender differ
        let mut blacklist: [Option<usize>; 2] = [None, None];

        for (names, gender) in self.contained_forename_pairs(&fragments) {
            let pools = [
                &self.replacement_forenames[gender.index()][Script::Latin.index()],
                &self.replacement_forenames[gender.index()][self.target_script().index()],
            ];
            let drawable = pools[0].len().min(pools[1].len());
            if drawable == 0 {
                continue;
            }
            let Some(index) = draw_forename_index(drawable, blacklist[gender.index()], rng)
            else {
                continue;
            };
            blacklist[gender.index()] = Some(index);

            for (side, name) in names.iter().enumerate() {
                let is_target = side == 1;
                // matched against the untouched fragment so earlier replacements stay put
                for (fragment, untouched) in fragments[side].iter_mut().zip(&original[side]) {
                    if contains_forename(untouched, name, is_target) {
                        *fragment = fragment.replace(name.as_str(), &pools[side][index]);
                    }
                }
            }
        }

        let [reference, target] = fragments;
        (reference.join(" "), target.join(" "))
    }

    /// Native spellings are used for the target sentence when the language
    /// does not use Latin script; pools without them fall back to Latin.
    fn target_script(&self) -> Script {
        Script::for_language(self.uses_latin_script)
    }

    /// `([placeholder, localized spelling], gender)` for every placeholder
    /// found in the reference fragments whose translation appears in the target.
    fn contained_forename_pairs(&self, fragments: &[Vec<String>; 2]) -> Vec<([String; 2], Gender)> {
        DEFAULT_FORENAMES
            .iter()
            .zip(&self.default_forename_translations)
            .enumerate()
            .filter(|(_, (name, _))| comprises_forename(&fragments[0], name, false))
            .filter_map(|(roster_index, (name, translations))| {
                translations
                    .iter()
                    .find(|translation| comprises_forename(&fragments[1], translation, true))
                    .map(|translation| ([name.to_string(), translation.clone()], gender_of(roster_index)))
            })
            .collect()
    }
}

fn comprises_forename(fragments: &[String], forename: &str, is_target: bool) -> bool {
    fragments
        .iter()
        .any(|fragment| contains_forename(fragment, forename, is_target))
}

/// Whether `fragment` holds `forename`; reference-language fragments must hold
/// it as a whole word, possibly possessive or punctuation-trailed.
fn contains_forename(fragment: &str, forename: &str, is_target: bool) -> bool {
    if forename.is_empty() || !fragment.contains(forename) {
        return false;
    }
    is_target
        || fragment.strip_suffix('s') == Some(forename)
        || split_multiple(fragment, NAME_DELIMITERS).first() == Some(&forename)
}

/// Uniform index below `n` other than `banned`; `None` when nothing is left.
fn draw_forename_index<R: Rng + ?Sized>(
    n: usize,
    banned: Option<usize>,
    rng: &mut R,
) -> Option<usize> {
    let drawable: Vec<usize> = (0..n).filter(|index| Some(*index) != banned).collect();
    drawable.choose(rng).copied()
}
