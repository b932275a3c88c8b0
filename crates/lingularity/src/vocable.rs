//! Vocabulary entries and their training state.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Score from which an entry counts as learnt.
pub const PERFECTION_SCORE: f64 = 5.0;

/// Days after its last encounter a learnt entry becomes due again.
pub const PERFECTION_RETENTION_DAYS: i64 = 50;

/// A studied vocabulary entry with its reference-language meaning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocableEntry {
    pub vocable: String,
    pub translation: String,
    #[serde(default)]
    pub times_faced: u32,
    #[serde(default)]
    pub score: f64,
    /// Serialized as `YYYY-MM-DD`.
    #[serde(default)]
    pub last_faced_date: Option<NaiveDate>,
}

impl VocableEntry {
    /// A never-trained entry.
    pub fn new(vocable: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            vocable: vocable.into(),
            translation: translation.into(),
            times_faced: 0,
            score: 0.0,
            last_faced_date: None,
        }
    }

    /// Translation without a leading definite article.
    pub fn the_stripped_meaning(&self) -> &str {
        self.translation
            .strip_prefix("the ")
            .unwrap_or(&self.translation)
    }

    pub fn is_new(&self) -> bool {
        self.last_faced_date.is_none()
    }

    /// Replace vocable and meaning; the training state starts over.
    pub fn alter(&mut self, vocable: impl Into<String>, translation: impl Into<String>) {
        *self = Self::new(vocable, translation);
    }

    /// Record one training encounter on `date` worth `increment` points.
    pub fn update_post_training_encounter(&mut self, increment: f64, date: NaiveDate) {
        self.score += increment;
        self.times_faced += 1;
        self.last_faced_date = Some(date);
    }

    /// Scored high enough and faced recently enough to be skipped in training.
    pub fn is_perfected(&self, today: NaiveDate) -> bool {
        match self.last_faced_date {
            Some(date) if self.times_faced > 0 => {
                self.score >= PERFECTION_SCORE
                    && (today - date).num_days() < PERFECTION_RETENTION_DAYS
            }
            _ => false,
        }
    }
}

/// Entries due for training on `today`: everything not yet perfected.
pub fn entries_to_be_trained<'a>(
    entries: impl IntoIterator<Item = &'a VocableEntry>,
    today: NaiveDate,
) -> Vec<&'a VocableEntry> {
    entries
        .into_iter()
        .filter(|entry| !entry.is_perfected(today))
        .collect()
}

/// Vocables sharing one the-stripped meaning, for meanings with at least two.
pub fn find_paraphrases<'a>(
    entries: impl IntoIterator<Item = &'a VocableEntry>,
) -> BTreeMap<String, Vec<String>> {
    let mut meaning_to_vocables: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for entry in entries {
        meaning_to_vocables
            .entry(entry.the_stripped_meaning().to_string())
            .or_default()
            .push(entry.vocable.clone());
    }
    meaning_to_vocables.retain(|_, vocables| vocables.len() >= 2);
    meaning_to_vocables
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn groups_synonyms_by_meaning() {
        let entries = vec![
            VocableEntry::new("la casa", "the house"),
            VocableEntry::new("l'abitazione", "house"),
            VocableEntry::new("il gatto", "the cat"),
            VocableEntry::new("thermos", "thermos"),
        ];
        let paraphrases = find_paraphrases(&entries);
        assert_eq!(paraphrases.len(), 1);
        assert_eq!(
            paraphrases["house"],
            vec!["la casa".to_string(), "l'abitazione".to_string()]
        );
        assert_eq!(entries[3].the_stripped_meaning(), "thermos");
    }

    #[test]
    fn encounters_accumulate_score() {
        let mut entry = VocableEntry::new("il gatto", "the cat");
        assert!(entry.is_new());

        entry.update_post_training_encounter(1.0, date(2024, 3, 1));
        entry.update_post_training_encounter(0.5, date(2024, 3, 2));
        assert!(!entry.is_new());
        assert_eq!(entry.times_faced, 2);
        assert_eq!(entry.score, 1.5);
        assert_eq!(entry.last_faced_date, Some(date(2024, 3, 2)));

        entry.alter("la gatta", "the female cat");
        assert_eq!(entry, VocableEntry::new("la gatta", "the female cat"));
    }

    #[test]
    fn perfection_needs_score_and_recent_encounter() {
        let today = date(2024, 6, 30);
        let mut entry = VocableEntry::new("la casa", "the house");
        assert!(!entry.is_perfected(today));

        for _ in 0..5 {
            entry.update_post_training_encounter(1.0, date(2024, 6, 1));
        }
        assert!(entry.is_perfected(today));
        assert!(!entry.is_perfected(date(2024, 7, 21)));

        let mut weak = VocableEntry::new("il cane", "the dog");
        weak.update_post_training_encounter(4.5, date(2024, 6, 29));
        assert!(!weak.is_perfected(today));

        let entries = [entry, weak];
        let due: Vec<&str> = entries_to_be_trained(&entries, today)
            .into_iter()
            .map(|entry| entry.vocable.as_str())
            .collect();
        assert_eq!(due, vec!["il cane"]);
    }

    #[test]
    fn deserializes_stored_entries() {
        let entry: VocableEntry = serde_json::from_str(
            r#"{"vocable": "la casa", "translation": "the house",
                "timesFaced": 3, "score": 2.5, "lastFacedDate": "2024-05-17"}"#,
        )
        .unwrap();
        assert_eq!(entry.last_faced_date, Some(date(2024, 5, 17)));
        assert_eq!(entry.times_faced, 3);

        let fresh: VocableEntry =
            serde_json::from_str(r#"{"vocable": "ciao", "translation": "hi"}"#).unwrap();
        assert!(fresh.is_new());
    }
}
