//! Shared vocabulary types used across the lingularity crates.
//!
//! Part-of-speech tags follow the Universal Dependencies tag set as emitted by
//! common lemmatizers (`NOUN`, `VERB`, `PROPN`, ...). Each tag maps to a coarse
//! [`Pertinence`] tier which orders the tokens of a vocable from least to most
//! telling when looking up example sentences.
//!
//! ```rust
//! use lingua_types::{Pertinence, Pos};
//!
//! let pos = Pos::from_tag("NOUN").unwrap();
//! assert_eq!(pos.pertinence(), Some(Pertinence::High));
//! assert!(!Pos::Det.is_indexable());
//! ```

use std::fmt;

/// Position of a sentence pair within a loaded corpus.
pub type SentenceIndex = usize;

/// `(shown sentence, learnt sentence)` as stored in a bilingual corpus.
pub type SentencePair = (String, String);

/// Universal part-of-speech tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Pos {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
}

impl Pos {
    /// Parse an upper-case UD tag (`"NOUN"`, `"PROPN"`, ...).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ADJ" => Some(Pos::Adj),
            "ADP" => Some(Pos::Adp),
            "ADV" => Some(Pos::Adv),
            "AUX" => Some(Pos::Aux),
            "CCONJ" => Some(Pos::Cconj),
            "DET" => Some(Pos::Det),
            "INTJ" => Some(Pos::Intj),
            "NOUN" => Some(Pos::Noun),
            "NUM" => Some(Pos::Num),
            "PART" => Some(Pos::Part),
            "PRON" => Some(Pos::Pron),
            "PROPN" => Some(Pos::Propn),
            "PUNCT" => Some(Pos::Punct),
            "SCONJ" => Some(Pos::Sconj),
            "SYM" => Some(Pos::Sym),
            "VERB" => Some(Pos::Verb),
            "X" => Some(Pos::X),
            _ => None,
        }
    }

    /// Emit the UD tag.
    pub fn as_tag(self) -> &'static str {
        match self {
            Pos::Adj => "ADJ",
            Pos::Adp => "ADP",
            Pos::Adv => "ADV",
            Pos::Aux => "AUX",
            Pos::Cconj => "CCONJ",
            Pos::Det => "DET",
            Pos::Intj => "INTJ",
            Pos::Noun => "NOUN",
            Pos::Num => "NUM",
            Pos::Part => "PART",
            Pos::Pron => "PRON",
            Pos::Propn => "PROPN",
            Pos::Punct => "PUNCT",
            Pos::Sconj => "SCONJ",
            Pos::Sym => "SYM",
            Pos::Verb => "VERB",
            Pos::X => "X",
        }
    }

    /// Relevance tier of the tag, `None` for tags without one.
    pub fn pertinence(self) -> Option<Pertinence> {
        match self {
            Pos::Noun | Pos::Verb | Pos::Adj | Pos::Adv => Some(Pertinence::High),
            Pos::Num => Some(Pertinence::Medium),
            Pos::Aux | Pos::Adp | Pos::Pron => Some(Pertinence::Low),
            _ => None,
        }
    }

    /// Whether lemmas of this tag enter the sentence-indices map at all.
    pub fn is_indexable(self) -> bool {
        !matches!(
            self,
            Pos::Det | Pos::Propn | Pos::Sym | Pos::Punct | Pos::X | Pos::Part
        )
    }

    /// Whether lemmas of this tag are counted by the occurrences map.
    pub fn counts_as_occurrence(self) -> bool {
        matches!(
            self,
            Pos::Verb | Pos::Noun | Pos::Adj | Pos::Adv | Pos::Adp | Pos::Intj
        )
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Coarse relevance ranking of a lemmatized token, ordered low to high.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Pertinence {
    Low,
    Medium,
    High,
}

/// Which side of a sentence pair is being learnt.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Direction {
    /// Practise the target language, prompted with the reference language.
    #[default]
    Standard,
    /// Practise the reference language, prompted with the target language.
    Reversed,
}

impl Direction {
    pub fn from_reversed(reversed: bool) -> Self {
        if reversed {
            Direction::Reversed
        } else {
            Direction::Standard
        }
    }

    pub fn is_reversed(self) -> bool {
        self == Direction::Reversed
    }
}

/// Grammatical gender of a forename.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Row of the gender within `[male, female]` tables.
    pub fn index(self) -> usize {
        match self {
            Gender::Male => 0,
            Gender::Female => 1,
        }
    }
}

/// Writing system a forename is spelled in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Script {
    Latin,
    Native,
}

impl Script {
    /// Column of the script within `[latin, native]` tables.
    pub fn index(self) -> usize {
        match self {
            Script::Latin => 0,
            Script::Native => 1,
        }
    }

    pub fn for_language(uses_latin_script: bool) -> Self {
        if uses_latin_script {
            Script::Latin
        } else {
            Script::Native
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for tag in ["NOUN", "VERB", "PROPN", "X", "SCONJ"] {
            assert_eq!(Pos::from_tag(tag).unwrap().as_tag(), tag);
        }
        assert_eq!(Pos::from_tag("noun"), None);
    }

    #[test]
    fn pertinence_tiers_are_ordered() {
        assert!(Pertinence::Low < Pertinence::Medium);
        assert!(Pertinence::Medium < Pertinence::High);
        assert_eq!(Pos::Pron.pertinence(), Some(Pertinence::Low));
        assert_eq!(Pos::Num.pertinence(), Some(Pertinence::Medium));
        assert_eq!(Pos::Det.pertinence(), None);
    }

    #[test]
    fn excluded_tags_are_not_indexable() {
        for pos in [Pos::Det, Pos::Propn, Pos::Sym, Pos::Punct, Pos::X, Pos::Part] {
            assert!(!pos.is_indexable());
        }
        assert!(Pos::Aux.is_indexable());
        assert!(Pos::Adp.counts_as_occurrence());
        assert!(!Pos::Aux.counts_as_occurrence());
    }

    #[test]
    fn script_and_gender_index_tables() {
        assert_eq!(Script::for_language(true), Script::Latin);
        assert_eq!(Script::for_language(false).index(), 1);
        assert_eq!(Gender::Female.index(), 1);
    }
}
