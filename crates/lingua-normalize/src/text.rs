//! String helpers shared by tokenization, corpus cleaning and forename matching.

use std::collections::HashSet;

/// Characters treated as apostrophes when splitting elisions (`l'amour`).
pub const APOSTROPHES: &[char] = &['\'', '\u{2019}', '\u{2018}', '\u{02BC}', '\u{00B4}'];

/// Characters treated as dashes.
pub const DASHES: &[char] = &['-', '\u{2010}', '\u{2013}', '\u{2014}'];

const SPECIAL_CHARACTERS: &str = "\"„”“!#$%&()*+,./:;<=>?@[]^\\_`{|}~»«。¡¿";

const UNICODE_ARTIFACTS: &[char] = &[
    '\u{2009}', '\u{202F}', '\u{00A0}', '\u{00A2}', '\u{200B}', '\u{00AD}', '\u{200D}', '\u{0008}',
    '\u{3000}',
];

/// Remove soft hyphens, zero-width and no-break spaces and similar scraping leftovers.
pub fn strip_unicode_artifacts(text: &str) -> String {
    text.chars()
        .filter(|c| !UNICODE_ARTIFACTS.contains(c))
        .collect()
}

/// Remove punctuation and symbols, optionally apostrophes and dashes as well.
pub fn strip_special_characters(text: &str, include_apostrophe: bool, include_dash: bool) -> String {
    text.chars()
        .filter(|c| {
            !(SPECIAL_CHARACTERS.contains(*c)
                || (include_apostrophe && APOSTROPHES.contains(c))
                || (include_dash && DASHES.contains(c)))
        })
        .collect()
}

/// Remove every occurrence of each of `patterns` from `text`.
pub fn strip_multiple<'p>(text: &str, patterns: impl IntoIterator<Item = &'p str>) -> String {
    let mut out = text.to_string();
    for pattern in patterns {
        if !pattern.is_empty() {
            out = out.replace(pattern, "");
        }
    }
    out
}

/// Split at any of `delimiters`, keeping empty fields.
///
/// ```
/// use lingua_normalize::text::split_multiple;
///
/// assert_eq!(
///     split_multiple("wildly,unreasonable:yet,lit!?af", &[',', ':', '!', '?']),
///     vec!["wildly", "unreasonable", "yet", "lit", "", "af"]
/// );
/// ```
pub fn split_multiple<'a>(text: &'a str, delimiters: &[char]) -> Vec<&'a str> {
    text.split(|c: char| delimiters.contains(&c)).collect()
}

pub fn is_digit_free(token: &str) -> bool {
    !token.chars().any(char::is_numeric)
}

/// Punctuation-stripped, digit-free tokens in order of appearance.
///
/// Tokens are split at whitespace and dashes, and additionally at apostrophes
/// when `apostrophe_splitting` is set.
pub fn meaningful_tokens(text: &str, apostrophe_splitting: bool) -> Vec<String> {
    let stripped = strip_special_characters(text, false, false);
    stripped
        .split(|c: char| {
            c.is_whitespace()
                || DASHES.contains(&c)
                || (apostrophe_splitting && APOSTROPHES.contains(&c))
        })
        .filter(|token| !token.is_empty() && is_digit_free(token))
        .map(str::to_string)
        .collect()
}

/// Unique [`meaningful_tokens`].
pub fn meaningful_types(text: &str, apostrophe_splitting: bool) -> HashSet<String> {
    meaningful_tokens(text, apostrophe_splitting)
        .into_iter()
        .collect()
}

/// Whether `candidate` reads as article + noun: exactly two fields when split at
/// apostrophes, spaces and dashes, the first shorter than the second.
pub fn contains_article(candidate: &str) -> bool {
    let mut delimiters = APOSTROPHES.to_vec();
    delimiters.extend([' ', '-']);
    match split_multiple(candidate, &delimiters).as_slice() {
        [article, noun] => article.chars().count() < noun.chars().count(),
        _ => false,
    }
}

/// The noun of an article + noun vocable, `None` if no article is detected.
///
/// ```
/// use lingua_normalize::text::article_stripped_noun;
///
/// assert_eq!(article_stripped_noun("l'amour"), Some("amour"));
/// assert_eq!(article_stripped_noun("il pomeriggio"), Some("pomeriggio"));
/// assert_eq!(article_stripped_noun("amour"), None);
/// assert_eq!(article_stripped_noun("c'est-à-dire"), None);
/// ```
pub fn article_stripped_noun(candidate: &str) -> Option<&str> {
    if !contains_article(candidate) {
        return None;
    }
    let mut delimiters = APOSTROPHES.to_vec();
    delimiters.push(' ');
    split_multiple(candidate, &delimiters).get(1).copied()
}

/// Text enclosed in double quotation marks, without the marks.
pub fn quoted_substrings(text: &str) -> Vec<&str> {
    let parts: Vec<&str> = text.split('"').collect();
    parts
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 2 == 1 && *i + 1 < parts.len())
        .map(|(_, part)| *part)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meaningful_tokens_drop_digits_and_split_apostrophes() {
        let tokens = meaningful_tokens(
            "Parce qu'il n'avait rien à foutre avec ces 3 saloppes, dans le Bonn17, disait dieu.",
            true,
        );
        assert_eq!(
            tokens,
            vec![
                "Parce", "qu", "il", "n", "avait", "rien", "à", "foutre", "avec", "ces",
                "saloppes", "dans", "le", "disait", "dieu"
            ]
        );
        assert!(meaningful_tokens("qu'il", false).contains(&"qu'il".to_string()));
    }

    #[test]
    fn strips_special_characters() {
        assert_eq!(
            strip_special_characters("\"wha/Za„“!#$%&()*+,./:;<=>?@[]^_`{|}~»«。¡¿", false, false),
            "whaZa"
        );
        assert_eq!(strip_special_characters("l'a-b", true, true), "lab");
    }

    #[test]
    fn strips_unicode_artifacts() {
        assert_eq!(strip_unicode_artifacts("a\u{00A0}b\u{200B}c\u{00AD}"), "abc");
    }

    #[test]
    fn detects_articles() {
        assert!(contains_article("l'article"));
        assert!(!contains_article("c'est-à-dire"));
        assert!(!contains_article("la casa rossa"));
        assert_eq!(article_stripped_noun("nel guai"), Some("guai"));
        assert_eq!(article_stripped_noun("x-ray"), None);
    }

    #[test]
    fn finds_quoted_text() {
        assert_eq!(
            quoted_substrings(r#"He told me to "bugger off" and called me a "filthy skank", ok"#),
            vec!["bugger off", "filthy skank"]
        );
        assert!(quoted_substrings("He told me to 'bugger off'").is_empty());
        assert!(quoted_substrings(r#"an "unclosed quote"#).is_empty());
    }
}
