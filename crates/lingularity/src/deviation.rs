//! Character-level comparison of a typed answer against its ground truth.
//!
//! [`deviation_masks`] returns one boolean per character of each string, `true`
//! marking a character to emphasize: wrong or superfluous in the response,
//! missed in the ground truth. The alignment tolerates a missing prefix and
//! single-character insertions and omissions, and reports anything else as a
//! plain mismatch.

use std::iter::repeat_n;

/// Per-character deviation flags of one string.
pub type DeviationMask = Vec<bool>;

/// `(response, ground truth)` flags at one aligned position.
type CharMask = (bool, bool);

#[derive(Clone, Copy)]
enum Shift {
    /// The response carries an extra character.
    Superfluous,
    /// The response lacks a character of the ground truth.
    Missing,
}

/// Deviation masks of `response` and `ground_truth`, each as long as its string in chars.
///
/// ```
/// use lingularity::deviation::deviation_masks;
///
/// let (response, ground_truth) = deviation_masks("ossare", "scossare");
/// assert_eq!(response, vec![false; 6]);
/// assert_eq!(ground_truth, [vec![true; 2], vec![false; 6]].concat());
/// ```
pub fn deviation_masks(response: &str, ground_truth: &str) -> (DeviationMask, DeviationMask) {
    let response: Vec<char> = response.chars().collect();
    let ground_truth: Vec<char> = ground_truth.chars().collect();

    let mut zipped = Vec::with_capacity(response.len().max(ground_truth.len()));
    let start_offset = char_masks(&response, &ground_truth, true, &mut zipped);

    let response_mask = zipped
        .iter()
        .skip(start_offset)
        .take(response.len())
        .map(|(r, _)| *r)
        .collect();
    let ground_truth_mask = zipped
        .iter()
        .take(ground_truth.len())
        .map(|(_, g)| *g)
        .collect();
    (response_mask, ground_truth_mask)
}

/// Push aligned masks onto `masks`, returning the offset at which the response
/// column starts (non-zero only when a missing prefix was detected).
fn char_masks(
    response: &[char],
    ground_truth: &[char],
    prefix_check: bool,
    masks: &mut Vec<CharMask>,
) -> usize {
    for i in 0..response.len().max(ground_truth.len()) {
        let (r, g) = match (response.get(i), ground_truth.get(i)) {
            (Some(r), Some(g)) => (r, g),
            (Some(_), None) => {
                masks.extend(repeat_n((true, false), response.len() - i));
                return 0;
            }
            (None, _) => {
                masks.extend(repeat_n((false, true), ground_truth.len().saturating_sub(i)));
                return 0;
            }
        };
        if r == g {
            masks.push((false, false));
            continue;
        }

        if i == 0 && prefix_check {
            let head = &response[..response.len().min(2)];
            if let Some(offset) = find(ground_truth, head) {
                masks.extend(repeat_n((false, true), offset));
                char_masks(response, &ground_truth[offset..], false, masks);
                return offset;
            }
        }

        if (response.len() != ground_truth.len() || response[i + 1..] != ground_truth[i + 1..])
            && shifted_char_masks(response, ground_truth, i, masks)
        {
            return 0;
        }

        masks.push((true, true));
    }
    0
}

/// Try to explain a mismatch at `i` by one extra or one missing response
/// character, checking the likelier shift first.
fn shifted_char_masks(
    response: &[char],
    ground_truth: &[char],
    i: usize,
    masks: &mut Vec<CharMask>,
) -> bool {
    let checks = if response.len() < ground_truth.len() {
        [Shift::Missing, Shift::Superfluous]
    } else {
        [Shift::Superfluous, Shift::Missing]
    };
    for shift in checks {
        match shift {
            Shift::Superfluous if response.get(i + 1) == Some(&ground_truth[i]) => {
                masks.push((true, false));
                char_masks(&response[i + 1..], &ground_truth[i..], false, masks);
                return true;
            }
            Shift::Missing if ground_truth.get(i + 1) == Some(&response[i]) => {
                masks.push((false, true));
                char_masks(&response[i..], &ground_truth[i + 1..], false, masks);
                return true;
            }
            _ => {}
        }
    }
    false
}

fn find(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}
