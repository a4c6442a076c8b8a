//! Emphasis and strikethrough using the CommonMark delimiter stack algorithm.
//!
//! Delimiter runs are recorded as they are scanned; `process_emphasis`
//! matches closers left to right against the nearest compatible opener.
//!
//! - "Rule of 3s": if one side can both open and close, the run lengths
//!   may not sum to a multiple of 3 unless both are multiples of 3
//!   (so `*foo**bar*` is one emphasis, not two)
//! - Strong (2 delims) takes precedence over emphasis (1 delim) when possible
//! - Delimiters match by character; `~` runs only match runs of equal length

use std::collections::HashMap;

use crate::utils::{is_punctuation, is_whitespace};

/// A delimiter run in the delimiter stack.
#[derive(Debug, Clone)]
pub(crate) struct Delimiter {
    /// Index of the run's item in the inline item list.
    pub item: usize,
    pub char: char,
    /// Remaining delimiter characters.
    pub count: usize,
    /// Run length as scanned (for the rule of 3s).
    pub original_count: usize,
    pub can_open: bool,
    pub can_close: bool,
    /// False once the delimiter is used up or can no longer match.
    pub active: bool,
}

impl Delimiter {
    pub(crate) fn new(item: usize, char: char, count: usize, can_open: bool, can_close: bool) -> Self {
        Self {
            item,
            char,
            count,
            original_count: count,
            can_open,
            can_close,
            active: true,
        }
    }
}

/// One opener/closer pairing found by `process_emphasis`. Matches are
/// reported innermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EmphasisMatch {
    pub opener: usize,
    pub closer: usize,
    pub char: char,
    pub count: usize,
}

/// Determine whether a run of `run_char` between `before` and `after` can
/// open and/or close emphasis. `None` stands for the start or end of the
/// text.
pub(crate) fn analyze_delimiter_run(
    before: Option<char>,
    after: Option<char>,
    run_char: char,
) -> (bool, bool) {
    let followed_by_whitespace = after.is_none_or(is_whitespace);
    let followed_by_punctuation = after.is_some_and(is_punctuation);
    let preceded_by_whitespace = before.is_none_or(is_whitespace);
    let preceded_by_punctuation = before.is_some_and(is_punctuation);

    let left_flanking = !followed_by_whitespace
        && (!followed_by_punctuation || preceded_by_whitespace || preceded_by_punctuation);
    let right_flanking = !preceded_by_whitespace
        && (!preceded_by_punctuation || followed_by_whitespace || followed_by_punctuation);

    if run_char == '_' {
        let can_open = left_flanking && (!right_flanking || preceded_by_punctuation);
        let can_close = right_flanking && (!left_flanking || followed_by_punctuation);
        (can_open, can_close)
    } else {
        (left_flanking, right_flanking)
    }
}

fn violates_rule_of_three(opener: &Delimiter, closer: &Delimiter) -> bool {
    if opener.char == '~' {
        return false;
    }
    (opener.can_close || closer.can_open)
        && (opener.original_count + closer.original_count) % 3 == 0
        && !(opener.original_count % 3 == 0 && closer.original_count % 3 == 0)
}

fn compatible(opener: &Delimiter, closer: &Delimiter) -> bool {
    opener.active
        && opener.can_open
        && opener.char == closer.char
        && (opener.char != '~' || opener.count == closer.count)
        && !violates_rule_of_three(opener, closer)
}

/// Match every closer at or above `bottom` and return the pairings. The
/// stack is truncated to `bottom` afterwards.
pub(crate) fn process_emphasis(delimiters: &mut Vec<Delimiter>, bottom: usize) -> Vec<EmphasisMatch> {
    let mut matches = Vec::new();
    // Lowest index worth searching for each closer kind after a miss.
    let mut openers_bottom: HashMap<(char, bool, usize), usize> = HashMap::new();

    let mut closer_idx = bottom;
    while closer_idx < delimiters.len() {
        let closer = &delimiters[closer_idx];
        if !closer.active || !closer.can_close {
            closer_idx += 1;
            continue;
        }
        let key = (closer.char, closer.can_open, closer.original_count % 3);
        let lower = openers_bottom.get(&key).copied().unwrap_or(bottom).max(bottom);

        let opener_idx = (lower..closer_idx)
            .rev()
            .find(|&idx| compatible(&delimiters[idx], &delimiters[closer_idx]));

        let Some(opener_idx) = opener_idx else {
            openers_bottom.insert(key, closer_idx);
            if !delimiters[closer_idx].can_open {
                delimiters[closer_idx].active = false;
            }
            closer_idx += 1;
            continue;
        };

        let closer_count = delimiters[closer_idx].count;
        let opener_count = delimiters[opener_idx].count;
        let used = if delimiters[closer_idx].char == '~' {
            closer_count
        } else if closer_count >= 2 && opener_count >= 2 {
            2
        } else {
            1
        };
        delimiters[opener_idx].count -= used;
        delimiters[closer_idx].count -= used;
        matches.push(EmphasisMatch {
            opener: delimiters[opener_idx].item,
            closer: delimiters[closer_idx].item,
            char: delimiters[closer_idx].char,
            count: used,
        });
        log::trace!(
            "Matched {}x{} between items {} and {}",
            used,
            delimiters[closer_idx].char,
            delimiters[opener_idx].item,
            delimiters[closer_idx].item
        );

        for between in &mut delimiters[opener_idx + 1..closer_idx] {
            between.active = false;
        }
        if delimiters[opener_idx].count == 0 {
            delimiters[opener_idx].active = false;
        }
        if delimiters[closer_idx].count == 0 {
            delimiters[closer_idx].active = false;
            closer_idx += 1;
        }
    }

    delimiters.truncate(bottom);
    matches
}
