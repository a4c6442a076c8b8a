//! Thematic break parsing.

/// Try to parse a thematic break from a line with its indentation removed.
///
/// A thematic break is 3 or more `*`, `-`, or `_` characters, optionally
/// separated by spaces or tabs, with nothing else on the line.
pub(crate) fn try_parse_thematic_break(line: &str) -> Option<char> {
    let rule_char = line.chars().next()?;
    if !matches!(rule_char, '*' | '-' | '_') {
        return None;
    }

    let mut count = 0;
    for ch in line.chars() {
        match ch {
            c if c == rule_char => count += 1,
            ' ' | '\t' => continue,
            _ => return None,
        }
    }

    if count >= 3 { Some(rule_char) } else { None }
}
