//! ATX and setext heading parsing.

/// Pieces of an ATX heading line (after its indentation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AtxHeading<'a> {
    pub level: u8,
    pub after_hashes: &'a str,
    pub content: &'a str,
    /// Whitespace and optional closing sequence after the content.
    pub closing: &'a str,
}

/// Try to parse an ATX heading: 1-6 `#` followed by whitespace or the end
/// of the line. A closing run of `#` preceded by whitespace is not content.
pub(crate) fn try_parse_atx_heading(line: &str) -> Option<AtxHeading<'_>> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }

    let body = rest.trim_start_matches([' ', '\t']);
    let after_hashes = &rest[..rest.len() - body.len()];

    // A body made only of hashes is a closing sequence with no content.
    let body_trimmed = body.trim_end_matches([' ', '\t']);
    if body_trimmed.bytes().all(|b| b == b'#') {
        return Some(AtxHeading {
            level: level as u8,
            after_hashes,
            content: "",
            closing: body,
        });
    }

    let without_hashes = body_trimmed.trim_end_matches('#');
    let content_end = if without_hashes.len() < body_trimmed.len()
        && without_hashes.ends_with([' ', '\t'])
    {
        without_hashes.trim_end_matches([' ', '\t']).len()
    } else {
        body_trimmed.len()
    };

    Some(AtxHeading {
        level: level as u8,
        after_hashes,
        content: &body[..content_end],
        closing: &body[content_end..],
    })
}

/// Try to parse a setext underline, returning the heading level.
pub(crate) fn try_parse_setext_underline(line: &str) -> Option<u8> {
    let underline_char = line.chars().next()?;
    let level = match underline_char {
        '=' => 1,
        '-' => 2,
        _ => return None,
    };
    let trimmed = line.trim_end_matches([' ', '\t']);
    if trimmed.chars().all(|c| c == underline_char) {
        Some(level)
    } else {
        None
    }
}
