//! Link syntax scanners: labels, destinations, titles and the inline
//! `(dest "title")` form.
//!
//! These work on byte positions into a paragraph's content and are shared
//! with link reference definition parsing.

use crate::tokens::{LabelType, LinkProperties};
use crate::utils::unescape;

/// Maximum characters between the brackets of a link label.
pub(crate) const MAX_LABEL_CHARS: usize = 999;

/// Skip spaces and tabs with at most one line ending among them.
pub(crate) fn skip_spnl(text: &str, pos: usize) -> usize {
    let bytes = text.as_bytes();
    let mut end = pos;
    let mut seen_newline = false;
    while let Some(&byte) = bytes.get(end) {
        match byte {
            b' ' | b'\t' => end += 1,
            b'\n' if !seen_newline => {
                seen_newline = true;
                end += 1;
            }
            _ => break,
        }
    }
    end
}

/// A scanned link destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Destination<'a> {
    /// Source text without angle brackets.
    pub raw: &'a str,
    pub angle: bool,
    pub end: usize,
}

/// Scan a link destination at `pos`.
///
/// The bare form may be empty only when immediately followed by `)`, which
/// is what inline links need; definitions ask for a non-empty destination.
pub(crate) fn scan_link_destination(
    text: &str,
    pos: usize,
    allow_empty: bool,
) -> Option<Destination<'_>> {
    let bytes = text.as_bytes();
    if bytes.get(pos) == Some(&b'<') {
        let mut end = pos + 1;
        while let Some(&byte) = bytes.get(end) {
            match byte {
                b'>' => {
                    return Some(Destination {
                        raw: &text[pos + 1..end],
                        angle: true,
                        end: end + 1,
                    });
                }
                b'<' | b'\n' => return None,
                b'\\' if bytes.get(end + 1).is_some_and(|&b| b != b'\n') => end += 2,
                _ => end += 1,
            }
        }
        return None;
    }

    let mut end = pos;
    let mut depth = 0usize;
    while let Some(&byte) = bytes.get(end) {
        match byte {
            b'\\' if bytes.get(end + 1).is_some_and(u8::is_ascii_punctuation) => end += 2,
            b'(' => {
                depth += 1;
                end += 1;
            }
            b')' if depth == 0 => break,
            b')' => {
                depth -= 1;
                end += 1;
            }
            b if b <= b' ' || b == 0x7F => break,
            _ => end += 1,
        }
    }
    if depth != 0 {
        return None;
    }
    if end == pos && !(allow_empty && bytes.get(end) == Some(&b')')) {
        return None;
    }
    Some(Destination {
        raw: &text[pos..end],
        angle: false,
        end,
    })
}

/// Scan a link title at `pos`. Returns the end position, the raw text
/// between the delimiters and the opening delimiter.
pub(crate) fn scan_link_title(text: &str, pos: usize) -> Option<(usize, &str, char)> {
    let bytes = text.as_bytes();
    let open = *bytes.get(pos)?;
    let close = match open {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return None,
    };
    let mut end = pos + 1;
    while let Some(&byte) = bytes.get(end) {
        if byte == close {
            return Some((end + 1, &text[pos + 1..end], open as char));
        }
        match byte {
            b'\\' if bytes.get(end + 1).is_some() => end += 2,
            b'(' if open == b'(' => return None,
            _ => end += 1,
        }
    }
    None
}

/// Scan a link label `[...]` at `pos`, returning the position after `]`.
///
/// Labels may not contain unescaped brackets and are limited to
/// [`MAX_LABEL_CHARS`] characters.
pub(crate) fn scan_link_label(text: &str, pos: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(pos) != Some(&b'[') {
        return None;
    }
    let mut end = pos + 1;
    let mut chars = 0;
    while let Some(&byte) = bytes.get(end) {
        match byte {
            b']' => return Some(end + 1),
            b'[' => return None,
            b'\\' if bytes.get(end + 1).is_some() => {
                end += 1;
                chars += 1;
                let len = text[end..].chars().next().map_or(1, char::len_utf8);
                end += len;
                chars += 1;
            }
            _ => {
                end += text[end..].chars().next().map_or(1, char::len_utf8);
                chars += 1;
            }
        }
        if chars > MAX_LABEL_CHARS {
            return None;
        }
    }
    None
}

/// Try the inline form `(dest "title")` with `pos` at the `(`.
pub(crate) fn try_parse_inline_link(text: &str, pos: usize) -> Option<(usize, LinkProperties)> {
    let bytes = text.as_bytes();
    if bytes.get(pos) != Some(&b'(') {
        return None;
    }

    let dest_start = skip_spnl(text, pos + 1);
    let destination = scan_link_destination(text, dest_start, true)?;
    let after_dest = skip_spnl(text, destination.end);

    let mut title = None;
    let mut after_title = after_dest;
    if after_dest > destination.end
        && let Some((end, raw, bound)) = scan_link_title(text, after_dest)
    {
        title = Some((raw, bound));
        after_title = end;
    }
    let close = skip_spnl(text, after_title);
    if bytes.get(close) != Some(&b')') {
        return None;
    }

    let properties = LinkProperties {
        label_type: LabelType::Inline,
        uri: unescape(destination.raw).into_owned(),
        title: title.map(|(raw, _)| unescape(raw).into_owned()),
        raw_uri: destination.raw.to_string(),
        raw_title: title.map(|(raw, _)| raw.to_string()),
        reference_label: None,
        before_uri_whitespace: text[pos + 1..dest_start].to_string(),
        after_uri_whitespace: text[destination.end..after_dest].to_string(),
        after_title_whitespace: text[after_title..close].to_string(),
        title_bound: title.map(|(_, bound)| bound),
        uses_angle_brackets: destination.angle,
    };
    Some((close + 1, properties))
}
