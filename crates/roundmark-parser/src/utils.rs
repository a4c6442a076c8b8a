//! Text helpers shared by the block and inline parsers.

use std::borrow::Cow;

/// Normalize a link label for registry lookup.
///
/// Labels match case-insensitively after trimming and collapsing internal
/// whitespace. Case folding is approximated by lowercasing then
/// uppercasing, which maps `ẞ` and `ß` to the same key.
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .to_uppercase()
}

pub(crate) fn is_ascii_punctuation(byte: u8) -> bool {
    byte.is_ascii_punctuation()
}

/// Unicode punctuation (general categories P and S).
///
/// Non-ASCII characters are classified by block ranges rather than a full
/// category table.
pub(crate) fn is_punctuation(c: char) -> bool {
    if c.is_ascii() {
        return is_ascii_punctuation(c as u8);
    }
    matches!(
        c as u32,
        0x00A1..=0x00BF
            | 0x00D7
            | 0x00F7
            | 0x2010..=0x2027
            | 0x2030..=0x205E
            | 0x20A0..=0x20CF
            | 0x2100..=0x214F
            | 0x2190..=0x23FF
            | 0x2500..=0x27BF
            | 0x2E00..=0x2E7F
            | 0x3001..=0x3003
            | 0x3008..=0x3020
            | 0x3030
            | 0xFE30..=0xFE6F
            | 0xFF01..=0xFF0F
            | 0xFF1A..=0xFF20
            | 0xFF3B..=0xFF40
            | 0xFF5B..=0xFF65
    )
}

/// Unicode whitespace for flanking purposes.
pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C') || (!c.is_ascii() && c.is_whitespace())
}

/// Decode an entity or numeric character reference at the start of
/// `text`. Returns the decoded text and the length of the reference.
pub(crate) fn decode_entity(text: &str) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'&') {
        return None;
    }
    let end = bytes.iter().take(40).position(|&b| b == b';')?;
    let body = &text[1..end];

    if let Some(numeric) = body.strip_prefix('#') {
        let (digits, radix, max_len) = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16, 6),
            None => (numeric, 10, 7),
        };
        if digits.is_empty()
            || digits.len() > max_len
            || !digits.chars().all(|c| c.is_digit(radix))
        {
            return None;
        }
        let code = u32::from_str_radix(digits, radix).ok()?;
        let decoded = match char::from_u32(code) {
            Some('\0') | None => '\u{FFFD}',
            Some(c) => c,
        };
        return Some((decoded.to_string(), end + 1));
    }

    let mut chars = body.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    if !starts_alpha || body.len() > 32 || !body.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    let reference = &text[..=end];
    let decoded = html_escape::decode_html_entities(reference);
    // Unknown names come back unchanged; legacy prefixes such as `&not`
    // decode only partly and leave the rest of the name behind.
    if decoded == reference || decoded.chars().count() > 2 {
        return None;
    }
    Some((decoded.into_owned(), end + 1))
}

/// Resolve backslash escapes and entity references.
pub(crate) fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains(['\\', '&']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let bytes = text.as_bytes();
    let mut pos = 0;
    while pos < text.len() {
        match bytes[pos] {
            b'\\' if bytes.get(pos + 1).is_some_and(|&b| is_ascii_punctuation(b)) => {
                out.push(bytes[pos + 1] as char);
                pos += 2;
            }
            b'&' => match decode_entity(&text[pos..]) {
                Some((decoded, len)) => {
                    out.push_str(&decoded);
                    pos += len;
                }
                None => {
                    out.push('&');
                    pos += 1;
                }
            },
            _ => {
                let len = text[pos..].chars().next().map_or(1, char::len_utf8);
                out.push_str(&text[pos..pos + len]);
                pos += len;
            }
        }
    }
    Cow::Owned(out)
}

/// Split trailing spaces and tabs off `text`.
pub(crate) fn split_trailing_whitespace(text: &str) -> (&str, &str) {
    let trimmed = text.trim_end_matches([' ', '\t']);
    (trimmed, &text[trimmed.len()..])
}

/// Split leading spaces and tabs off `text`.
pub(crate) fn split_leading_whitespace(text: &str) -> (&str, &str) {
    let trimmed = text.trim_start_matches([' ', '\t']);
    (&text[..text.len() - trimmed.len()], trimmed)
}
