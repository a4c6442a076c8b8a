//! Parsing for inline code spans (`code`).

/// Try to parse a code span at the start of `text`.
/// Returns (total_len, raw_content, backtick_count) when a closing run of
/// the same length exists.
pub(crate) fn try_parse_code_span(text: &str) -> Option<(usize, &str, usize)> {
    let opening = text.bytes().take_while(|&b| b == b'`').count();
    if opening == 0 {
        return None;
    }

    let rest = &text[opening..];
    let bytes = rest.as_bytes();
    let mut pos = 0;
    while pos < rest.len() {
        if bytes[pos] == b'`' {
            let closing = bytes[pos..].iter().take_while(|&&b| b == b'`').count();
            if closing == opening {
                return Some((opening + pos + closing, &rest[..pos], opening));
            }
            pos += closing;
        } else {
            pos += 1;
        }
    }
    None
}

/// Content of a code span as rendered: line endings become spaces, and one
/// space is stripped from each side when both sides have one and the
/// content is not all spaces.
pub(crate) fn normalize_code_content(raw: &str) -> String {
    let content = raw.replace('\n', " ");
    let bytes = content.as_bytes();
    if bytes.len() >= 2
        && bytes[0] == b' '
        && bytes[bytes.len() - 1] == b' '
        && !bytes.iter().all(|&b| b == b' ')
    {
        content[1..content.len() - 1].to_string()
    } else {
        content
    }
}
