//! List item markers and continuation.

use crate::source::LineCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListDelimiter {
    Period,
    RightParen,
}

impl ListDelimiter {
    pub(crate) fn as_char(&self) -> char {
        match self {
            ListDelimiter::Period => '.',
            ListDelimiter::RightParen => ')',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListMarker {
    Bullet(char),
    Ordered { start: u64, delimiter: ListDelimiter },
}

impl ListMarker {
    pub(crate) fn is_ordered(&self) -> bool {
        matches!(self, ListMarker::Ordered { .. })
    }

    /// Bullet character, or the delimiter of an ordered marker.
    pub(crate) fn delimiter(&self) -> char {
        match self {
            ListMarker::Bullet(c) => *c,
            ListMarker::Ordered { delimiter, .. } => delimiter.as_char(),
        }
    }

    pub(crate) fn start(&self) -> u64 {
        match self {
            ListMarker::Bullet(_) => 0,
            ListMarker::Ordered { start, .. } => *start,
        }
    }

    /// Items belong to the same list when they share the bullet character
    /// or the ordered delimiter.
    pub(crate) fn continues_list(&self, ordered: bool, delimiter: char) -> bool {
        self.is_ordered() == ordered && self.delimiter() == delimiter
    }
}

/// A list item marker consumed from a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedListItem<'a> {
    pub marker: ListMarker,
    pub leading_whitespace: &'a str,
    pub marker_text: &'a str,
    pub after_marker: &'a str,
    /// Columns of indentation required on continuation lines.
    pub content_indent: usize,
}

/// Parse the bullet or ordered marker at the start of `text`.
/// Returns the marker and its length in bytes.
fn parse_marker(text: &str) -> Option<(ListMarker, usize)> {
    let bytes = text.as_bytes();
    match *bytes.first()? {
        c @ (b'-' | b'+' | b'*') => Some((ListMarker::Bullet(c as char), 1)),
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > 9 {
                return None;
            }
            let delimiter = match bytes.get(digits) {
                Some(b'.') => ListDelimiter::Period,
                Some(b')') => ListDelimiter::RightParen,
                _ => return None,
            };
            let start = text[..digits].parse().ok()?;
            Some((ListMarker::Ordered { start, delimiter }, digits + 1))
        }
        _ => None,
    }
}

/// Try to open a list item at the cursor.
///
/// When the item would interrupt a paragraph it must have content and, if
/// ordered, start at 1. On success the cursor sits at the item's content:
/// after the marker and one to four columns of whitespace, or exactly one
/// column when five or more follow or the rest of the line is blank.
pub(crate) fn try_parse_list_item<'a>(
    cursor: &mut LineCursor<'a>,
    interrupts_paragraph: bool,
) -> Option<ParsedListItem<'a>> {
    if cursor.is_indented() {
        return None;
    }
    let rest = cursor.rest_from_nonspace();
    let (marker, marker_len) = parse_marker(rest)?;
    if !matches!(rest.as_bytes().get(marker_len), None | Some(b' ' | b'\t')) {
        return None;
    }
    if interrupts_paragraph {
        if marker.start() != 1 && marker.is_ordered() {
            return None;
        }
        if rest[marker_len..].trim_matches([' ', '\t']).is_empty() {
            return None;
        }
    }

    let mut work = cursor.clone();
    let marker_offset = work.indent();
    let leading_whitespace = work.advance_next_nonspace();
    let marker_text = work.advance_bytes(marker_len);

    let spaces_start = work.clone();
    loop {
        work.advance_columns(1);
        if work.column() - spaces_start.column() >= 5 || !work.peek_is_space_or_tab() {
            break;
        }
    }
    let blank_item = work.at_end();
    let spaces_after = work.column() - spaces_start.column();
    let padding = if !(1..5).contains(&spaces_after) || blank_item {
        work = spaces_start.clone();
        if work.peek_is_space_or_tab() {
            work.advance_columns(1);
        }
        marker_len + 1
    } else {
        marker_len + spaces_after
    };

    let after_marker = work.slice(spaces_start.offset(), work.offset());
    *cursor = work;
    Some(ParsedListItem {
        marker,
        leading_whitespace,
        marker_text,
        after_marker,
        content_indent: marker_offset + padding,
    })
}

/// Continue an open list item. Blank lines continue items that already
/// have content; other lines need the item's content indentation.
pub(crate) fn continue_list_item<'a>(
    cursor: &mut LineCursor<'a>,
    content_indent: usize,
    has_children: bool,
) -> Option<&'a str> {
    if cursor.is_blank() {
        if !has_children {
            return None;
        }
        return Some(cursor.advance_next_nonspace());
    }
    if cursor.indent() >= content_indent {
        return Some(cursor.advance_columns(content_indent));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Option<(ParsedListItem<'_>, String)> {
        let mut cursor = LineCursor::new(line);
        let item = try_parse_list_item(&mut cursor, false)?;
        let rest = cursor.rest_with_phantom();
        Some((item, rest))
    }

    #[test]
    fn bullet_with_one_space() {
        let (item, rest) = parse("- foo").unwrap();
        assert_eq!(item.marker, ListMarker::Bullet('-'));
        assert_eq!(item.content_indent, 2);
        assert_eq!(item.after_marker, " ");
        assert_eq!(rest, "foo");
    }

    #[test]
    fn ordered_with_wide_padding() {
        let (item, rest) = parse(" 10.   foo").unwrap();
        assert_eq!(
            item.marker,
            ListMarker::Ordered {
                start: 10,
                delimiter: ListDelimiter::Period
            }
        );
        assert_eq!(item.leading_whitespace, " ");
        assert_eq!(item.marker_text, "10.");
        assert_eq!(item.content_indent, 7);
        assert_eq!(rest, "foo");
    }

    #[test]
    fn five_spaces_means_indented_code_content() {
        let (item, rest) = parse("-     code").unwrap();
        assert_eq!(item.content_indent, 2);
        assert_eq!(item.after_marker, " ");
        assert_eq!(rest, "    code");
    }

    #[test]
    fn blank_item() {
        let (item, rest) = parse("-").unwrap();
        assert_eq!(item.content_indent, 2);
        assert_eq!(item.after_marker, "");
        assert_eq!(rest, "");
    }

    #[test]
    fn tab_after_marker() {
        let (item, rest) = parse("-\tfoo").unwrap();
        assert_eq!(item.content_indent, 4);
        assert_eq!(item.after_marker, "\t");
        assert_eq!(rest, "foo");
    }

    #[test]
    fn rejects_non_markers() {
        assert!(parse("-foo").is_none());
        assert!(parse("1234567890. foo").is_none());
        assert!(parse("    - foo").is_none());
        assert!(parse("a. foo").is_none());
    }

    #[test]
    fn paragraph_interruption_rules() {
        let mut cursor = LineCursor::new("2. foo");
        assert!(try_parse_list_item(&mut cursor, true).is_none());
        let mut cursor = LineCursor::new("-");
        assert!(try_parse_list_item(&mut cursor, true).is_none());
        let mut cursor = LineCursor::new("1. foo");
        assert!(try_parse_list_item(&mut cursor, true).is_some());
    }

    #[test]
    fn continuation_needs_content_indent() {
        let mut cursor = LineCursor::new("   bar");
        assert_eq!(continue_list_item(&mut cursor, 2, true), Some("  "));
        assert_eq!(cursor.rest_with_phantom(), " bar");

        let mut cursor = LineCursor::new(" bar");
        assert_eq!(continue_list_item(&mut cursor, 2, true), None);

        let mut cursor = LineCursor::new("");
        assert_eq!(continue_list_item(&mut cursor, 2, false), None);
        let mut cursor = LineCursor::new("  ");
        assert_eq!(continue_list_item(&mut cursor, 2, true), Some("  "));
    }
}
