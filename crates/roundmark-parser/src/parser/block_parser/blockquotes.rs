//! Block quote markers.

use crate::source::LineCursor;

/// Consume a block quote marker: up to three columns of indentation, `>`,
/// and one optional following space or tab column.
///
/// Used both to open a quote and to continue one. Returns the raw text
/// consumed, or `None` (consuming nothing) when there is no marker.
pub(crate) fn try_parse_blockquote_marker<'a>(cursor: &mut LineCursor<'a>) -> Option<&'a str> {
    if cursor.is_indented() || cursor.peek_nonspace() != Some(b'>') {
        return None;
    }
    let start = cursor.offset();
    cursor.advance_next_nonspace();
    cursor.advance_bytes(1);
    if cursor.peek_is_space_or_tab() {
        cursor.advance_columns(1);
    }
    Some(cursor.slice(start, cursor.offset()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_with_space() {
        let mut cursor = LineCursor::new("  > foo");
        assert_eq!(try_parse_blockquote_marker(&mut cursor), Some("  > "));
        assert_eq!(cursor.rest(), "foo");
    }

    #[test]
    fn marker_without_space() {
        let mut cursor = LineCursor::new(">>foo");
        assert_eq!(try_parse_blockquote_marker(&mut cursor), Some(">"));
        assert_eq!(try_parse_blockquote_marker(&mut cursor), Some(">"));
        assert_eq!(cursor.rest(), "foo");
    }

    #[test]
    fn tab_after_marker_is_split() {
        let mut cursor = LineCursor::new(">\t\tfoo");
        assert_eq!(try_parse_blockquote_marker(&mut cursor), Some(">\t"));
        assert_eq!(cursor.phantom(), 2);
        assert_eq!(cursor.indent(), 6);
    }

    #[test]
    fn four_spaces_is_not_a_marker() {
        let mut cursor = LineCursor::new("    > foo");
        assert_eq!(try_parse_blockquote_marker(&mut cursor), None);
        assert_eq!(cursor.offset(), 0);
    }
}
