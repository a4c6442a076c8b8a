//! Source line reader.
//!
//! Splits input into logical lines with `\n` endings, remembering what the
//! original line endings were, and provides [`LineCursor`], a column-aware
//! cursor that expands tabs to the next multiple of four while keeping the
//! original text available for lossless recording.

/// Columns per tab stop. Fixed by CommonMark.
pub const TAB_STOP: usize = 4;

/// Line ending style of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }
}

/// Input normalized to `\n` line endings.
#[derive(Debug, Clone)]
pub struct SourceText {
    pub(crate) text: String,
    /// Ending used by the first line; applied to every line on rehydration.
    pub(crate) line_ending: LineEnding,
    /// Lines (0-based) whose ending differs from `line_ending`.
    pub(crate) irregular_endings: Vec<(usize, LineEnding)>,
    pub(crate) trailing_newline: bool,
}

impl SourceText {
    pub fn new(input: &str) -> Self {
        let mut text = String::with_capacity(input.len());
        let mut endings = Vec::new();
        let mut chars = input.char_indices().peekable();
        while let Some((_, c)) = chars.next() {
            match c {
                '\r' => {
                    if matches!(chars.peek(), Some((_, '\n'))) {
                        chars.next();
                        endings.push(LineEnding::CrLf);
                    } else {
                        endings.push(LineEnding::Cr);
                    }
                    text.push('\n');
                }
                '\n' => {
                    endings.push(LineEnding::Lf);
                    text.push('\n');
                }
                _ => text.push(c),
            }
        }

        let line_ending = endings.first().copied().unwrap_or_default();
        let irregular_endings = endings
            .iter()
            .enumerate()
            .filter(|(_, ending)| **ending != line_ending)
            .map(|(index, ending)| (index, *ending))
            .collect();
        let trailing_newline = text.ends_with('\n');

        log::trace!(
            "Normalized {} bytes, {} line endings ({:?})",
            input.len(),
            endings.len(),
            line_ending
        );

        Self {
            text,
            line_ending,
            irregular_endings,
            trailing_newline,
        }
    }

    /// Logical lines without their `\n`. An input ending in a newline does
    /// not produce an extra empty line.
    pub fn lines(&self) -> Vec<&str> {
        if self.text.is_empty() {
            return Vec::new();
        }
        let body = self.text.strip_suffix('\n').unwrap_or(&self.text);
        body.split('\n').collect()
    }
}

/// Cursor over one logical line.
///
/// `column` is the visual column of the cursor. When a tab has been only
/// partly consumed, the tab byte is already behind `offset` and the
/// remaining columns of that tab are held in `phantom`: they behave like
/// spaces for indentation purposes but have no bytes of their own.
#[derive(Debug, Clone)]
pub(crate) struct LineCursor<'a> {
    text: &'a str,
    offset: usize,
    column: usize,
    phantom: usize,
    next_nonspace: usize,
    next_nonspace_column: usize,
}

impl<'a> LineCursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let mut cursor = Self {
            text,
            offset: 0,
            column: 0,
            phantom: 0,
            next_nonspace: 0,
            next_nonspace_column: 0,
        };
        cursor.find_next_nonspace();
        cursor
    }

    pub(crate) fn text(&self) -> &'a str {
        self.text
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn column(&self) -> usize {
        self.column
    }

    pub(crate) fn phantom(&self) -> usize {
        self.phantom
    }

    pub(crate) fn next_nonspace(&self) -> usize {
        self.next_nonspace
    }

    /// 1-based character column of a byte offset in this line.
    pub(crate) fn char_column(&self, offset: usize) -> usize {
        self.text[..offset].chars().count() + 1
    }

    /// Recompute the first non-space position from the cursor.
    pub(crate) fn find_next_nonspace(&mut self) {
        let mut column = self.column + self.phantom;
        let mut offset = self.offset;
        for byte in self.text[self.offset..].bytes() {
            match byte {
                b' ' => column += 1,
                b'\t' => column += TAB_STOP - column % TAB_STOP,
                _ => break,
            }
            offset += 1;
        }
        self.next_nonspace = offset;
        self.next_nonspace_column = column;
    }

    /// Columns of whitespace between the cursor and the next non-space.
    pub(crate) fn indent(&self) -> usize {
        self.next_nonspace_column - self.column
    }

    pub(crate) fn is_indented(&self) -> bool {
        self.indent() >= TAB_STOP
    }

    /// Whether the rest of the line is whitespace.
    pub(crate) fn is_blank(&self) -> bool {
        self.next_nonspace >= self.text.len()
    }

    /// Byte at the next non-space position.
    pub(crate) fn peek_nonspace(&self) -> Option<u8> {
        self.text.as_bytes().get(self.next_nonspace).copied()
    }

    pub(crate) fn at_end(&self) -> bool {
        self.phantom == 0 && self.offset >= self.text.len()
    }

    /// Whether the next column is whitespace (phantom columns count).
    pub(crate) fn peek_is_space_or_tab(&self) -> bool {
        self.phantom > 0 || matches!(self.text.as_bytes().get(self.offset), Some(b' ' | b'\t'))
    }

    /// Text from the next non-space to end of line.
    pub(crate) fn rest_from_nonspace(&self) -> &'a str {
        &self.text[self.next_nonspace..]
    }

    /// Text from the cursor to end of line, without phantom columns.
    pub(crate) fn rest(&self) -> &'a str {
        &self.text[self.offset..]
    }

    /// Text from the cursor with phantom columns materialized as spaces.
    pub(crate) fn rest_with_phantom(&self) -> String {
        let mut content = " ".repeat(self.phantom);
        content.push_str(self.rest());
        content
    }

    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[start..end]
    }

    /// Consume `count` columns of whitespace, splitting a tab if needed.
    /// Returns the raw bytes that were passed over.
    pub(crate) fn advance_columns(&mut self, mut count: usize) -> &'a str {
        let start = self.offset;
        while count > 0 {
            if self.phantom > 0 {
                let taken = self.phantom.min(count);
                self.phantom -= taken;
                self.column += taken;
                count -= taken;
                continue;
            }
            match self.text.as_bytes().get(self.offset) {
                Some(b'\t') => {
                    let width = TAB_STOP - self.column % TAB_STOP;
                    self.offset += 1;
                    if width > count {
                        self.column += count;
                        self.phantom = width - count;
                        count = 0;
                    } else {
                        self.column += width;
                        count -= width;
                    }
                }
                Some(_) => {
                    let len = self.text[self.offset..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
                    self.offset += len;
                    self.column += 1;
                    count -= 1;
                }
                None => break,
            }
        }
        self.find_next_nonspace();
        &self.text[start..self.offset]
    }

    /// Consume `len` bytes of marker text. Tabs count as a full stop.
    pub(crate) fn advance_bytes(&mut self, len: usize) -> &'a str {
        let start = self.offset;
        self.phantom = 0;
        for byte in self.text[start..start + len].bytes() {
            if byte == b'\t' {
                self.column += TAB_STOP - self.column % TAB_STOP;
            } else if byte & 0xC0 != 0x80 {
                self.column += 1;
            }
        }
        self.offset += len;
        self.find_next_nonspace();
        &self.text[start..self.offset]
    }

    /// Jump to the next non-space, dropping any phantom columns.
    pub(crate) fn advance_next_nonspace(&mut self) -> &'a str {
        let start = self.offset;
        self.offset = self.next_nonspace;
        self.column = self.next_nonspace_column;
        self.phantom = 0;
        &self.text[start..self.offset]
    }

    /// Consume the rest of the line.
    pub(crate) fn advance_to_end(&mut self) -> &'a str {
        let start = self.offset;
        self.offset = self.text.len();
        self.phantom = 0;
        self.find_next_nonspace();
        &self.text[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_crlf_and_remembers_style() {
        let source = SourceText::new("a\r\nb\r\n");
        assert_eq!(source.text, "a\nb\n");
        assert_eq!(source.line_ending, LineEnding::CrLf);
        assert!(source.irregular_endings.is_empty());
        assert!(source.trailing_newline);
        assert_eq!(source.lines(), vec!["a", "b"]);
    }

    #[test]
    fn records_mixed_endings() {
        let source = SourceText::new("a\nb\r\nc");
        assert_eq!(source.line_ending, LineEnding::Lf);
        assert_eq!(source.irregular_endings, vec![(1, LineEnding::CrLf)]);
        assert!(!source.trailing_newline);
        assert_eq!(source.lines(), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert!(SourceText::new("").lines().is_empty());
        assert_eq!(SourceText::new("\n").lines(), vec![""]);
    }

    #[test]
    fn tab_expands_to_next_stop() {
        let cursor = LineCursor::new(" \tfoo");
        assert_eq!(cursor.indent(), 4);
        assert!(cursor.is_indented());
    }

    #[test]
    fn partial_tab_leaves_phantom_columns() {
        let mut cursor = LineCursor::new(">\t\tfoo");
        cursor.advance_bytes(1);
        let raw = cursor.advance_columns(1);
        assert_eq!(raw, "\t");
        assert_eq!(cursor.phantom(), 2);
        assert_eq!(cursor.indent(), 6);

        let raw = cursor.advance_columns(4);
        assert_eq!(raw, "\t");
        assert_eq!(cursor.phantom(), 2);
        assert_eq!(cursor.rest_with_phantom(), "  foo");
    }

    #[test]
    fn advance_next_nonspace_drops_phantom() {
        let mut cursor = LineCursor::new("-\tfoo");
        cursor.advance_bytes(1);
        cursor.advance_columns(1);
        assert_eq!(cursor.phantom(), 2);
        assert_eq!(cursor.advance_next_nonspace(), "");
        assert_eq!(cursor.phantom(), 0);
        assert_eq!(cursor.rest(), "foo");
    }
}
