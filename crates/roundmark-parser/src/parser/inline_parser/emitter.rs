//! Turns scanned inline items into positioned tokens.
//!
//! Adjacent text merges into one `Text` token. Plain text outside links is
//! also where GFM extended autolinks are found.

use std::collections::HashMap;

use super::autolinks::find_extended_autolinks;
use super::{Entry, Item};
use crate::options::ParserOptions;
use crate::tokens::{
    AutolinkKind, AutolinkToken, EndKind, MarkdownToken, TextToken, TokenKind,
};

/// Maps byte offsets in a block's text back to source positions.
struct PositionMap<'a> {
    line_starts: Vec<usize>,
    positions: &'a [(usize, usize)],
}

impl<'a> PositionMap<'a> {
    fn new(text: &str, positions: &'a [(usize, usize)]) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(idx, _)| idx + 1));
        Self {
            line_starts,
            positions,
        }
    }

    fn locate(&self, text: &str, offset: usize) -> (usize, usize) {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let Some(&(line_number, column)) = self
            .positions
            .get(line)
            .or_else(|| self.positions.last())
        else {
            return (1, 1);
        };
        let start = self.line_starts[line].min(offset);
        (line_number, column + text[start..offset].chars().count())
    }
}

pub(super) struct Emitter<'a> {
    text: &'a str,
    map: PositionMap<'a>,
    extended_autolinks: bool,
    tokens: Vec<MarkdownToken>,
    /// Text collected for the next `Text` token: (start, raw, text).
    pending_text: Option<(usize, String, String)>,
    /// Unescaped text not yet searched for extended autolinks.
    pending_plain: Option<(usize, String)>,
    link_depth: usize,
    /// Positions of emitted open tokens, by match id.
    open_positions: HashMap<usize, (usize, usize)>,
}

impl<'a> Emitter<'a> {
    pub(super) fn new(
        text: &'a str,
        positions: &'a [(usize, usize)],
        options: ParserOptions,
    ) -> Self {
        Self {
            text,
            map: PositionMap::new(text, positions),
            extended_autolinks: options.extended_autolinks,
            tokens: Vec::new(),
            pending_text: None,
            pending_plain: None,
            link_depth: 0,
            open_positions: HashMap::new(),
        }
    }

    pub(super) fn emit(mut self, items: Vec<Entry>) -> Vec<MarkdownToken> {
        for Entry { start, item } in items {
            match item {
                Item::Text { raw, text } => self.add_text(start, &raw, &text),
                Item::Bracket { image } => {
                    let raw = if image { "![" } else { "[" };
                    self.add_text(start, raw, raw);
                }
                Item::Delim {
                    char,
                    count,
                    opens,
                    closes,
                } => self.emit_delimiter(start, char, count, &opens, &closes),
                Item::LinkOpen { id, link } => {
                    self.push_open(id, start, TokenKind::Link(link));
                    self.link_depth += 1;
                }
                Item::LinkClose { id } => {
                    self.push_close(id, start, EndKind::Link);
                    self.link_depth = self.link_depth.saturating_sub(1);
                }
                Item::Leaf(kind) => {
                    self.flush();
                    self.push(start, kind);
                }
            }
        }
        self.flush();
        self.tokens
    }

    fn emit_delimiter(
        &mut self,
        start: usize,
        char: char,
        count: usize,
        opens: &[(usize, usize)],
        closes: &[(usize, usize)],
    ) {
        let mut offset = start;
        for &(id, used) in closes {
            let end = if char == '~' {
                EndKind::Strikethrough { count: used }
            } else {
                EndKind::Emphasis {
                    marker: char,
                    count: used,
                }
            };
            self.push_close(id, offset, end);
            offset += used;
        }
        if count > 0 {
            let literal = char.to_string().repeat(count);
            self.add_text(offset, &literal, &literal);
            offset += count;
        }
        for &(id, used) in opens {
            let open = if char == '~' {
                TokenKind::Strikethrough { count: used }
            } else {
                TokenKind::Emphasis {
                    marker: char,
                    count: used,
                }
            };
            self.push_open(id, offset, open);
            offset += used;
        }
    }

    fn push(&mut self, offset: usize, kind: TokenKind) {
        let (line, column) = self.map.locate(self.text, offset);
        self.tokens.push(MarkdownToken::new(kind, line, column));
    }

    fn push_open(&mut self, id: usize, offset: usize, kind: TokenKind) {
        self.flush();
        let position = self.map.locate(self.text, offset);
        self.open_positions.insert(id, position);
        self.tokens
            .push(MarkdownToken::new(kind, position.0, position.1));
    }

    fn push_close(&mut self, id: usize, offset: usize, end: EndKind) {
        self.flush();
        let (line, column) = self
            .open_positions
            .remove(&id)
            .unwrap_or_else(|| self.map.locate(self.text, offset));
        self.tokens
            .push(MarkdownToken::new(TokenKind::End(end), line, column));
    }

    fn add_text(&mut self, start: usize, raw: &str, text: &str) {
        if self.extended_autolinks && self.link_depth == 0 && raw == text {
            let (_, plain) = self
                .pending_plain
                .get_or_insert_with(|| (start, String::new()));
            plain.push_str(raw);
            return;
        }
        self.flush_plain();
        self.append_text(start, raw, text);
    }

    fn append_text(&mut self, start: usize, raw: &str, text: &str) {
        let (_, pending_raw, pending_text) = self
            .pending_text
            .get_or_insert_with(|| (start, String::new(), String::new()));
        pending_raw.push_str(raw);
        pending_text.push_str(text);
    }

    fn flush_plain(&mut self) {
        let Some((start, plain)) = self.pending_plain.take() else {
            return;
        };
        let mut last = 0;
        for link in find_extended_autolinks(&plain) {
            let before = &plain[last..link.start];
            if !before.is_empty() {
                self.append_text(start + last, before, before);
            }
            self.flush_text();
            let raw = &plain[link.start..link.end];
            log::trace!("Extended autolink {:?}", raw);
            self.push(
                start + link.start,
                TokenKind::Autolink(AutolinkToken {
                    kind: AutolinkKind::Extended,
                    raw: raw.to_string(),
                    href: link.href,
                }),
            );
            last = link.end;
        }
        let rest = &plain[last..];
        if !rest.is_empty() {
            self.append_text(start + last, rest, rest);
        }
    }

    fn flush_text(&mut self) {
        if let Some((start, raw, text)) = self.pending_text.take()
            && !raw.is_empty()
        {
            self.push(start, TokenKind::Text(TextToken { raw, text }));
        }
    }

    fn flush(&mut self) {
        self.flush_plain();
        self.flush_text();
    }
}
