//! Block structure parser.
//!
//! Lines are processed one at a time: open containers are matched against
//! the line, then new block starts are tried, and the remainder goes to the
//! open leaf (or lazily continues a paragraph). Every container records the
//! raw prefix it consumed on each of its lines so the source can be
//! written back exactly.

mod blockquotes;
pub(crate) mod code_blocks;
mod container_stack;
mod headings;
mod horizontal_rules;
mod html_blocks;
mod lists;
mod paragraphs;
pub mod reference_definitions;

use blockquotes::try_parse_blockquote_marker;
use code_blocks::{FencedCodeBlock, IndentedCodeBlock, is_closing_fence, try_parse_fence_open};
use container_stack::{Container, ContainerStack};
use headings::{AtxHeading, try_parse_atx_heading, try_parse_setext_underline};
use horizontal_rules::try_parse_thematic_break;
use html_blocks::{HtmlBlock, html_block_ends, html_block_start};
use lists::{ParsedListItem, continue_list_item, try_parse_list_item};
use paragraphs::{InlineLeaf, ParagraphBuffer, ParagraphLine};
pub use reference_definitions::{ReferenceDefinition, ReferenceRegistry};

use crate::source::{LineCursor, SourceText, TAB_STOP};
use crate::tokens::{
    AtxHeadingToken, BlockQuoteToken, DocumentToken, EndKind, Indent, ListItemToken, ListToken,
    MarkdownToken, TextToken, ThematicBreakToken, TokenKind,
};

/// A `Text` token whose content still needs inline parsing, with the
/// (line, column) where each of its content lines starts.
#[derive(Debug, Clone)]
pub(crate) struct InlineBlock {
    pub token: usize,
    pub positions: Vec<(usize, usize)>,
}

/// Result of block parsing: the block-level token stream, the finished
/// reference registry, and the text spans awaiting inline parsing.
#[derive(Debug)]
pub(crate) struct BlockOutput {
    pub tokens: Vec<MarkdownToken>,
    pub registry: ReferenceRegistry,
    pub inline_blocks: Vec<InlineBlock>,
}

/// The open leaf block, if any.
#[derive(Debug)]
enum Leaf {
    Paragraph(ParagraphBuffer),
    FencedCode(FencedCodeBlock),
    IndentedCode(IndentedCodeBlock),
    Html(HtmlBlock),
}

/// Per-line matching state.
struct LineState {
    /// Number of stack entries (from the bottom) that matched this line.
    matched_depth: usize,
    /// Whether the open leaf matched this line.
    leaf_matched: bool,
    /// Whether unmatched blocks have been closed for this line.
    all_closed: bool,
}

fn maybe_special(byte: u8) -> bool {
    matches!(
        byte,
        b'#' | b'`' | b'~' | b'*' | b'+' | b'_' | b'=' | b'<' | b'>' | b'-' | b'0'..=b'9'
    )
}

pub(crate) struct BlockParser {
    tokens: Vec<MarkdownToken>,
    containers: ContainerStack,
    leaf: Option<Leaf>,
    registry: ReferenceRegistry,
    inline_blocks: Vec<InlineBlock>,
    line_number: usize,
}

impl BlockParser {
    /// Create a parser whose registry starts with `registry`'s definitions.
    pub(crate) fn new(registry: ReferenceRegistry) -> Self {
        Self {
            tokens: Vec::new(),
            containers: ContainerStack::new(),
            leaf: None,
            registry,
            inline_blocks: Vec::new(),
            line_number: 0,
        }
    }

    pub(crate) fn parse(mut self, source: &SourceText) -> BlockOutput {
        log::debug!("Starting block parse");
        self.tokens.push(MarkdownToken::new(
            TokenKind::Document(DocumentToken {
                line_ending: source.line_ending,
                irregular_endings: source.irregular_endings.clone(),
                trailing_newline: source.trailing_newline,
            }),
            1,
            1,
        ));
        self.containers.push(Container::Document, 0, 0);

        for line in source.lines() {
            self.process_line(line);
        }

        self.close_leaf();
        while self.containers.depth() > 0 {
            self.close_container();
        }
        log::debug!(
            "Block parse finished: {} tokens, {} definitions",
            self.tokens.len(),
            self.registry.len()
        );

        BlockOutput {
            tokens: self.tokens,
            registry: self.registry,
            inline_blocks: self.inline_blocks,
        }
    }

    fn process_line(&mut self, text: &str) {
        self.line_number += 1;
        let line_number = self.line_number;
        let mut cursor = LineCursor::new(text);
        log::debug!("Line {}: {:?}", line_number, text);

        // Prefixes consumed by open containers, keyed by open token index.
        let mut prefixes: Vec<(usize, Indent)> = Vec::new();

        let mut state = LineState {
            matched_depth: 1,
            leaf_matched: false,
            all_closed: false,
        };
        for depth in 1..self.containers.depth() {
            let Some(open) = self.containers.get(depth) else {
                break;
            };
            let consumed = match &open.container {
                Container::Document | Container::List { .. } => Some(""),
                Container::BlockQuote => try_parse_blockquote_marker(&mut cursor),
                Container::ListItem {
                    content_indent,
                    has_children,
                    ..
                } => continue_list_item(&mut cursor, *content_indent, *has_children),
            };
            let Some(raw) = consumed else {
                break;
            };
            if open.container.records_indents() {
                prefixes.push((open.token, Indent::new(raw)));
            }
            state.matched_depth = depth + 1;
        }
        let all_matched = state.matched_depth == self.containers.depth();

        // Continuation of the open leaf.
        let mut leaf_indent: Option<Indent> = None;
        let mut line_done = false;
        if all_matched {
            match &mut self.leaf {
                Some(Leaf::Paragraph(_)) => state.leaf_matched = !cursor.is_blank(),
                Some(Leaf::FencedCode(code)) => {
                    state.leaf_matched = true;
                    if !cursor.is_indented()
                        && is_closing_fence(
                            cursor.rest_from_nonspace(),
                            code.fence_char,
                            code.fence_len,
                        )
                    {
                        let whitespace = cursor.advance_next_nonspace();
                        let closing = cursor.advance_to_end();
                        code.close_with_fence(Indent::new(whitespace), closing);
                        line_done = true;
                    } else {
                        let start = cursor.offset();
                        let mut remaining = code.fence_offset;
                        while remaining > 0 && cursor.peek_is_space_or_tab() {
                            cursor.advance_columns(1);
                            remaining -= 1;
                        }
                        leaf_indent = Some(Indent::with_phantom(
                            cursor.slice(start, cursor.offset()),
                            cursor.phantom(),
                        ));
                    }
                }
                Some(Leaf::IndentedCode(_)) => {
                    if cursor.is_indented() {
                        let raw = cursor.advance_columns(TAB_STOP);
                        leaf_indent = Some(Indent::with_phantom(raw, cursor.phantom()));
                        state.leaf_matched = true;
                    } else if cursor.is_blank() {
                        let raw = cursor.advance_next_nonspace();
                        leaf_indent = Some(Indent::new(raw));
                        state.leaf_matched = true;
                    }
                }
                Some(Leaf::Html(html)) => {
                    if !(cursor.is_blank() && html.kind >= 6) {
                        leaf_indent = Some(Indent::with_phantom("", cursor.phantom()));
                        state.leaf_matched = true;
                    }
                }
                None => {}
            }
        }
        if line_done {
            // The closing fence ends the block.
            self.close_leaf();
        }
        state.all_closed = all_matched && (self.leaf.is_none() || state.leaf_matched);

        let code_or_html_matched =
            line_done || (state.leaf_matched && !matches!(self.leaf, Some(Leaf::Paragraph(_))));
        let mut container_is_paragraph =
            all_matched && state.leaf_matched && matches!(self.leaf, Some(Leaf::Paragraph(_)));
        let mut paragraph_ws_start = cursor.offset();
        let mut consumed = line_done;

        if !code_or_html_matched {
            loop {
                paragraph_ws_start = cursor.offset();
                let indented = cursor.is_indented();
                let peek = cursor.peek_nonspace();
                if !indented && !peek.is_some_and(maybe_special) {
                    cursor.advance_next_nonspace();
                    break;
                }
                let rest = cursor.rest_from_nonspace();
                let column = cursor.char_column(cursor.next_nonspace());

                if !indented && peek == Some(b'>') {
                    self.close_unmatched(&mut state);
                    if let Some(marker) = try_parse_blockquote_marker(&mut cursor) {
                        log::debug!("Opening block quote at {}:{}", line_number, column);
                        self.add_container(
                            Container::BlockQuote,
                            TokenKind::BlockQuote(BlockQuoteToken {
                                marker: marker.to_string(),
                                indents: Vec::new(),
                            }),
                            column,
                        );
                        container_is_paragraph = false;
                        continue;
                    }
                }

                if !indented && let Some(heading) = try_parse_atx_heading(rest) {
                    self.close_unmatched(&mut state);
                    let content_offset = cursor.next_nonspace()
                        + heading.level as usize
                        + heading.after_hashes.len();
                    let content_column = cursor.char_column(content_offset);
                    let leading = cursor.advance_next_nonspace();
                    cursor.advance_to_end();
                    self.add_atx_heading(heading, leading, column, content_column);
                    consumed = true;
                    break;
                }

                if !indented && let Some((_, fence_len)) = try_parse_fence_open(rest) {
                    self.close_unmatched(&mut state);
                    let fence_offset = cursor.indent();
                    let leading = cursor.advance_next_nonspace();
                    let fence = cursor.advance_bytes(fence_len);
                    let info = cursor.advance_to_end();
                    log::debug!("Opening fenced code at {}:{}", line_number, column);
                    self.open_leaf(Leaf::FencedCode(FencedCodeBlock::new(
                        leading,
                        fence,
                        info,
                        fence_offset,
                        line_number,
                        column,
                    )));
                    consumed = true;
                    break;
                }

                let leaf_is_paragraph = matches!(self.leaf, Some(Leaf::Paragraph(_)));
                let interrupts = container_is_paragraph || (!state.all_closed && leaf_is_paragraph);
                if !indented && let Some(kind) = html_block_start(rest, interrupts) {
                    self.close_unmatched(&mut state);
                    log::debug!("Opening HTML block (kind {}) at {}", kind, line_number);
                    self.open_leaf(Leaf::Html(HtmlBlock::new(kind, column)));
                    break;
                }

                if !indented
                    && container_is_paragraph
                    && let Some(level) = try_parse_setext_underline(rest)
                {
                    self.close_unmatched(&mut state);
                    self.take_paragraph_definitions();
                    let paragraph = match self.leaf.take() {
                        Some(Leaf::Paragraph(paragraph)) if !paragraph.is_empty() => Some(paragraph),
                        other => {
                            self.leaf = other;
                            None
                        }
                    };
                    if let Some(paragraph) = paragraph {
                        let whitespace = cursor.advance_next_nonspace();
                        let underline = cursor.advance_to_end();
                        if let Some(leaf) = paragraph.into_setext(level, whitespace, underline) {
                            self.push_inline_leaf(leaf);
                        }
                        consumed = true;
                        break;
                    }
                }

                if !indented && let Some(marker) = try_parse_thematic_break(rest) {
                    self.close_unmatched(&mut state);
                    let leading = cursor.advance_next_nonspace();
                    let raw = cursor.advance_to_end();
                    self.prepare_child();
                    self.tokens.push(MarkdownToken::new(
                        TokenKind::ThematicBreak(ThematicBreakToken {
                            leading_whitespace: leading.to_string(),
                            marker,
                            raw: raw.to_string(),
                        }),
                        line_number,
                        column,
                    ));
                    consumed = true;
                    break;
                }

                if let Some(item) = try_parse_list_item(&mut cursor, container_is_paragraph) {
                    self.close_unmatched(&mut state);
                    log::debug!("Opening list item at {}:{}", line_number, column);
                    self.add_list_item(item, column);
                    container_is_paragraph = false;
                    continue;
                }

                if indented && !leaf_is_paragraph && !cursor.is_blank() {
                    let raw = cursor.advance_columns(TAB_STOP);
                    leaf_indent = Some(Indent::with_phantom(raw, cursor.phantom()));
                    self.close_unmatched(&mut state);
                    self.open_leaf(Leaf::IndentedCode(IndentedCodeBlock::new(column)));
                    break;
                }

                cursor.advance_next_nonspace();
                break;
            }
        }

        let blank = cursor.is_blank();
        if !consumed {
            if !state.all_closed && !blank && matches!(self.leaf, Some(Leaf::Paragraph(_))) {
                log::debug!("Lazy continuation at line {}", line_number);
                if let Some(Leaf::Paragraph(paragraph)) = &mut self.leaf {
                    paragraph.push(paragraph_line(&cursor, paragraph_ws_start, line_number));
                }
            } else {
                self.close_unmatched(&mut state);
                self.add_line_to_leaf(&cursor, paragraph_ws_start, leaf_indent, blank);
            }
        }

        self.update_blank_state(blank && !consumed);
        self.record_prefixes(&prefixes);
    }

    /// Hand the rest of the line to the open leaf, open a paragraph, or
    /// record a blank line.
    fn add_line_to_leaf(
        &mut self,
        cursor: &LineCursor<'_>,
        paragraph_ws_start: usize,
        leaf_indent: Option<Indent>,
        blank: bool,
    ) {
        let line_number = self.line_number;
        let mut html_ended = false;
        match &mut self.leaf {
            Some(Leaf::Paragraph(paragraph)) => {
                paragraph.push(paragraph_line(cursor, paragraph_ws_start, line_number));
            }
            Some(Leaf::FencedCode(code)) => {
                code.add_line(
                    leaf_indent.unwrap_or_default(),
                    cursor.rest_with_phantom(),
                    line_number,
                );
            }
            Some(Leaf::IndentedCode(code)) => {
                code.add_line(
                    leaf_indent.unwrap_or_default(),
                    cursor.rest_with_phantom(),
                    line_number,
                );
            }
            Some(Leaf::Html(html)) => {
                let indent =
                    leaf_indent.unwrap_or_else(|| Indent::with_phantom("", cursor.phantom()));
                html.add_line(indent, cursor.rest_with_phantom(), line_number);
                html_ended = html.kind <= 5 && html_block_ends(html.kind, cursor.rest());
            }
            None if !blank => {
                let mut paragraph = ParagraphBuffer::new();
                paragraph.push(paragraph_line(cursor, paragraph_ws_start, line_number));
                self.open_leaf(Leaf::Paragraph(paragraph));
            }
            None => {
                let whitespace = cursor.slice(paragraph_ws_start, cursor.text().len());
                self.tokens.push(MarkdownToken::new(
                    TokenKind::BlankLine {
                        whitespace: whitespace.to_string(),
                    },
                    line_number,
                    1,
                ));
            }
        }
        if html_ended {
            self.close_leaf();
        }
    }

    /// Track blank lines for list looseness. A blank line does not count
    /// when it sits in a fenced code block, directly in a block quote, or
    /// right after an empty list item marker.
    fn update_blank_state(&mut self, blank: bool) {
        let counts = blank
            && match &self.leaf {
                Some(Leaf::FencedCode(_)) => false,
                Some(_) => true,
                None => match self.containers.last() {
                    Some(open) => match &open.container {
                        Container::BlockQuote => false,
                        Container::ListItem { has_children, .. } => {
                            *has_children || open.line != self.line_number
                        }
                        _ => true,
                    },
                    None => true,
                },
            };
        for open in self.containers.iter_mut() {
            open.container.set_pending_blank(counts);
        }
    }

    /// Append this line's prefix to every container that was open before
    /// this line.
    fn record_prefixes(&mut self, prefixes: &[(usize, Indent)]) {
        let line_number = self.line_number;
        for open in &self.containers.stack {
            if !open.container.records_indents() || open.line >= line_number {
                continue;
            }
            let indent = prefixes
                .iter()
                .find(|(token, _)| *token == open.token)
                .map(|(_, indent)| indent.clone())
                .unwrap_or_default();
            if let Some(indents) = container_indents(&mut self.tokens[open.token]) {
                indents.push(indent);
            }
        }
    }

    /// Close the unmatched leaf and containers, once per line.
    fn close_unmatched(&mut self, state: &mut LineState) {
        if state.all_closed {
            return;
        }
        if !state.leaf_matched {
            self.close_leaf();
        }
        while self.containers.depth() > state.matched_depth {
            self.close_container();
        }
        state.all_closed = true;
    }

    fn close_container(&mut self) {
        let Some(open) = self.containers.pop() else {
            return;
        };
        let (line, column) = {
            let token = &self.tokens[open.token];
            (token.line, token.column)
        };
        let end = match open.container {
            Container::Document => EndKind::Document,
            Container::BlockQuote => EndKind::BlockQuote,
            Container::List { loose, .. } => {
                if let TokenKind::List(list) = &mut self.tokens[open.token].kind {
                    list.loose = loose;
                }
                EndKind::List
            }
            Container::ListItem { .. } => EndKind::ListItem,
        };
        log::debug!("Closing {} opened at {}:{}", end.name(), line, column);
        self.tokens
            .push(MarkdownToken::new(TokenKind::End(end), line, column));
    }

    fn take_paragraph_definitions(&mut self) {
        if let Some(Leaf::Paragraph(paragraph)) = &mut self.leaf {
            let definitions = paragraph.take_definitions(&mut self.registry);
            self.tokens.extend(definitions);
        }
    }

    /// Flush the open leaf into tokens.
    fn close_leaf(&mut self) {
        let Some(leaf) = self.leaf.take() else {
            return;
        };
        match leaf {
            Leaf::Paragraph(mut paragraph) => {
                let definitions = paragraph.take_definitions(&mut self.registry);
                self.tokens.extend(definitions);
                if let Some(leaf) = paragraph.into_paragraph() {
                    self.push_inline_leaf(leaf);
                }
            }
            Leaf::FencedCode(code) => self.tokens.extend(code.into_tokens()),
            Leaf::IndentedCode(code) => self.tokens.extend(code.into_tokens()),
            Leaf::Html(html) => self.tokens.extend(html.into_tokens()),
        }
    }

    fn push_inline_leaf(&mut self, leaf: InlineLeaf) {
        let base = self.tokens.len();
        if let Some(index) = leaf.text_index {
            self.inline_blocks.push(InlineBlock {
                token: base + index,
                positions: leaf.positions,
            });
        }
        self.tokens.extend(leaf.tokens);
    }

    /// Close the leaf and any lists that cannot hold the new child, then
    /// register the child with its parent.
    fn prepare_child(&mut self) {
        self.close_leaf();
        while self.containers.last_is_list() {
            self.close_container();
        }
        self.note_child();
    }

    /// Record that the innermost container gained a child. A list item
    /// that already had content and saw a blank line makes its list loose.
    fn note_child(&mut self) {
        let depth = self.containers.depth();
        let mut loose = false;
        if let Some(open) = self.containers.last_mut()
            && let Container::ListItem {
                has_children,
                pending_blank,
                ..
            } = &mut open.container
        {
            loose = *has_children && *pending_blank;
            *has_children = true;
        }
        if loose && depth >= 2 {
            self.mark_loose(depth - 2);
        }
    }

    fn mark_loose(&mut self, depth: usize) {
        if let Some(open) = self.containers.get_mut(depth)
            && let Container::List { loose, .. } = &mut open.container
        {
            *loose = true;
        }
    }

    fn open_leaf(&mut self, leaf: Leaf) {
        self.prepare_child();
        self.leaf = Some(leaf);
    }

    fn add_container(&mut self, container: Container, kind: TokenKind, column: usize) {
        self.prepare_child();
        let token = self.tokens.len();
        self.tokens
            .push(MarkdownToken::new(kind, self.line_number, column));
        self.containers.push(container, token, self.line_number);
    }

    fn add_list_item(&mut self, item: ParsedListItem<'_>, column: usize) {
        self.close_leaf();
        let ordered = item.marker.is_ordered();
        let delimiter = item.marker.delimiter();

        let continues = matches!(
            self.containers.last().map(|open| &open.container),
            Some(Container::List { ordered: o, delimiter: d, .. })
                if item.marker.continues_list(*o, *d)
        );
        if continues {
            let depth = self.containers.depth();
            let pending = matches!(
                self.containers.last().map(|open| &open.container),
                Some(Container::List {
                    pending_blank: true,
                    ..
                })
            );
            if pending {
                self.mark_loose(depth - 1);
            }
        } else {
            if self.containers.last_is_list() {
                self.close_container();
            }
            self.note_child();
            let token = self.tokens.len();
            self.tokens.push(MarkdownToken::new(
                TokenKind::List(ListToken {
                    ordered,
                    delimiter,
                    start: item.marker.start(),
                    loose: false,
                }),
                self.line_number,
                column,
            ));
            self.containers.push(
                Container::List {
                    ordered,
                    delimiter,
                    loose: false,
                    pending_blank: false,
                },
                token,
                self.line_number,
            );
        }

        let token = self.tokens.len();
        self.tokens.push(MarkdownToken::new(
            TokenKind::ListItem(ListItemToken {
                leading_whitespace: item.leading_whitespace.to_string(),
                marker: item.marker_text.to_string(),
                after_marker: item.after_marker.to_string(),
                content_indent: item.content_indent,
                task: None,
                indents: Vec::new(),
            }),
            self.line_number,
            column,
        ));
        self.containers.push(
            Container::ListItem {
                content_indent: item.content_indent,
                has_children: false,
                pending_blank: false,
            },
            token,
            self.line_number,
        );
    }

    fn add_atx_heading(
        &mut self,
        heading: AtxHeading<'_>,
        leading: &str,
        column: usize,
        content_column: usize,
    ) {
        self.prepare_child();
        let line = self.line_number;
        let mut tokens = vec![MarkdownToken::new(
            TokenKind::AtxHeading(AtxHeadingToken {
                level: heading.level,
                leading_whitespace: leading.to_string(),
                after_hashes: heading.after_hashes.to_string(),
            }),
            line,
            column,
        )];
        let text_index = if heading.content.is_empty() {
            None
        } else {
            tokens.push(MarkdownToken::new(
                TokenKind::Text(TextToken {
                    raw: heading.content.to_string(),
                    text: heading.content.to_string(),
                }),
                line,
                content_column,
            ));
            Some(1)
        };
        tokens.push(MarkdownToken::new(
            TokenKind::End(EndKind::AtxHeading {
                closing: heading.closing.to_string(),
            }),
            line,
            column,
        ));
        self.push_inline_leaf(InlineLeaf {
            tokens,
            text_index,
            positions: vec![(line, content_column)],
        });
    }
}

fn paragraph_line(cursor: &LineCursor<'_>, whitespace_start: usize, line: usize) -> ParagraphLine {
    ParagraphLine {
        whitespace: cursor.slice(whitespace_start, cursor.offset()).to_string(),
        content: cursor.rest().to_string(),
        line,
        column: cursor.char_column(cursor.offset()),
    }
}

/// Per-line prefix list of a container open token.
fn container_indents(token: &mut MarkdownToken) -> Option<&mut Vec<Indent>> {
    match &mut token.kind {
        TokenKind::BlockQuote(quote) => Some(&mut quote.indents),
        TokenKind::ListItem(item) => Some(&mut item.indents),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    mod blockquotes;
    mod code_blocks;
    mod helpers;
    mod lists;
    mod losslessness;
}
