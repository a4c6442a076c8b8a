//! Inline parser.
//!
//! Runs over the `Text` tokens the block parser left for inline parsing
//! and replaces each with the inline token sequence for its content. One
//! pass scans the text left to right into a list of items, keeping a
//! delimiter stack for emphasis and a bracket stack for links and images;
//! a second pass (the emitter) turns the items into tokens.

mod autolinks;
mod code_spans;
mod emitter;
mod emphasis;
pub(crate) mod links;
pub(crate) mod raw_html;
#[cfg(test)]
mod tests;

use autolinks::try_parse_autolink;
use code_spans::{normalize_code_content, try_parse_code_span};
use emitter::Emitter;
use emphasis::{Delimiter, analyze_delimiter_run, process_emphasis};
use links::{MAX_LABEL_CHARS, scan_link_label, try_parse_inline_link};
use raw_html::scan_raw_html;

use crate::options::ParserOptions;
use crate::parser::block_parser::{BlockOutput, ReferenceRegistry};
use crate::tokens::{
    AutolinkKind, AutolinkToken, CodeSpanToken, ImageToken, LabelType, LinkProperties, LinkToken,
    MarkdownToken, TokenKind, TokenStream,
};
use crate::utils::{decode_entity, is_ascii_punctuation};

/// One scanned piece of inline content.
#[derive(Debug, Clone)]
pub(super) enum Item {
    Text {
        raw: String,
        text: String,
    },
    /// A finished leaf token (code span, raw HTML, autolink, image, break).
    Leaf(TokenKind),
    /// A delimiter run. Matched emphasis is attached as `(id, count)`
    /// pairs: closes use the start of the run, opens its end, and whatever
    /// is left in between is literal.
    Delim {
        char: char,
        count: usize,
        opens: Vec<(usize, usize)>,
        closes: Vec<(usize, usize)>,
    },
    /// An unresolved `[` or `![`.
    Bracket {
        image: bool,
    },
    LinkOpen {
        id: usize,
        link: LinkToken,
    },
    LinkClose {
        id: usize,
    },
}

#[derive(Debug, Clone)]
pub(super) struct Entry {
    /// Byte offset of the item in the block's text.
    pub start: usize,
    pub item: Item,
}

/// An entry in the bracket stack.
#[derive(Debug, Clone)]
struct Bracket {
    item: usize,
    image: bool,
    /// Delimiter stack height when the bracket was pushed.
    delimiter_bottom: usize,
    /// Cleared once an enclosing link resolves; links do not nest.
    active: bool,
    /// Another bracket was pushed after this one.
    bracket_after: bool,
}

/// Inline tokens for one block, plus the task marker state when the block
/// starts with one.
#[derive(Debug, Clone)]
pub(crate) struct InlineResult {
    pub tokens: Vec<MarkdownToken>,
    pub task: Option<bool>,
}

fn task_marker(text: &str) -> Option<bool> {
    let checked = match text.get(..3)? {
        "[ ]" => false,
        "[x]" | "[X]" => true,
        _ => return None,
    };
    matches!(text.as_bytes().get(3), Some(b' ' | b'\t')).then_some(checked)
}

struct InlineScanner<'a> {
    text: &'a str,
    registry: &'a ReferenceRegistry,
    options: ParserOptions,
    items: Vec<Entry>,
    delimiters: Vec<Delimiter>,
    brackets: Vec<Bracket>,
    next_id: usize,
}

impl<'a> InlineScanner<'a> {
    fn new(text: &'a str, registry: &'a ReferenceRegistry, options: ParserOptions) -> Self {
        Self {
            text,
            registry,
            options,
            items: Vec::new(),
            delimiters: Vec::new(),
            brackets: Vec::new(),
            next_id: 0,
        }
    }

    fn push(&mut self, start: usize, item: Item) -> usize {
        self.items.push(Entry { start, item });
        self.items.len() - 1
    }

    fn push_text(&mut self, start: usize, raw: &str, text: &str) {
        self.push(
            start,
            Item::Text {
                raw: raw.to_string(),
                text: text.to_string(),
            },
        );
    }

    fn literal(&mut self, start: usize, end: usize) -> usize {
        let raw = &self.text[start..end];
        self.push_text(start, raw, raw);
        end
    }

    fn scan(&mut self, mut pos: usize) {
        let bytes = self.text.as_bytes();
        while pos < bytes.len() {
            pos = match bytes[pos] {
                b'\n' => self.literal(pos, pos + 1),
                b' ' => self.parse_spaces(pos),
                b'\\' => self.parse_backslash(pos),
                b'`' => self.parse_backticks(pos),
                b'*' | b'_' => self.parse_delimiter_run(pos),
                b'~' if self.options.strikethrough => self.parse_delimiter_run(pos),
                b'[' => self.push_bracket(pos, false),
                b'!' if bytes.get(pos + 1) == Some(&b'[') => self.push_bracket(pos, true),
                b']' => self.close_bracket(pos),
                b'<' => self.parse_angle(pos),
                b'&' => self.parse_entity(pos),
                _ => self.parse_plain(pos),
            };
        }
        self.apply_matches(0);
    }

    fn parse_plain(&mut self, pos: usize) -> usize {
        let first = self.text[pos..].chars().next().map_or(1, char::len_utf8);
        let end = self.text[pos + first..]
            .find(['\n', ' ', '\\', '`', '*', '_', '~', '[', ']', '!', '<', '&'])
            .map_or(self.text.len(), |offset| pos + first + offset);
        self.literal(pos, end)
    }

    /// Spaces before a line ending: two or more make a hard break, one is
    /// dropped from the text.
    fn parse_spaces(&mut self, pos: usize) -> usize {
        let count = self.text.as_bytes()[pos..]
            .iter()
            .take_while(|&&b| b == b' ')
            .count();
        let end = pos + count;
        if self.text.as_bytes().get(end) != Some(&b'\n') {
            return self.literal(pos, end);
        }
        let raw = &self.text[pos..=end];
        if count >= 2 {
            self.push(
                pos,
                Item::Leaf(TokenKind::HardBreak {
                    raw: raw.to_string(),
                }),
            );
        } else {
            self.push_text(pos, raw, "\n");
        }
        end + 1
    }

    fn parse_backslash(&mut self, pos: usize) -> usize {
        match self.text.as_bytes().get(pos + 1) {
            Some(b'\n') => {
                self.push(
                    pos,
                    Item::Leaf(TokenKind::HardBreak {
                        raw: "\\\n".to_string(),
                    }),
                );
                pos + 2
            }
            Some(&next) if is_ascii_punctuation(next) => {
                let raw = &self.text[pos..pos + 2];
                self.push_text(pos, raw, &raw[1..]);
                pos + 2
            }
            _ => self.literal(pos, pos + 1),
        }
    }

    fn parse_backticks(&mut self, pos: usize) -> usize {
        if let Some((len, raw, backticks)) = try_parse_code_span(&self.text[pos..]) {
            self.push(
                pos,
                Item::Leaf(TokenKind::CodeSpan(CodeSpanToken {
                    backticks,
                    raw: raw.to_string(),
                    content: normalize_code_content(raw),
                })),
            );
            return pos + len;
        }
        let run = self.text.as_bytes()[pos..]
            .iter()
            .take_while(|&&b| b == b'`')
            .count();
        self.literal(pos, pos + run)
    }

    fn parse_delimiter_run(&mut self, pos: usize) -> usize {
        let byte = self.text.as_bytes()[pos];
        let count = self.text.as_bytes()[pos..]
            .iter()
            .take_while(|&&b| b == byte)
            .count();
        let end = pos + count;
        let char = byte as char;
        if char == '~' && count > 2 {
            return self.literal(pos, end);
        }

        let before = self.text[..pos].chars().next_back();
        let after = self.text[end..].chars().next();
        let (can_open, can_close) = analyze_delimiter_run(before, after, char);
        let item = self.push(
            pos,
            Item::Delim {
                char,
                count,
                opens: Vec::new(),
                closes: Vec::new(),
            },
        );
        if can_open || can_close {
            self.delimiters
                .push(Delimiter::new(item, char, count, can_open, can_close));
        }
        end
    }

    fn push_bracket(&mut self, pos: usize, image: bool) -> usize {
        if let Some(last) = self.brackets.last_mut() {
            last.bracket_after = true;
        }
        let item = self.push(pos, Item::Bracket { image });
        self.brackets.push(Bracket {
            item,
            image,
            delimiter_bottom: self.delimiters.len(),
            active: true,
            bracket_after: false,
        });
        pos + if image { 2 } else { 1 }
    }

    fn parse_angle(&mut self, pos: usize) -> usize {
        let rest = &self.text[pos..];
        if let Some(autolink) = try_parse_autolink(rest) {
            let href = match autolink.kind {
                AutolinkKind::Email => format!("mailto:{}", autolink.raw),
                _ => autolink.raw.to_string(),
            };
            self.push(
                pos,
                Item::Leaf(TokenKind::Autolink(AutolinkToken {
                    kind: autolink.kind,
                    raw: autolink.raw.to_string(),
                    href,
                })),
            );
            return pos + autolink.len;
        }
        if let Some(len) = scan_raw_html(rest) {
            self.push(
                pos,
                Item::Leaf(TokenKind::RawHtml {
                    raw: rest[..len].to_string(),
                }),
            );
            return pos + len;
        }
        self.literal(pos, pos + 1)
    }

    fn parse_entity(&mut self, pos: usize) -> usize {
        match decode_entity(&self.text[pos..]) {
            Some((decoded, len)) => {
                let raw = &self.text[pos..pos + len];
                self.push_text(pos, raw, &decoded);
                pos + len
            }
            None => self.literal(pos, pos + 1),
        }
    }

    /// Resolve the reference forms after a `]` at `close`.
    fn resolve_reference(&self, bracket: &Bracket, close: usize) -> Option<(usize, LinkProperties)> {
        let after = close + 1;
        let opener_start = self.items[bracket.item].start;
        let text_start = opener_start + if bracket.image { 2 } else { 1 };

        let label_end = scan_link_label(self.text, after);
        let (label_type, label, end) = match label_end {
            Some(end) if end - after > 2 => {
                (LabelType::Full, &self.text[after + 1..end - 1], end)
            }
            Some(end) if !bracket.bracket_after => {
                (LabelType::Collapsed, &self.text[text_start..close], end)
            }
            None if !bracket.bracket_after => {
                (LabelType::Shortcut, &self.text[text_start..close], after)
            }
            _ => return None,
        };
        if label.chars().count() > MAX_LABEL_CHARS {
            return None;
        }
        let definition = self.registry.get(label)?;
        let reference_label = (label_type == LabelType::Full).then(|| label.to_string());
        Some((
            end,
            LinkProperties::reference(
                label_type,
                definition.destination.clone(),
                definition.title.clone(),
                reference_label,
            ),
        ))
    }

    fn close_bracket(&mut self, pos: usize) -> usize {
        let Some(bracket) = self.brackets.last().cloned() else {
            return self.literal(pos, pos + 1);
        };
        if !bracket.active {
            self.brackets.pop();
            return self.literal(pos, pos + 1);
        }

        let resolved = try_parse_inline_link(self.text, pos + 1)
            .or_else(|| self.resolve_reference(&bracket, pos));
        let Some((end, properties)) = resolved else {
            log::trace!("Bracket at {} does not resolve", self.items[bracket.item].start);
            self.brackets.pop();
            return self.literal(pos, pos + 1);
        };
        self.brackets.pop();

        let opener_start = self.items[bracket.item].start;
        let text_start = opener_start + if bracket.image { 2 } else { 1 };
        let text_from_blocks = self.text[text_start..pos].to_string();
        self.apply_matches(bracket.delimiter_bottom);

        if bracket.image {
            let alt = plain_text(&self.items[bracket.item + 1..]);
            self.items.truncate(bracket.item + 1);
            self.items[bracket.item].item = Item::Leaf(TokenKind::Image(ImageToken {
                properties,
                text_from_blocks,
                alt,
            }));
        } else {
            let id = self.take_id();
            self.items[bracket.item].item = Item::LinkOpen {
                id,
                link: LinkToken {
                    properties,
                    text_from_blocks,
                },
            };
            self.push(pos, Item::LinkClose { id });
            for earlier in &mut self.brackets {
                if !earlier.image {
                    earlier.active = false;
                }
            }
        }
        end
    }

    fn take_id(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }

    /// Run emphasis matching above `bottom` and attach the results to the
    /// delimiter items.
    fn apply_matches(&mut self, bottom: usize) {
        for found in process_emphasis(&mut self.delimiters, bottom) {
            let id = self.take_id();
            if let Item::Delim { count, closes, .. } = &mut self.items[found.closer].item {
                *count -= found.count;
                closes.push((id, found.count));
            }
            if let Item::Delim { count, opens, .. } = &mut self.items[found.opener].item {
                *count -= found.count;
                opens.insert(0, (id, found.count));
            }
        }
    }
}

/// Flatten items into the plain text used for image descriptions.
fn plain_text(items: &[Entry]) -> String {
    let mut out = String::new();
    for entry in items {
        match &entry.item {
            Item::Text { text, .. } => out.push_str(text),
            Item::Delim { char, count, .. } => {
                out.extend(std::iter::repeat_n(*char, *count));
            }
            Item::Bracket { image: true } => out.push_str("!["),
            Item::Bracket { image: false } => out.push('['),
            Item::Leaf(kind) => match kind {
                TokenKind::CodeSpan(span) => out.push_str(&span.content),
                TokenKind::RawHtml { raw } => out.push_str(raw),
                TokenKind::Autolink(autolink) => out.push_str(&autolink.raw),
                TokenKind::Image(image) => out.push_str(&image.alt),
                TokenKind::HardBreak { .. } => out.push('\n'),
                TokenKind::TaskListMarker { raw, .. } => out.push_str(raw),
                _ => {}
            },
            Item::LinkOpen { .. } | Item::LinkClose { .. } => {}
        }
    }
    out
}

/// Parse the inline content `text` of one block.
///
/// `positions` holds the (line, column) of the start of each line of
/// `text`. With `allow_task`, a leading `[ ]`/`[x]` becomes a task list
/// marker.
pub(crate) fn parse_inline_text(
    text: &str,
    positions: &[(usize, usize)],
    registry: &ReferenceRegistry,
    options: ParserOptions,
    allow_task: bool,
) -> InlineResult {
    let mut scanner = InlineScanner::new(text, registry, options);
    let mut start = 0;
    let mut task = None;
    if allow_task
        && options.task_list_items
        && let Some(checked) = task_marker(text)
    {
        scanner.push(
            0,
            Item::Leaf(TokenKind::TaskListMarker {
                checked,
                raw: text[..3].to_string(),
            }),
        );
        task = Some(checked);
        start = 3;
    }
    scanner.scan(start);

    let tokens = Emitter::new(text, positions, options).emit(scanner.items);
    InlineResult { tokens, task }
}

/// Replaces the block parser's pending `Text` tokens with inline tokens.
pub(crate) struct InlineParser {
    output: BlockOutput,
    options: ParserOptions,
}

impl InlineParser {
    pub(crate) fn new(output: BlockOutput, options: ParserOptions) -> Self {
        Self { output, options }
    }

    pub(crate) fn parse(self) -> (TokenStream, ReferenceRegistry) {
        let BlockOutput {
            tokens,
            registry,
            inline_blocks,
        } = self.output;
        log::debug!("Inline parsing {} blocks", inline_blocks.len());

        let mut blocks = inline_blocks.into_iter().peekable();
        let mut out = Vec::with_capacity(tokens.len());
        for (index, token) in tokens.into_iter().enumerate() {
            let Some(block) = blocks.next_if(|block| block.token == index) else {
                out.push(token);
                continue;
            };
            let TokenKind::Text(text) = &token.kind else {
                out.push(token);
                continue;
            };

            let len = out.len();
            let allow_task = len >= 2
                && matches!(out[len - 1].kind, TokenKind::Paragraph(_))
                && matches!(out[len - 2].kind, TokenKind::ListItem(_));
            let result = parse_inline_text(
                &text.raw,
                &block.positions,
                &registry,
                self.options,
                allow_task,
            );
            if let Some(checked) = result.task
                && let TokenKind::ListItem(item) = &mut out[len - 2].kind
            {
                item.task = Some(checked);
            }
            out.extend(result.tokens);
        }
        (out, registry)
    }
}
