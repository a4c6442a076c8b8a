//! Fenced and indented code blocks.
//!
//! Both are buffered while open and turned into tokens when they close:
//! an open token carrying the per-line prefixes, one `Text` token with the
//! content lines, and the close token.

use crate::tokens::{
    EndKind, FencedCodeToken, Indent, IndentedCodeToken, MarkdownToken, TextToken, TokenKind,
};
use crate::utils::{split_leading_whitespace, split_trailing_whitespace, unescape};

/// Try to parse an opening code fence: 3+ backticks or tildes. A backtick
/// fence's info string may not contain backticks.
pub(crate) fn try_parse_fence_open(line: &str) -> Option<(u8, usize)> {
    let fence_char = *line.as_bytes().first()?;
    if fence_char != b'`' && fence_char != b'~' {
        return None;
    }
    let fence_len = line.bytes().take_while(|&b| b == fence_char).count();
    if fence_len < 3 {
        return None;
    }
    if fence_char == b'`' && line[fence_len..].contains('`') {
        return None;
    }
    Some((fence_char, fence_len))
}

/// Whether `line` (indentation removed) closes a fence opened with
/// `fence_len` copies of `fence_char`.
pub(crate) fn is_closing_fence(line: &str, fence_char: u8, fence_len: usize) -> bool {
    let run = line.bytes().take_while(|&b| b == fence_char).count();
    run >= fence_len && line[run..].trim_matches([' ', '\t']).is_empty()
}

/// One buffered content line of a code or HTML block.
#[derive(Debug, Clone)]
pub(crate) struct LeafLine {
    pub indent: Indent,
    pub content: String,
    pub line: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct FencedCodeBlock {
    pub fence_char: u8,
    pub fence_len: usize,
    /// Indentation of the opening fence; removed from content lines.
    pub fence_offset: usize,
    token: FencedCodeToken,
    lines: Vec<LeafLine>,
    closing: Option<String>,
    line: usize,
    column: usize,
}

impl FencedCodeBlock {
    pub(crate) fn new(
        leading_whitespace: &str,
        fence: &str,
        info_line: &str,
        fence_offset: usize,
        line: usize,
        column: usize,
    ) -> Self {
        let (info_whitespace, info_rest) = split_leading_whitespace(info_line);
        let (raw_info, trailing_whitespace) = split_trailing_whitespace(info_rest);
        let fence_char = fence.as_bytes()[0];
        Self {
            fence_char,
            fence_len: fence.len(),
            fence_offset,
            token: FencedCodeToken {
                leading_whitespace: leading_whitespace.to_string(),
                fence: fence.to_string(),
                info_whitespace: info_whitespace.to_string(),
                raw_info: raw_info.to_string(),
                info: unescape(raw_info).into_owned(),
                trailing_whitespace: trailing_whitespace.to_string(),
                indents: Vec::new(),
            },
            lines: Vec::new(),
            closing: None,
            line,
            column,
        }
    }

    pub(crate) fn add_line(&mut self, indent: Indent, content: String, line: usize) {
        self.lines.push(LeafLine {
            indent,
            content,
            line,
        });
    }

    pub(crate) fn close_with_fence(&mut self, indent: Indent, fence: &str) {
        self.token.indents.push(indent);
        self.closing = Some(fence.to_string());
    }

    pub(crate) fn into_tokens(mut self) -> Vec<MarkdownToken> {
        let closing_indent = self.token.indents.pop();
        let mut content = String::new();
        for line in &self.lines {
            content.push_str(&line.content);
            content.push('\n');
        }
        self.token.indents = self.lines.into_iter().map(|line| line.indent).collect();
        self.token.indents.extend(closing_indent);

        let mut tokens = vec![MarkdownToken::new(
            TokenKind::FencedCode(self.token),
            self.line,
            self.column,
        )];
        if !content.is_empty() {
            tokens.push(MarkdownToken::new(
                TokenKind::Text(TextToken {
                    raw: content.clone(),
                    text: content,
                }),
                self.line + 1,
                1,
            ));
        }
        tokens.push(MarkdownToken::new(
            TokenKind::End(EndKind::FencedCode {
                closing: self.closing,
            }),
            self.line,
            self.column,
        ));
        tokens
    }
}

#[derive(Debug, Clone)]
pub(crate) struct IndentedCodeBlock {
    lines: Vec<LeafLine>,
    column: usize,
}

impl IndentedCodeBlock {
    pub(crate) fn new(column: usize) -> Self {
        Self {
            lines: Vec::new(),
            column,
        }
    }

    pub(crate) fn add_line(&mut self, indent: Indent, content: String, line: usize) {
        self.lines.push(LeafLine {
            indent,
            content,
            line,
        });
    }

    /// Trailing blank lines are not part of the block; they come back out
    /// as blank line tokens after its close token.
    pub(crate) fn into_tokens(mut self) -> Vec<MarkdownToken> {
        let keep = self
            .lines
            .iter()
            .rposition(|line| !line.content.bytes().all(|b| b == b' '))
            .map_or(0, |idx| idx + 1);
        let trailing = self.lines.split_off(keep);

        let mut tokens = Vec::new();
        let mut lines = self.lines.into_iter();
        if let Some(first) = lines.next() {
            let line_number = first.line;
            let mut content = first.content;
            content.push('\n');
            let mut indents = Vec::new();
            for line in lines {
                content.push_str(&line.content);
                content.push('\n');
                indents.push(line.indent);
            }
            tokens.push(MarkdownToken::new(
                TokenKind::IndentedCode(IndentedCodeToken {
                    indent: first.indent,
                    indents,
                }),
                line_number,
                self.column,
            ));
            tokens.push(MarkdownToken::new(
                TokenKind::Text(TextToken {
                    raw: content.clone(),
                    text: content,
                }),
                line_number,
                self.column,
            ));
            tokens.push(MarkdownToken::new(
                TokenKind::End(EndKind::IndentedCode),
                line_number,
                self.column,
            ));
        }

        for line in trailing {
            let mut whitespace = line.indent.text;
            whitespace.push_str(line.content.get(line.indent.phantom..).unwrap_or_default());
            tokens.push(MarkdownToken::new(
                TokenKind::BlankLine { whitespace },
                line.line,
                1,
            ));
        }
        tokens
    }
}
