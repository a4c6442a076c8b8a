//! Paragraph buffering, definition extraction and setext conversion.

use super::reference_definitions::{ReferenceRegistry, try_parse_reference_definition};
use crate::tokens::{
    EndKind, Indent, LinkDefinitionToken, MarkdownToken, ParagraphToken, SetextHeadingToken,
    TextToken, TokenKind,
};
use crate::utils::split_trailing_whitespace;

/// One paragraph line with its leading whitespace split off.
#[derive(Debug, Clone)]
pub(crate) struct ParagraphLine {
    pub whitespace: String,
    pub content: String,
    pub line: usize,
    /// 1-based column of the first content character.
    pub column: usize,
}

/// Leaf tokens for a block with inline content, plus the source position of
/// each content line so inline tokens can be positioned.
#[derive(Debug)]
pub(crate) struct InlineLeaf {
    pub tokens: Vec<MarkdownToken>,
    /// Index of the `Text` token within `tokens`, if there is content.
    pub text_index: Option<usize>,
    pub positions: Vec<(usize, usize)>,
}

struct SplitContent {
    first: ParagraphLine,
    indents: Vec<Indent>,
    body: String,
    trailing_whitespace: String,
    positions: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ParagraphBuffer {
    lines: Vec<ParagraphLine>,
}

impl ParagraphBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, line: ParagraphLine) {
        self.lines.push(line);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Peel reference definitions off the start of the paragraph, adding
    /// them to `registry` and returning their tokens.
    pub(crate) fn take_definitions(
        &mut self,
        registry: &mut ReferenceRegistry,
    ) -> Vec<MarkdownToken> {
        let text = self
            .lines
            .iter()
            .map(|line| line.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let mut tokens = Vec::new();
        // Byte offset into `text` and index into `lines` of the first
        // unconsumed line.
        let mut offset = 0;
        let mut taken = 0;
        while self
            .lines
            .get(taken)
            .is_some_and(|line| line.content.starts_with('['))
        {
            let rest = &text[offset..];
            let Some(definition) = try_parse_reference_definition(rest) else {
                break;
            };
            let source = &rest[..definition.len];
            let mut consumed = source.matches('\n').count();
            if definition.len == rest.len() {
                consumed += 1;
            }
            if consumed == 0 {
                break;
            }
            let raw = source.strip_suffix('\n').unwrap_or(source).to_string();
            let lines = &self.lines[taken..taken + consumed];
            offset += definition.len;
            taken += consumed;

            let duplicate = !registry.add(
                &definition.label,
                definition.destination.clone(),
                definition.title.clone(),
            );
            log::debug!(
                "Reference definition [{}] at line {} (duplicate: {})",
                definition.label,
                lines[0].line,
                duplicate
            );

            tokens.push(MarkdownToken::new(
                TokenKind::LinkReferenceDefinition(LinkDefinitionToken {
                    leading_whitespace: lines[0].whitespace.clone(),
                    indents: lines[1..]
                        .iter()
                        .map(|line| Indent::new(line.whitespace.as_str()))
                        .collect(),
                    raw,
                    label: definition.label,
                    destination: definition.destination,
                    title: definition.title,
                    duplicate,
                }),
                lines[0].line,
                lines[0].column,
            ));
        }
        self.lines.drain(..taken);
        tokens
    }

    /// Joined content, with the trailing whitespace of the last line split
    /// off, and the content line positions.
    fn split_content(self) -> Option<SplitContent> {
        let mut lines = self.lines.into_iter();
        let first = lines.next()?;
        let mut content = first.content.clone();
        let mut indents = Vec::new();
        let mut positions = vec![(first.line, first.column)];
        for line in lines {
            content.push('\n');
            content.push_str(&line.content);
            positions.push((line.line, line.column));
            indents.push(Indent::new(line.whitespace));
        }
        let (body, trailing) = split_trailing_whitespace(&content);
        Some(SplitContent {
            body: body.to_string(),
            trailing_whitespace: trailing.to_string(),
            first,
            indents,
            positions,
        })
    }

    pub(crate) fn into_paragraph(self) -> Option<InlineLeaf> {
        let SplitContent {
            first,
            indents,
            body,
            trailing_whitespace,
            positions,
        } = self.split_content()?;
        let tokens = vec![
            MarkdownToken::new(
                TokenKind::Paragraph(ParagraphToken {
                    leading_whitespace: first.whitespace,
                    indents,
                }),
                first.line,
                first.column,
            ),
            MarkdownToken::new(
                TokenKind::Text(TextToken {
                    raw: body.clone(),
                    text: body,
                }),
                first.line,
                first.column,
            ),
            MarkdownToken::new(
                TokenKind::End(EndKind::Paragraph {
                    trailing_whitespace,
                }),
                first.line,
                first.column,
            ),
        ];
        Some(InlineLeaf {
            tokens,
            text_index: Some(1),
            positions,
        })
    }

    /// Turn the buffered lines into a setext heading closed by `underline`.
    pub(crate) fn into_setext(
        self,
        level: u8,
        underline_whitespace: &str,
        underline: &str,
    ) -> Option<InlineLeaf> {
        let SplitContent {
            first,
            mut indents,
            body,
            trailing_whitespace,
            positions,
        } = self.split_content()?;
        indents.push(Indent::new(underline_whitespace));
        let tokens = vec![
            MarkdownToken::new(
                TokenKind::SetextHeading(SetextHeadingToken {
                    level,
                    leading_whitespace: first.whitespace,
                    indents,
                }),
                first.line,
                first.column,
            ),
            MarkdownToken::new(
                TokenKind::Text(TextToken {
                    raw: body.clone(),
                    text: body,
                }),
                first.line,
                first.column,
            ),
            MarkdownToken::new(
                TokenKind::End(EndKind::SetextHeading {
                    trailing_whitespace,
                    underline: underline.to_string(),
                }),
                first.line,
                first.column,
            ),
        ];
        Some(InlineLeaf {
            tokens,
            text_index: Some(1),
            positions,
        })
    }
}
