//! Rehydration: writing a token stream back to source text.
//!
//! Open tokens push a frame holding the per-line prefixes their container
//! recorded. Output is written lazily: the first write on a new line first
//! emits, outermost frame first, the next recorded prefix of every frame
//! that was already open before that line.

use crate::error::{StructureError, StructureErrorKind};
use crate::source::LineEnding;
use crate::tokens::{
    AutolinkKind, EndKind, Indent, LinkDefinitionToken, MarkdownToken, TokenKind,
};

#[derive(Debug)]
struct Frame {
    name: &'static str,
    line: usize,
    column: usize,
    indents: Option<Vec<Indent>>,
    next: usize,
    /// Output line on which the frame was opened.
    opened_line: usize,
    /// Source after the link text, for link frames.
    link_tail: Option<String>,
}

struct Rehydrator {
    out: String,
    frames: Vec<Frame>,
    /// Number of line endings written so far.
    line: usize,
    /// Whether the current line's prefixes have been written.
    line_started: bool,
    /// Phantom columns to drop from the start of the next write.
    skip: usize,
    /// Depth of link bodies whose content comes from `text_from_blocks`.
    suppressed: usize,
}

impl Rehydrator {
    fn new() -> Self {
        Self {
            out: String::new(),
            frames: Vec::new(),
            line: 0,
            line_started: false,
            skip: 0,
            suppressed: 0,
        }
    }

    fn start_line(&mut self) -> Result<(), StructureError> {
        if self.line_started {
            return Ok(());
        }
        self.line_started = true;
        let line = self.line;
        for frame in &mut self.frames {
            let Some(indents) = &frame.indents else {
                continue;
            };
            if frame.opened_line >= line {
                continue;
            }
            let Some(indent) = indents.get(frame.next) else {
                return Err(StructureError::new(
                    StructureErrorKind::MissingIndent { name: frame.name },
                    frame.line,
                    frame.column,
                ));
            };
            frame.next += 1;
            self.out.push_str(&indent.text);
            if indent.phantom > 0 {
                self.skip = indent.phantom;
            }
        }
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), StructureError> {
        for piece in text.split_inclusive('\n') {
            self.start_line()?;
            let mut piece = piece;
            while self.skip > 0 && piece.starts_with(' ') {
                piece = &piece[1..];
                self.skip -= 1;
            }
            self.skip = 0;
            self.out.push_str(piece);
            if piece.ends_with('\n') {
                self.line += 1;
                self.line_started = false;
            }
        }
        Ok(())
    }

    fn push_frame(
        &mut self,
        token: &MarkdownToken,
        indents: Option<Vec<Indent>>,
        opened_line: usize,
    ) {
        self.frames.push(Frame {
            name: token.end_name().unwrap_or_else(|| token.name()),
            line: token.line,
            column: token.column,
            indents,
            next: 0,
            opened_line,
            link_tail: match &token.kind {
                TokenKind::Link(link) => Some(link.properties.tail()),
                _ => None,
            },
        });
    }

    fn open(&mut self, token: &MarkdownToken) -> Result<(), StructureError> {
        // A fence line ends inside `open`; its frame still starts here.
        let opened_line = self.line;
        let indents = match &token.kind {
            TokenKind::BlockQuote(quote) => Some(quote.indents.clone()),
            TokenKind::ListItem(item) => Some(item.indents.clone()),
            TokenKind::Paragraph(para) => Some(para.indents.clone()),
            TokenKind::SetextHeading(heading) => Some(heading.indents.clone()),
            TokenKind::FencedCode(code) => Some(code.indents.clone()),
            TokenKind::IndentedCode(code) => Some(code.indents.clone()),
            TokenKind::HtmlBlock(html) => Some(html.indents.clone()),
            TokenKind::Document(_)
            | TokenKind::List(_)
            | TokenKind::AtxHeading(_)
            | TokenKind::Link(_)
            | TokenKind::Emphasis { .. }
            | TokenKind::Strikethrough { .. }
            | TokenKind::End(_)
            | TokenKind::Text(_)
            | TokenKind::BlankLine { .. }
            | TokenKind::ThematicBreak(_)
            | TokenKind::LinkReferenceDefinition(_)
            | TokenKind::CodeSpan(_)
            | TokenKind::RawHtml { .. }
            | TokenKind::Autolink(_)
            | TokenKind::Image(_)
            | TokenKind::HardBreak { .. }
            | TokenKind::TaskListMarker { .. } => None,
        };

        if self.suppressed == 0 {
            match &token.kind {
                TokenKind::BlockQuote(quote) => self.write(&quote.marker)?,
                TokenKind::ListItem(item) => {
                    self.write(&item.leading_whitespace)?;
                    self.write(&item.marker)?;
                    self.write(&item.after_marker)?;
                }
                TokenKind::Paragraph(para) => self.write(&para.leading_whitespace)?,
                TokenKind::AtxHeading(heading) => {
                    self.write(&heading.leading_whitespace)?;
                    self.write(&"#".repeat(heading.level as usize))?;
                    self.write(&heading.after_hashes)?;
                }
                TokenKind::SetextHeading(heading) => self.write(&heading.leading_whitespace)?,
                TokenKind::FencedCode(code) => {
                    self.write(&code.leading_whitespace)?;
                    self.write(&code.fence)?;
                    self.write(&code.info_whitespace)?;
                    self.write(&code.raw_info)?;
                    self.write(&code.trailing_whitespace)?;
                    self.write("\n")?;
                }
                TokenKind::IndentedCode(code) => {
                    self.write(&code.indent.text)?;
                    self.skip = code.indent.phantom;
                }
                TokenKind::HtmlBlock(html) => {
                    self.write(&html.indent.text)?;
                    self.skip = html.indent.phantom;
                }
                TokenKind::Link(link) => {
                    self.write("[")?;
                    self.write(&link.text_from_blocks)?;
                }
                TokenKind::Emphasis { marker, count } => {
                    self.write(&marker.to_string().repeat(*count))?;
                }
                TokenKind::Strikethrough { count } => self.write(&"~".repeat(*count))?,
                // Document and list tokens write nothing; leaves never reach `open`.
                TokenKind::Document(_)
                | TokenKind::List(_)
                | TokenKind::End(_)
                | TokenKind::Text(_)
                | TokenKind::BlankLine { .. }
                | TokenKind::ThematicBreak(_)
                | TokenKind::LinkReferenceDefinition(_)
                | TokenKind::CodeSpan(_)
                | TokenKind::RawHtml { .. }
                | TokenKind::Autolink(_)
                | TokenKind::Image(_)
                | TokenKind::HardBreak { .. }
                | TokenKind::TaskListMarker { .. } => {}
            }
        }
        if matches!(token.kind, TokenKind::Link(_)) {
            self.suppressed += 1;
        }
        self.push_frame(token, indents, opened_line);
        Ok(())
    }

    fn close(&mut self, token: &MarkdownToken, end: &EndKind) -> Result<(), StructureError> {
        let found = end.name();
        let Some(frame) = self.frames.last() else {
            return Err(StructureError::new(
                StructureErrorKind::UnbalancedClose { name: found },
                token.line,
                token.column,
            ));
        };
        if frame.name != found {
            return Err(StructureError::new(
                StructureErrorKind::MismatchedClose {
                    expected: frame.name,
                    found,
                },
                token.line,
                token.column,
            ));
        }

        if let EndKind::Link = end {
            self.suppressed = self.suppressed.saturating_sub(1);
        }
        if self.suppressed == 0 {
            match end {
                EndKind::Paragraph {
                    trailing_whitespace,
                } => {
                    self.write(trailing_whitespace)?;
                    self.write("\n")?;
                }
                EndKind::AtxHeading { closing } => {
                    self.write(closing)?;
                    self.write("\n")?;
                }
                EndKind::SetextHeading {
                    trailing_whitespace,
                    underline,
                } => {
                    self.write(trailing_whitespace)?;
                    self.write("\n")?;
                    self.write(underline)?;
                    self.write("\n")?;
                }
                EndKind::FencedCode {
                    closing: Some(closing),
                } => {
                    self.write(closing)?;
                    self.write("\n")?;
                }
                EndKind::Link => {
                    if let Some(tail) = self.frames.last().and_then(|f| f.link_tail.clone()) {
                        self.write(&tail)?;
                    }
                }
                EndKind::Emphasis { marker, count } => {
                    self.write(&marker.to_string().repeat(*count))?;
                }
                EndKind::Strikethrough { count } => self.write(&"~".repeat(*count))?,
                EndKind::FencedCode { closing: None }
                | EndKind::Document
                | EndKind::BlockQuote
                | EndKind::List
                | EndKind::ListItem
                | EndKind::IndentedCode
                | EndKind::HtmlBlock => {}
            }
        }
        self.frames.pop();
        Ok(())
    }

    fn leaf(&mut self, token: &MarkdownToken) -> Result<(), StructureError> {
        if self.suppressed > 0 {
            return Ok(());
        }
        match &token.kind {
            TokenKind::Text(text) => self.write(&text.raw),
            TokenKind::BlankLine { whitespace } => {
                self.write(whitespace)?;
                self.write("\n")
            }
            TokenKind::ThematicBreak(tbreak) => {
                self.write(&tbreak.leading_whitespace)?;
                self.write(&tbreak.raw)?;
                self.write("\n")
            }
            TokenKind::LinkReferenceDefinition(definition) => self.definition(token, definition),
            TokenKind::CodeSpan(span) => {
                let fence = "`".repeat(span.backticks);
                self.write(&fence)?;
                self.write(&span.raw)?;
                self.write(&fence)
            }
            TokenKind::RawHtml { raw } => self.write(raw),
            TokenKind::Autolink(autolink) => match autolink.kind {
                AutolinkKind::Extended => self.write(&autolink.raw),
                AutolinkKind::Uri | AutolinkKind::Email => {
                    self.write("<")?;
                    self.write(&autolink.raw)?;
                    self.write(">")
                }
            },
            TokenKind::Image(image) => {
                self.write("![")?;
                self.write(&image.text_from_blocks)?;
                self.write(&image.properties.tail())
            }
            TokenKind::HardBreak { raw } => self.write(raw),
            TokenKind::TaskListMarker { raw, .. } => self.write(raw),
            TokenKind::Document(_)
            | TokenKind::BlockQuote(_)
            | TokenKind::List(_)
            | TokenKind::ListItem(_)
            | TokenKind::Paragraph(_)
            | TokenKind::AtxHeading(_)
            | TokenKind::SetextHeading(_)
            | TokenKind::FencedCode(_)
            | TokenKind::IndentedCode(_)
            | TokenKind::HtmlBlock(_)
            | TokenKind::Link(_)
            | TokenKind::Emphasis { .. }
            | TokenKind::Strikethrough { .. }
            | TokenKind::End(_) => Ok(()),
        }
    }

    /// Definitions span lines with their own continuation prefixes.
    fn definition(
        &mut self,
        token: &MarkdownToken,
        definition: &LinkDefinitionToken,
    ) -> Result<(), StructureError> {
        self.push_frame(token, Some(definition.indents.clone()), self.line);
        self.write(&definition.leading_whitespace)?;
        self.write(&definition.raw)?;
        self.write("\n")?;
        self.frames.pop();
        Ok(())
    }
}

/// Apply the document's line endings to `\n`-normalized text.
fn apply_line_endings(
    text: &str,
    line_ending: LineEnding,
    irregular: &[(usize, LineEnding)],
) -> String {
    if line_ending == LineEnding::Lf && irregular.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for (index, piece) in text.split_inclusive('\n').enumerate() {
        match piece.strip_suffix('\n') {
            Some(content) => {
                out.push_str(content);
                let ending = irregular
                    .iter()
                    .find(|(line, _)| *line == index)
                    .map_or(line_ending, |(_, ending)| *ending);
                out.push_str(ending.as_str());
            }
            None => out.push_str(piece),
        }
    }
    out
}

/// Write `tokens` back to source text.
///
/// For the output of the parser this reproduces the input exactly. Tokens
/// may be edited first; only the edited fields' text changes.
pub fn rehydrate(tokens: &[MarkdownToken]) -> Result<String, StructureError> {
    let mut rehydrator = Rehydrator::new();
    for token in tokens {
        match &token.kind {
            TokenKind::End(end) => rehydrator.close(token, end)?,
            _ if token.is_open() => rehydrator.open(token)?,
            _ => rehydrator.leaf(token)?,
        }
    }
    if let Some(frame) = rehydrator.frames.last() {
        return Err(StructureError::new(
            StructureErrorKind::UnclosedOpen { name: frame.name },
            frame.line,
            frame.column,
        ));
    }

    let (line_ending, irregular, trailing_newline) = match tokens.first().map(|t| &t.kind) {
        Some(TokenKind::Document(document)) => (
            document.line_ending,
            document.irregular_endings.as_slice(),
            document.trailing_newline,
        ),
        _ => (LineEnding::Lf, &[][..], true),
    };
    let mut out = rehydrator.out;
    if !trailing_newline && out.ends_with('\n') {
        out.pop();
    }
    log::trace!("Rehydrated {} tokens into {} bytes", tokens.len(), out.len());
    Ok(apply_line_endings(&out, line_ending, irregular))
}
