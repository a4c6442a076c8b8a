//! Token model.
//!
//! A parsed document is a flat `Vec<MarkdownToken>`. Container-shaped
//! constructs appear as an open token followed, later in the stream, by a
//! [`TokenKind::End`] token; leaves are single tokens. Open tokens of
//! multi-line constructs carry one [`Indent`] per line after their first,
//! holding the exact prefix text that the construct consumed on that line.

use std::fmt;

pub mod link;

pub use link::{LabelType, LinkProperties};

use crate::source::LineEnding;

/// Raw prefix consumed by one container on one line.
///
/// `phantom` is only used by code and HTML blocks: it counts columns of a
/// split tab that appear as spaces at the start of the following content
/// and must be skipped when writing the source back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Indent {
    pub text: String,
    pub phantom: usize,
}

impl Indent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            phantom: 0,
        }
    }

    pub(crate) fn with_phantom(text: impl Into<String>, phantom: usize) -> Self {
        Self {
            text: text.into(),
            phantom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DocumentToken {
    pub line_ending: LineEnding,
    /// 0-based line numbers whose ending differs from `line_ending`.
    pub irregular_endings: Vec<(usize, LineEnding)>,
    pub trailing_newline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BlockQuoteToken {
    /// Leading whitespace, `>` and the optional following space.
    pub marker: String,
    pub indents: Vec<Indent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ListToken {
    pub ordered: bool,
    /// Bullet character, or `.`/`)` for ordered lists.
    pub delimiter: char,
    pub start: u64,
    pub loose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ListItemToken {
    pub leading_whitespace: String,
    /// Marker text, e.g. `-` or `12.`.
    pub marker: String,
    pub after_marker: String,
    /// Columns, relative to the enclosing container, that continuation
    /// lines must be indented by.
    pub content_indent: usize,
    pub task: Option<bool>,
    pub indents: Vec<Indent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParagraphToken {
    pub leading_whitespace: String,
    pub indents: Vec<Indent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AtxHeadingToken {
    pub level: u8,
    pub leading_whitespace: String,
    pub after_hashes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SetextHeadingToken {
    pub level: u8,
    pub leading_whitespace: String,
    /// Prefixes of the content lines after the first, then of the underline.
    pub indents: Vec<Indent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FencedCodeToken {
    pub leading_whitespace: String,
    pub fence: String,
    pub info_whitespace: String,
    pub raw_info: String,
    /// Info string with escapes and entities resolved.
    pub info: String,
    pub trailing_whitespace: String,
    pub indents: Vec<Indent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IndentedCodeToken {
    pub indent: Indent,
    pub indents: Vec<Indent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HtmlBlockToken {
    /// Start condition, 1 to 7.
    pub kind: u8,
    pub indent: Indent,
    pub indents: Vec<Indent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TextToken {
    pub raw: String,
    /// Text with escapes, entities and soft-break whitespace resolved.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ThematicBreakToken {
    pub leading_whitespace: String,
    pub marker: char,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LinkDefinitionToken {
    pub leading_whitespace: String,
    pub indents: Vec<Indent>,
    /// Source from the opening `[` to the end of the last line.
    pub raw: String,
    pub label: String,
    pub destination: String,
    pub title: Option<String>,
    /// Later definitions of an already-defined label are kept as tokens
    /// but do not resolve anything.
    pub duplicate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CodeSpanToken {
    pub backticks: usize,
    pub raw: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AutolinkKind {
    Uri,
    Email,
    /// GFM `www.`, `http(s)://` or bare email found in text.
    Extended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AutolinkToken {
    pub kind: AutolinkKind,
    /// Text between `<` and `>`, or the matched text for extended links.
    pub raw: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LinkToken {
    pub properties: LinkProperties,
    /// Raw source between the brackets.
    pub text_from_blocks: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ImageToken {
    pub properties: LinkProperties,
    pub text_from_blocks: String,
    /// Plain-text rendering of the image description.
    pub alt: String,
}

/// Close token data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum EndKind {
    Document,
    BlockQuote,
    List,
    ListItem,
    Paragraph {
        trailing_whitespace: String,
    },
    AtxHeading {
        /// Everything after the content: whitespace and closing hashes.
        closing: String,
    },
    SetextHeading {
        trailing_whitespace: String,
        /// Underline characters and trailing whitespace.
        underline: String,
    },
    FencedCode {
        /// Closing fence and trailing whitespace; `None` when the block was
        /// closed by its container or the end of the document.
        closing: Option<String>,
    },
    IndentedCode,
    HtmlBlock,
    Link,
    Emphasis {
        marker: char,
        count: usize,
    },
    Strikethrough {
        count: usize,
    },
}

impl EndKind {
    pub fn name(&self) -> &'static str {
        match self {
            EndKind::Document => "document",
            EndKind::BlockQuote => "block-quote",
            EndKind::List => "list",
            EndKind::ListItem => "li",
            EndKind::Paragraph { .. } => "para",
            EndKind::AtxHeading { .. } => "atx",
            EndKind::SetextHeading { .. } => "setext",
            EndKind::FencedCode { .. } => "fcode-block",
            EndKind::IndentedCode => "icode-block",
            EndKind::HtmlBlock => "html-block",
            EndKind::Link => "link",
            EndKind::Emphasis { .. } => "emphasis",
            EndKind::Strikethrough { .. } => "strikethrough",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TokenKind {
    Document(DocumentToken),
    BlockQuote(BlockQuoteToken),
    List(ListToken),
    ListItem(ListItemToken),
    Paragraph(ParagraphToken),
    AtxHeading(AtxHeadingToken),
    SetextHeading(SetextHeadingToken),
    FencedCode(FencedCodeToken),
    IndentedCode(IndentedCodeToken),
    HtmlBlock(HtmlBlockToken),
    Link(LinkToken),
    Emphasis { marker: char, count: usize },
    Strikethrough { count: usize },
    End(EndKind),

    Text(TextToken),
    BlankLine { whitespace: String },
    ThematicBreak(ThematicBreakToken),
    LinkReferenceDefinition(LinkDefinitionToken),
    CodeSpan(CodeSpanToken),
    RawHtml { raw: String },
    Autolink(AutolinkToken),
    Image(ImageToken),
    HardBreak { raw: String },
    TaskListMarker { checked: bool, raw: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MarkdownToken {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

pub type TokenStream = Vec<MarkdownToken>;

impl MarkdownToken {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }

    pub fn name(&self) -> &'static str {
        match &self.kind {
            TokenKind::Document(_) => "document",
            TokenKind::BlockQuote(_) => "block-quote",
            TokenKind::List(list) if list.ordered => "olist",
            TokenKind::List(_) => "ulist",
            TokenKind::ListItem(_) => "li",
            TokenKind::Paragraph(_) => "para",
            TokenKind::AtxHeading(_) => "atx",
            TokenKind::SetextHeading(_) => "setext",
            TokenKind::FencedCode(_) => "fcode-block",
            TokenKind::IndentedCode(_) => "icode-block",
            TokenKind::HtmlBlock(_) => "html-block",
            TokenKind::Link(_) => "link",
            TokenKind::Emphasis { .. } => "emphasis",
            TokenKind::Strikethrough { .. } => "strikethrough",
            TokenKind::End(end) => end.name(),
            TokenKind::Text(_) => "text",
            TokenKind::BlankLine { .. } => "BLANK",
            TokenKind::ThematicBreak(_) => "tbreak",
            TokenKind::LinkReferenceDefinition(_) => "link-ref-def",
            TokenKind::CodeSpan(_) => "icode-span",
            TokenKind::RawHtml { .. } => "raw-html",
            TokenKind::Autolink(_) => "uri-autolink",
            TokenKind::Image(_) => "image",
            TokenKind::HardBreak { .. } => "hard-break",
            TokenKind::TaskListMarker { .. } => "task",
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self.kind, TokenKind::End(_))
    }

    /// Whether this token opens a construct that a later `End` closes.
    pub fn is_open(&self) -> bool {
        matches!(
            self.kind,
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
        )
    }

    /// Name of the close token that matches this open token.
    pub fn end_name(&self) -> Option<&'static str> {
        if !self.is_open() {
            return None;
        }
        Some(match &self.kind {
            TokenKind::List(_) => "list",
            _ => self.name(),
        })
    }

    /// Type-specific fields as one colon-separated string.
    pub fn extra_data(&self) -> String {
        match &self.kind {
            TokenKind::Document(doc) => format!(
                "{}:{}",
                escape_newlines(doc.line_ending.as_str()),
                doc.trailing_newline
            ),
            TokenKind::BlockQuote(quote) => {
                format!("{}:{}", quote.marker, join_indents(&quote.indents))
            }
            TokenKind::List(list) => {
                format!("{}:{}:{}", list.delimiter, list.start, list.loose)
            }
            TokenKind::ListItem(item) => format!(
                "{}:{}:{}:{}:{}",
                item.leading_whitespace,
                item.marker,
                item.after_marker,
                item.content_indent,
                join_indents(&item.indents)
            ),
            TokenKind::Paragraph(para) => {
                if para.indents.is_empty() {
                    para.leading_whitespace.clone()
                } else {
                    format!(
                        "{}\n{}",
                        para.leading_whitespace,
                        join_indents(&para.indents)
                    )
                }
            }
            TokenKind::AtxHeading(heading) => format!(
                "{}:{}:{}",
                heading.level, heading.leading_whitespace, heading.after_hashes
            ),
            TokenKind::SetextHeading(heading) => format!(
                "{}:{}:{}",
                heading.level,
                heading.leading_whitespace,
                join_indents(&heading.indents)
            ),
            TokenKind::FencedCode(code) => format!(
                "{}:{}:{}:{}:{}:{}:{}",
                code.fence,
                code.info,
                code.raw_info,
                code.info_whitespace,
                code.trailing_whitespace,
                code.leading_whitespace,
                join_indents(&code.indents)
            ),
            TokenKind::IndentedCode(code) => {
                let mut all = vec![code.indent.clone()];
                all.extend(code.indents.iter().cloned());
                join_indents(&all)
            }
            TokenKind::HtmlBlock(html) => {
                let mut all = vec![html.indent.clone()];
                all.extend(html.indents.iter().cloned());
                format!("{}:{}", html.kind, join_indents(&all))
            }
            TokenKind::Link(link) => {
                format!("{}:{}", link.properties.extra_data(), link.text_from_blocks)
            }
            TokenKind::Emphasis { marker, count } => format!("{count}:{marker}"),
            TokenKind::Strikethrough { count } => format!("{count}:~"),
            TokenKind::End(end) => match end {
                EndKind::Paragraph {
                    trailing_whitespace,
                } => trailing_whitespace.clone(),
                EndKind::AtxHeading { closing } => closing.clone(),
                EndKind::SetextHeading {
                    trailing_whitespace,
                    underline,
                } => format!("{trailing_whitespace}:{underline}"),
                EndKind::FencedCode { closing } => closing.clone().unwrap_or_default(),
                EndKind::Emphasis { marker, count } => format!("{count}:{marker}"),
                EndKind::Strikethrough { count } => format!("{count}:~"),
                _ => String::new(),
            },
            TokenKind::Text(text) => text.text.clone(),
            TokenKind::BlankLine { whitespace } => whitespace.clone(),
            TokenKind::ThematicBreak(tbreak) => format!(
                "{}:{}:{}",
                tbreak.marker, tbreak.leading_whitespace, tbreak.raw
            ),
            TokenKind::LinkReferenceDefinition(def) => format!(
                "{}:{}:{}:{}:{}",
                def.duplicate,
                def.label,
                def.destination,
                def.title.as_deref().unwrap_or_default(),
                def.raw
            ),
            TokenKind::CodeSpan(span) => format!("{}:{}", span.backticks, span.content),
            TokenKind::RawHtml { raw } => raw.clone(),
            TokenKind::Autolink(autolink) => format!("{}:{}", autolink.href, autolink.raw),
            TokenKind::Image(image) => format!(
                "{}:{}:{}",
                image.properties.extra_data(),
                image.text_from_blocks,
                image.alt
            ),
            TokenKind::HardBreak { raw } => raw.clone(),
            TokenKind::TaskListMarker { checked, .. } => checked.to_string(),
        }
    }
}

fn join_indents(indents: &[Indent]) -> String {
    indents
        .iter()
        .map(|indent| indent.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_newlines(text: &str) -> String {
    text.replace('\r', "\\r").replace('\n', "\\n")
}

impl fmt::Display for MarkdownToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.is_end() { "end-" } else { "" };
        write!(
            f,
            "[{}{}({},{}):{}]",
            prefix,
            self.name(),
            self.line,
            self.column,
            escape_newlines(&self.extra_data())
        )
    }
}

/// Render a token stream one token per line.
pub fn render_tokens(tokens: &[MarkdownToken]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(&token.to_string());
        out.push('\n');
    }
    out
}
