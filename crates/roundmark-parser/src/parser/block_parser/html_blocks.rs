//! HTML block start and end conditions.

use std::sync::LazyLock;

use regex::Regex;

use super::code_blocks::LeafLine;
use crate::parser::inline_parser::raw_html::{close_tag_pattern, open_tag_pattern};
use crate::tokens::{EndKind, HtmlBlockToken, Indent, MarkdownToken, TextToken, TokenKind};

/// HTML block-level tags as defined by CommonMark. These start a kind 6
/// block.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "base",
    "basefont",
    "blockquote",
    "body",
    "caption",
    "center",
    "col",
    "colgroup",
    "dd",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "frame",
    "frameset",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "header",
    "hr",
    "html",
    "iframe",
    "legend",
    "li",
    "link",
    "main",
    "menu",
    "menuitem",
    "nav",
    "noframes",
    "ol",
    "optgroup",
    "option",
    "p",
    "param",
    "search",
    "section",
    "summary",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "title",
    "tr",
    "track",
    "ul",
];

/// Tags whose content is verbatim up to the matching close tag (kind 1).
const VERBATIM_TAGS: &[&str] = &["pre", "script", "style", "textarea"];

static COMPLETE_TAG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        "^(?:{}|{})[ \\t]*$",
        open_tag_pattern(),
        close_tag_pattern()
    );
    Regex::new(&pattern).expect("HTML block pattern is valid")
});

/// Name of the tag opening (or closing, with `/`) at the start of `text`,
/// when followed by whitespace, `>`, `/>` or the end of the line.
fn leading_tag_name(text: &str, allow_close: bool) -> Option<&str> {
    let mut rest = text.strip_prefix('<')?;
    if allow_close && let Some(stripped) = rest.strip_prefix('/') {
        rest = stripped;
    }
    let len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if len == 0 || !rest.as_bytes()[0].is_ascii_alphabetic() {
        return None;
    }
    let after = &rest[len..];
    if after.is_empty() || after.starts_with([' ', '\t', '>']) || after.starts_with("/>") {
        Some(&rest[..len])
    } else {
        None
    }
}

/// Determine which HTML block start condition, if any, `line` satisfies.
/// `line` starts at the first non-space character. Kind 7 cannot interrupt
/// a paragraph.
pub(crate) fn html_block_start(line: &str, interrupts_paragraph: bool) -> Option<u8> {
    if !line.starts_with('<') {
        return None;
    }
    if let Some(name) = leading_tag_name(line, false)
        && VERBATIM_TAGS.contains(&name.to_ascii_lowercase().as_str())
        && !line[1 + name.len()..].starts_with("/>")
    {
        return Some(1);
    }
    if line.starts_with("<!--") {
        return Some(2);
    }
    if line.starts_with("<?") {
        return Some(3);
    }
    if line.len() > 2 && line.starts_with("<!") && line.as_bytes()[2].is_ascii_alphabetic() {
        return Some(4);
    }
    if line.starts_with("<![CDATA[") {
        return Some(5);
    }
    if let Some(name) = leading_tag_name(line, true)
        && BLOCK_TAGS.contains(&name.to_ascii_lowercase().as_str())
    {
        return Some(6);
    }
    if !interrupts_paragraph && COMPLETE_TAG_LINE.is_match(line) {
        return Some(7);
    }
    None
}

/// Whether `line` contains the end condition of a kind 1-5 block.
pub(crate) fn html_block_ends(kind: u8, line: &str) -> bool {
    match kind {
        1 => {
            let lower = line.to_ascii_lowercase();
            VERBATIM_TAGS
                .iter()
                .any(|tag| lower.contains(&format!("</{tag}>")))
        }
        2 => line.contains("-->"),
        3 => line.contains("?>"),
        4 => line.contains('>'),
        5 => line.contains("]]>"),
        _ => false,
    }
}

/// An open HTML block being buffered.
#[derive(Debug, Clone)]
pub(crate) struct HtmlBlock {
    pub kind: u8,
    lines: Vec<LeafLine>,
    column: usize,
}

impl HtmlBlock {
    pub(crate) fn new(kind: u8, column: usize) -> Self {
        Self {
            kind,
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

    pub(crate) fn into_tokens(self) -> Vec<MarkdownToken> {
        let mut lines = self.lines.into_iter();
        let Some(first) = lines.next() else {
            return Vec::new();
        };
        let line_number = first.line;
        let mut content = first.content;
        content.push('\n');
        let mut indents = Vec::new();
        for line in lines {
            content.push_str(&line.content);
            content.push('\n');
            indents.push(line.indent);
        }
        vec![
            MarkdownToken::new(
                TokenKind::HtmlBlock(HtmlBlockToken {
                    kind: self.kind,
                    indent: first.indent,
                    indents,
                }),
                line_number,
                self.column,
            ),
            MarkdownToken::new(
                TokenKind::Text(TextToken {
                    raw: content.clone(),
                    text: content,
                }),
                line_number,
                self.column,
            ),
            MarkdownToken::new(
                TokenKind::End(EndKind::HtmlBlock),
                line_number,
                self.column,
            ),
        ]
    }
}
