//! HTML output.
//!
//! [`HtmlRenderer`] folds over a token stream. Each token goes to the
//! handler registered under its name: open and leaf tokens get
//! `(html, token, previous)`, close tokens get `(html, token, previous,
//! next)`, and every handler returns the extended HTML. Handlers can look
//! up the enclosing open tokens through [`HtmlContext`].

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use roundmark_parser::tokens::{AutolinkToken, ImageToken, LinkToken};
use roundmark_parser::{AutolinkKind, MarkdownToken, ParserOptions, TokenKind};

pub type OpenHandler =
    fn(&HtmlContext<'_>, String, &MarkdownToken, Option<&MarkdownToken>) -> String;
pub type CloseHandler = fn(
    &HtmlContext<'_>,
    String,
    &MarkdownToken,
    Option<&MarkdownToken>,
    Option<&MarkdownToken>,
) -> String;

/// Tag names GFM refuses to pass through as raw HTML.
static DISALLOWED_RAW_HTML: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)<(/?(?:title|textarea|style|xmp|iframe|noembed|noframes|script|plaintext))([\s/>]|$)",
    )
    .expect("valid regex")
});

/// Open tokens enclosing the token being rendered, innermost last. While a
/// handler runs for an open or close token, that token is the innermost.
pub struct HtmlContext<'a> {
    options: ParserOptions,
    open: Vec<&'a MarkdownToken>,
}

impl<'a> HtmlContext<'a> {
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// The innermost open token.
    pub fn current(&self) -> Option<&'a MarkdownToken> {
        self.open.last().copied()
    }

    /// The open token `depth` levels out from the innermost one.
    pub fn ancestor(&self, depth: usize) -> Option<&'a MarkdownToken> {
        self.open.iter().rev().nth(depth).copied()
    }

    /// Whether the innermost paragraph sits directly in an item of a tight
    /// list, where CommonMark drops the `<p>` tags.
    fn in_tight_item(&self) -> bool {
        let Some(TokenKind::ListItem(_)) = self.ancestor(1).map(|t| &t.kind) else {
            return false;
        };
        matches!(self.ancestor(2).map(|t| &t.kind), Some(TokenKind::List(list)) if !list.loose)
    }
}

/// Registration table of token handlers.
#[derive(Clone)]
pub struct HtmlRenderer {
    options: ParserOptions,
    open: HashMap<&'static str, OpenHandler>,
    close: HashMap<&'static str, CloseHandler>,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl HtmlRenderer {
    /// A renderer with the standard CommonMark and GFM handlers.
    pub fn new(options: ParserOptions) -> Self {
        let mut renderer = Self::empty(options);
        renderer
            .register_open("block-quote", |_, html, _, _| cr(html) + "<blockquote>\n")
            .register_close("block-quote", |_, html, _, _, _| cr(html) + "</blockquote>\n")
            .register_open("olist", open_list)
            .register_open("ulist", open_list)
            .register_close("list", close_list)
            .register_open("li", |_, html, _, _| html + "<li>")
            .register_close("li", |_, html, _, _, _| html + "</li>\n")
            .register_open("para", open_paragraph)
            .register_close("para", close_paragraph)
            .register_open("atx", open_heading)
            .register_open("setext", open_heading)
            .register_close("atx", close_heading)
            .register_close("setext", close_heading)
            .register_open("tbreak", |_, html, _, _| cr(html) + "<hr />\n")
            .register_open("fcode-block", open_code_block)
            .register_open("icode-block", open_code_block)
            .register_close("fcode-block", |_, html, _, _, _| html + "</code></pre>\n")
            .register_close("icode-block", |_, html, _, _, _| html + "</code></pre>\n")
            .register_open("html-block", |_, html, _, _| cr(html))
            .register_close("html-block", |_, html, _, _, _| cr(html))
            .register_open("text", text)
            .register_open("icode-span", code_span)
            .register_open("raw-html", raw_html)
            .register_open("hard-break", |_, html, _, _| html + "<br />\n")
            .register_open("emphasis", |_, html, token, _| {
                html + match token.kind {
                    TokenKind::Emphasis { count: 2, .. } => "<strong>",
                    _ => "<em>",
                }
            })
            .register_close("emphasis", |_, html, token, _, _| {
                html + match token.kind {
                    TokenKind::End(roundmark_parser::EndKind::Emphasis { count: 2, .. }) => {
                        "</strong>"
                    }
                    _ => "</em>",
                }
            })
            .register_open("strikethrough", |_, html, _, _| html + "<del>")
            .register_close("strikethrough", |_, html, _, _, _| html + "</del>")
            .register_open("link", open_link)
            .register_close("link", |_, html, _, _, _| html + "</a>")
            .register_open("image", image)
            .register_open("uri-autolink", autolink)
            .register_open("task", task_marker);
        renderer
    }

    /// A renderer with no handlers; unregistered tokens produce nothing.
    pub fn empty(options: ParserOptions) -> Self {
        Self {
            options,
            open: HashMap::new(),
            close: HashMap::new(),
        }
    }

    /// Handle open and leaf tokens named `name`. Replaces any earlier
    /// handler for that name.
    pub fn register_open(&mut self, name: &'static str, handler: OpenHandler) -> &mut Self {
        self.open.insert(name, handler);
        self
    }

    /// Handle close tokens named `name` (`list` for both list kinds).
    pub fn register_close(&mut self, name: &'static str, handler: CloseHandler) -> &mut Self {
        self.close.insert(name, handler);
        self
    }

    pub fn render(&self, tokens: &[MarkdownToken]) -> String {
        let mut context = HtmlContext {
            options: self.options,
            open: Vec::new(),
        };
        let mut html = String::new();
        for (idx, token) in tokens.iter().enumerate() {
            let previous = idx.checked_sub(1).and_then(|prev| tokens.get(prev));
            if token.is_end() {
                if let Some(handler) = self.close.get(token.name()) {
                    html = handler(&context, html, token, previous, tokens.get(idx + 1));
                }
                context.open.pop();
                continue;
            }
            if token.is_open() {
                context.open.push(token);
            }
            match self.open.get(token.name()) {
                Some(handler) => html = handler(&context, html, token, previous),
                None => log::trace!("No HTML handler for {}", token.name()),
            }
        }
        html
    }
}

/// Render `tokens` with the standard handlers.
pub fn to_html(tokens: &[MarkdownToken], options: ParserOptions) -> String {
    HtmlRenderer::new(options).render(tokens)
}

/// Start a new line unless the output is empty or already at one.
fn cr(mut html: String) -> String {
    if !html.is_empty() && !html.ends_with('\n') {
        html.push('\n');
    }
    html
}

fn escape_into(html: &mut String, text: &str) {
    html.push_str(&html_escape::encode_double_quoted_attribute(text));
}

/// Characters left alone when percent-encoding a destination.
fn is_url_safe(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b";/?:@&=+$,-_.!~*'()#".contains(&b)
}

/// Percent-encode `url` the way CommonMark renderers do, keeping existing
/// `%XX` escapes, then escape it for an attribute value.
fn encode_url_into(html: &mut String, url: &str) {
    let bytes = url.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        let b = bytes[idx];
        if b == b'&' {
            html.push_str("&amp;");
        } else if b == b'%'
            && bytes
                .get(idx + 1..idx + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
        {
            html.push('%');
        } else if is_url_safe(b) {
            html.push(b as char);
        } else {
            html.push_str(&format!("%{b:02X}"));
        }
        idx += 1;
    }
}

fn open_list(
    _: &HtmlContext<'_>,
    html: String,
    token: &MarkdownToken,
    _: Option<&MarkdownToken>,
) -> String {
    let mut html = cr(html);
    match &token.kind {
        TokenKind::List(list) if list.ordered && list.start != 1 => {
            html.push_str(&format!("<ol start=\"{}\">\n", list.start));
        }
        TokenKind::List(list) if list.ordered => html.push_str("<ol>\n"),
        _ => html.push_str("<ul>\n"),
    }
    html
}

fn close_list(
    context: &HtmlContext<'_>,
    html: String,
    _: &MarkdownToken,
    _: Option<&MarkdownToken>,
    _: Option<&MarkdownToken>,
) -> String {
    let ordered = matches!(
        context.current().map(|t| &t.kind),
        Some(TokenKind::List(list)) if list.ordered
    );
    cr(html) + if ordered { "</ol>\n" } else { "</ul>\n" }
}

fn open_paragraph(
    context: &HtmlContext<'_>,
    html: String,
    _: &MarkdownToken,
    _: Option<&MarkdownToken>,
) -> String {
    if context.in_tight_item() {
        return html;
    }
    cr(html) + "<p>"
}

fn close_paragraph(
    context: &HtmlContext<'_>,
    html: String,
    _: &MarkdownToken,
    _: Option<&MarkdownToken>,
    _: Option<&MarkdownToken>,
) -> String {
    if context.in_tight_item() {
        return html;
    }
    html + "</p>\n"
}

fn heading_level(token: Option<&MarkdownToken>) -> u8 {
    match token.map(|t| &t.kind) {
        Some(TokenKind::AtxHeading(heading)) => heading.level,
        Some(TokenKind::SetextHeading(heading)) => heading.level,
        _ => 1,
    }
}

fn open_heading(
    _: &HtmlContext<'_>,
    html: String,
    token: &MarkdownToken,
    _: Option<&MarkdownToken>,
) -> String {
    cr(html) + &format!("<h{}>", heading_level(Some(token)))
}

fn close_heading(
    context: &HtmlContext<'_>,
    html: String,
    _: &MarkdownToken,
    _: Option<&MarkdownToken>,
    _: Option<&MarkdownToken>,
) -> String {
    html + &format!("</h{}>\n", heading_level(context.current()))
}

fn open_code_block(
    _: &HtmlContext<'_>,
    html: String,
    token: &MarkdownToken,
    _: Option<&MarkdownToken>,
) -> String {
    let mut html = cr(html);
    let language = match &token.kind {
        TokenKind::FencedCode(code) => code.info.split_whitespace().next(),
        _ => None,
    };
    match language {
        Some(language) => {
            html.push_str("<pre><code class=\"language-");
            escape_into(&mut html, language);
            html.push_str("\">");
        }
        None => html.push_str("<pre><code>"),
    }
    html
}

fn filter_raw_html(context: &HtmlContext<'_>, raw: &str) -> String {
    if context.options.disallowed_raw_html {
        DISALLOWED_RAW_HTML.replace_all(raw, "&lt;$1$2").into_owned()
    } else {
        raw.to_string()
    }
}

fn text(
    context: &HtmlContext<'_>,
    mut html: String,
    token: &MarkdownToken,
    _: Option<&MarkdownToken>,
) -> String {
    let TokenKind::Text(text) = &token.kind else {
        return html;
    };
    if matches!(context.current().map(|t| &t.kind), Some(TokenKind::HtmlBlock(_))) {
        html.push_str(&filter_raw_html(context, &text.text));
    } else {
        escape_into(&mut html, &text.text);
    }
    html
}

fn code_span(
    _: &HtmlContext<'_>,
    mut html: String,
    token: &MarkdownToken,
    _: Option<&MarkdownToken>,
) -> String {
    if let TokenKind::CodeSpan(span) = &token.kind {
        html.push_str("<code>");
        escape_into(&mut html, &span.content);
        html.push_str("</code>");
    }
    html
}

fn raw_html(
    context: &HtmlContext<'_>,
    html: String,
    token: &MarkdownToken,
    _: Option<&MarkdownToken>,
) -> String {
    match &token.kind {
        TokenKind::RawHtml { raw } => html + &filter_raw_html(context, raw),
        _ => html,
    }
}

fn open_link(
    _: &HtmlContext<'_>,
    mut html: String,
    token: &MarkdownToken,
    _: Option<&MarkdownToken>,
) -> String {
    let TokenKind::Link(LinkToken { properties, .. }) = &token.kind else {
        return html;
    };
    html.push_str("<a href=\"");
    encode_url_into(&mut html, &properties.uri);
    html.push('"');
    if let Some(title) = &properties.title {
        html.push_str(" title=\"");
        escape_into(&mut html, title);
        html.push('"');
    }
    html.push('>');
    html
}

fn image(
    _: &HtmlContext<'_>,
    mut html: String,
    token: &MarkdownToken,
    _: Option<&MarkdownToken>,
) -> String {
    let TokenKind::Image(ImageToken {
        properties, alt, ..
    }) = &token.kind
    else {
        return html;
    };
    html.push_str("<img src=\"");
    encode_url_into(&mut html, &properties.uri);
    html.push_str("\" alt=\"");
    escape_into(&mut html, alt);
    html.push('"');
    if let Some(title) = &properties.title {
        html.push_str(" title=\"");
        escape_into(&mut html, title);
        html.push('"');
    }
    html.push_str(" />");
    html
}

fn autolink(
    _: &HtmlContext<'_>,
    mut html: String,
    token: &MarkdownToken,
    _: Option<&MarkdownToken>,
) -> String {
    let TokenKind::Autolink(AutolinkToken { kind, raw, href }) = &token.kind else {
        return html;
    };
    html.push_str("<a href=\"");
    match kind {
        AutolinkKind::Email => {
            html.push_str("mailto:");
            encode_url_into(&mut html, raw);
        }
        AutolinkKind::Uri | AutolinkKind::Extended => encode_url_into(&mut html, href),
    }
    html.push_str("\">");
    escape_into(&mut html, raw);
    html.push_str("</a>");
    html
}

fn task_marker(
    _: &HtmlContext<'_>,
    html: String,
    token: &MarkdownToken,
    _: Option<&MarkdownToken>,
) -> String {
    match token.kind {
        TokenKind::TaskListMarker { checked: true, .. } => {
            html + "<input checked=\"\" disabled=\"\" type=\"checkbox\">"
        }
        _ => html + "<input disabled=\"\" type=\"checkbox\">",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundmark_parser::Parser;
    use similar_asserts::assert_eq;

    fn render(input: &str) -> String {
        to_html(&Parser::default().parse(input), ParserOptions::default())
    }

    fn render_gfm(input: &str) -> String {
        let options = ParserOptions::gfm();
        to_html(&Parser::new(options).parse(input), options)
    }

    #[test]
    fn paragraphs_and_headings() {
        assert_eq!(
            render("# Title\n\nSome *text* and **more**.\n"),
            "<h1>Title</h1>\n<p>Some <em>text</em> and <strong>more</strong>.</p>\n"
        );
        assert_eq!(render("Title\n---\n"), "<h2>Title</h2>\n");
    }

    #[test]
    fn tight_and_loose_lists() {
        assert_eq!(
            render("- a\n- b\n"),
            "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n"
        );
        assert_eq!(
            render("1. a\n\n2. b\n"),
            "<ol>\n<li>\n<p>a</p>\n</li>\n<li>\n<p>b</p>\n</li>\n</ol>\n"
        );
        assert_eq!(render("3) x\n"), "<ol start=\"3\">\n<li>x</li>\n</ol>\n");
    }

    #[test]
    fn nested_tight_list() {
        assert_eq!(
            render("- a\n  - b\n"),
            "<ul>\n<li>a\n<ul>\n<li>b</li>\n</ul>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn block_quote() {
        assert_eq!(
            render("> quote\n"),
            "<blockquote>\n<p>quote</p>\n</blockquote>\n"
        );
    }

    #[test]
    fn code_blocks() {
        assert_eq!(
            render("```rust extra\nfn main() {}\n```\n"),
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n"
        );
        assert_eq!(render("    a < b\n"), "<pre><code>a &lt; b\n</code></pre>\n");
    }

    #[test]
    fn links_are_percent_encoded() {
        assert_eq!(
            render("[a](<my uri> \"t&\")\n"),
            "<p><a href=\"my%20uri\" title=\"t&amp;\">a</a></p>\n"
        );
        assert_eq!(
            render("[a](foo%20b&auml;)\n"),
            "<p><a href=\"foo%20b%C3%A4\">a</a></p>\n"
        );
    }

    #[test]
    fn images_use_alt_text() {
        assert_eq!(
            render("![foo *bar*](/url)\n"),
            "<p><img src=\"/url\" alt=\"foo bar\" /></p>\n"
        );
    }

    #[test]
    fn breaks() {
        assert_eq!(render("a  \nb\nc\n"), "<p>a<br />\nb\nc</p>\n");
    }

    #[test]
    fn html_block_is_passed_through() {
        assert_eq!(render("<div>\n*hi*\n</div>\n"), "<div>\n*hi*\n</div>\n");
    }

    #[test]
    fn gfm_extensions() {
        assert_eq!(render_gfm("~~gone~~\n"), "<p><del>gone</del></p>\n");
        assert_eq!(
            render_gfm("- [ ] todo\n- [x] done\n"),
            "<ul>\n<li><input disabled=\"\" type=\"checkbox\"> todo</li>\n\
             <li><input checked=\"\" disabled=\"\" type=\"checkbox\"> done</li>\n</ul>\n"
        );
        assert_eq!(
            render_gfm("see www.commonmark.org\n"),
            "<p>see <a href=\"http://www.commonmark.org\">www.commonmark.org</a></p>\n"
        );
    }

    #[test]
    fn disallowed_raw_html_is_escaped() {
        assert_eq!(
            render_gfm("<strong> <title> <style> <em>\n"),
            "<p><strong> &lt;title> &lt;style> <em></p>\n"
        );
        assert_eq!(render("<b><script></b>\n"), "<p><b><script></b></p>\n");
    }

    #[test]
    fn handlers_can_be_replaced() {
        let mut renderer = HtmlRenderer::new(ParserOptions::default());
        renderer.register_open("tbreak", |_, html, _, _| html + "<hr>\n");
        let tokens = Parser::default().parse("***\n");
        assert_eq!(renderer.render(&tokens), "<hr>\n");
    }

    #[test]
    fn open_and_close_handlers_pair_up() {
        let mut renderer = HtmlRenderer::new(ParserOptions::default());
        renderer
            .register_open("block-quote", |_, html, _, _| html + "<aside>\n")
            .register_close("block-quote", |_, html, _, _, _| html + "</aside>\n");
        let tokens = Parser::default().parse("> a\n");
        assert_eq!(renderer.render(&tokens), "<aside>\n<p>a</p>\n</aside>\n");
    }
}
