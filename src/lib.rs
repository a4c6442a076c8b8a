pub mod config;
pub mod html;
pub mod linter;

pub use config::Config;
pub use config::ConfigBuilder;
pub use html::{HtmlRenderer, to_html};
pub use linter::{Diagnostic, lint};
pub use roundmark_parser::{MarkdownToken, StructureError, TokenStream, rehydrate};

use roundmark_parser::Parser;

#[cfg(test)]
fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parses a Markdown document into a lossless token stream.
///
/// # Examples
///
/// ```rust
/// use roundmark::{parse, rehydrate};
///
/// let input = "# Heading\n\nParagraph text.";
/// let tokens = parse(input, None);
/// assert_eq!(rehydrate(&tokens).unwrap(), input);
/// ```
///
/// # Arguments
///
/// * `input` - The Markdown document
/// * `config` - Optional configuration (defaults to plain CommonMark)
pub fn parse(input: &str, config: Option<Config>) -> TokenStream {
    let config = config.unwrap_or_default();
    Parser::new(config.parser_options()).parse(input)
}

/// Renders a Markdown document to HTML.
pub fn render_html(input: &str, config: Option<Config>) -> String {
    let options = config.unwrap_or_default().parser_options();
    to_html(&Parser::new(options).parse(input), options)
}

/// Parses `input` and writes it back. The result equals `input` unless the
/// token stream is malformed.
pub fn roundtrip(input: &str, config: Option<Config>) -> Result<String, StructureError> {
    rehydrate(&parse(input, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundmark_parser::Flavor;

    #[test]
    fn parse_respects_flavor() {
        init_logger();
        let gfm = ConfigBuilder::default().flavor(Flavor::Gfm).build();
        assert_eq!(render_html("~~x~~\n", None), "<p>~~x~~</p>\n");
        assert_eq!(render_html("~~x~~\n", Some(gfm)), "<p><del>x</del></p>\n");
    }

    #[test]
    fn roundtrip_is_identity() {
        init_logger();
        let input = "> - [ ] task\n>   more\n";
        assert_eq!(roundtrip(input, None).unwrap(), input);
    }
}
