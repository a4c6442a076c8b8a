//! Lossless CommonMark and GitHub Flavored Markdown parser.
//!
//! [`Parser::parse`] turns a document into a flat [`TokenStream`] and
//! [`rehydrate`] writes a token stream back to text. For any input,
//! `rehydrate(&parse(s))` returns `s` byte for byte.
//!
//! ```rust
//! use roundmark_parser::{Parser, ParserOptions, rehydrate};
//!
//! let input = "> 1. + list\n>      item\n";
//! let tokens = Parser::new(ParserOptions::gfm()).parse(input);
//! assert_eq!(rehydrate(&tokens).unwrap(), input);
//! ```

pub mod error;
pub mod options;
pub mod parser;
pub mod rehydrate;
pub mod source;
pub mod tokens;
mod utils;

pub use error::{StructureError, StructureErrorKind};
pub use options::{Flavor, ParserOptions};
pub use parser::{ReferenceDefinition, ReferenceRegistry};
pub use rehydrate::rehydrate;
pub use source::LineEnding;
pub use tokens::{
    AutolinkKind, EndKind, Indent, LabelType, LinkProperties, MarkdownToken, TokenKind,
    TokenStream, render_tokens,
};
pub use utils::normalize_label;

#[cfg(test)]
fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A configured parser. Options are fixed for the life of the parser.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParserOptions,
    references: ReferenceRegistry,
}

impl Parser {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            references: ReferenceRegistry::new(),
        }
    }

    /// Seed every parse with pre-supplied reference definitions.
    pub fn with_references(mut self, references: ReferenceRegistry) -> Self {
        self.references = references;
        self
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn parse(&self, input: &str) -> TokenStream {
        self.parse_with_registry(input).0
    }

    /// Parse and also return the reference registry the document was
    /// resolved against.
    pub fn parse_with_registry(&self, input: &str) -> (TokenStream, ReferenceRegistry) {
        parser::parse_document(input, self.options, self.references.clone())
    }

    /// Parse and verify that the token stream is structurally sound by
    /// replaying it. A replay that differs from `input` is logged.
    pub fn parse_checked(&self, input: &str) -> Result<TokenStream, StructureError> {
        let tokens = self.parse(input);
        let rehydrated = rehydrate(&tokens)?;
        if rehydrated != input {
            log::warn!(
                "Rehydrated text differs from input ({} vs {} bytes)",
                rehydrated.len(),
                input.len()
            );
        }
        Ok(tokens)
    }
}

/// Parse `input` as CommonMark with no extensions.
pub fn parse(input: &str) -> TokenStream {
    Parser::default().parse(input)
}
