//! Parser module containing block and inline parsers.

pub mod block_parser;
pub(crate) mod inline_parser;

pub use block_parser::{ReferenceDefinition, ReferenceRegistry};

use block_parser::BlockParser;
use inline_parser::InlineParser;

use crate::options::ParserOptions;
use crate::source::SourceText;
use crate::tokens::TokenStream;

/// Parse `input` into a token stream.
///
/// Block structure is parsed first, which also collects the reference
/// definitions; inline content is parsed once the registry is complete.
/// `registry` seeds the definitions and wins over document definitions
/// for the same label.
pub(crate) fn parse_document(
    input: &str,
    options: ParserOptions,
    registry: ReferenceRegistry,
) -> (TokenStream, ReferenceRegistry) {
    let source = SourceText::new(input);
    let block_output = BlockParser::new(registry).parse(&source);
    InlineParser::new(block_output, options).parse()
}
