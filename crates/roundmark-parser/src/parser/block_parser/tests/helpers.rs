use crate::options::ParserOptions;
use crate::rehydrate::rehydrate;
use crate::tokens::{MarkdownToken, TokenKind, TokenStream};
use crate::{Parser, init_logger};

pub(super) fn parse(input: &str) -> TokenStream {
    init_logger();
    Parser::new(ParserOptions::gfm()).parse(input)
}

/// Token names in stream order, `end-` prefixed for close tokens.
pub(super) fn names(tokens: &[MarkdownToken]) -> Vec<String> {
    tokens
        .iter()
        .map(|token| {
            if token.is_end() {
                format!("end-{}", token.name())
            } else {
                token.name().to_string()
            }
        })
        .collect()
}

pub(super) fn find<'a>(
    tokens: &'a [MarkdownToken],
    pred: impl Fn(&TokenKind) -> bool,
) -> Vec<&'a MarkdownToken> {
    tokens.iter().filter(|token| pred(&token.kind)).collect()
}

pub(super) fn texts(tokens: &[MarkdownToken]) -> Vec<String> {
    tokens
        .iter()
        .filter_map(|token| match &token.kind {
            TokenKind::Text(text) => Some(text.text.clone()),
            _ => None,
        })
        .collect()
}

pub(super) fn assert_roundtrip(input: &str) {
    let tokens = parse(input);
    let output = rehydrate(&tokens)
        .unwrap_or_else(|err| panic!("rehydrate failed for {input:?}: {err}"));
    similar_asserts::assert_eq!(output, input);
}
