use roundmark_parser::{MarkdownToken, TokenKind};

use crate::linter::diagnostics::{Diagnostic, Location};
use crate::linter::rules::Rule;

pub struct NoEmptyLinksRule;

impl Rule for NoEmptyLinksRule {
    fn id(&self) -> &str {
        "MD042"
    }

    fn name(&self) -> &str {
        "no-empty-links"
    }

    fn check(&self, tokens: &[MarkdownToken], _lines: &[&str]) -> Vec<Diagnostic> {
        tokens
            .iter()
            .filter(|token| match &token.kind {
                TokenKind::Link(link) => matches!(link.properties.uri.as_str(), "" | "#"),
                _ => false,
            })
            .map(|token| {
                Diagnostic::warning(Location::from_token(token), self.id(), "No empty links")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundmark_parser::Parser;

    fn lint(input: &str) -> Vec<Diagnostic> {
        let tokens = Parser::default().parse(input);
        NoEmptyLinksRule.check(&tokens, &input.lines().collect::<Vec<_>>())
    }

    #[test]
    fn test_empty_destinations() {
        let diagnostics = lint("[a]() and [b](#)\n");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].location, Location { line: 1, column: 11 });
    }

    #[test]
    fn test_fragment_and_reference_links_pass() {
        assert!(lint("[a](#top)\n\n[b]\n\n[b]: /url\n").is_empty());
    }
}
