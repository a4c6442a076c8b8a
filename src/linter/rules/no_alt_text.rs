use roundmark_parser::{MarkdownToken, TokenKind};

use crate::linter::diagnostics::{Diagnostic, Location};
use crate::linter::rules::Rule;

pub struct NoAltTextRule;

impl Rule for NoAltTextRule {
    fn id(&self) -> &str {
        "MD045"
    }

    fn name(&self) -> &str {
        "no-alt-text"
    }

    fn check(&self, tokens: &[MarkdownToken], _lines: &[&str]) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for token in tokens {
            if let TokenKind::Image(image) = &token.kind
                && image.alt.trim().is_empty()
            {
                diagnostics.push(Diagnostic::warning(
                    Location::from_token(token),
                    self.id(),
                    "Images should have alternate text (alt text)",
                ));
            }
        }
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundmark_parser::Parser;

    fn lint(input: &str) -> Vec<Diagnostic> {
        let tokens = Parser::default().parse(input);
        NoAltTextRule.check(&tokens, &input.lines().collect::<Vec<_>>())
    }

    #[test]
    fn test_missing_alt() {
        let diagnostics = lint("text\n\n![](cat.png)\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location, Location { line: 3, column: 1 });
    }

    #[test]
    fn test_alt_from_nested_markup() {
        assert!(lint("![*a cat*](cat.png)\n").is_empty());
        assert_eq!(lint("![ ](cat.png)\n").len(), 1);
    }
}
