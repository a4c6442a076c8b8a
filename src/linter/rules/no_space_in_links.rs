use roundmark_parser::tokens::{LinkToken, TextToken};
use roundmark_parser::{MarkdownToken, TokenKind};

use crate::linter::diagnostics::{Diagnostic, Fix, Location, Replacement};
use crate::linter::rules::{Rule, matching_end};

const SPACES: [char; 2] = [' ', '\t'];

pub struct NoSpaceInLinksRule;

impl Rule for NoSpaceInLinksRule {
    fn id(&self) -> &str {
        "MD039"
    }

    fn name(&self) -> &str {
        "no-space-in-links"
    }

    fn check(&self, tokens: &[MarkdownToken], _lines: &[&str]) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for (idx, token) in tokens.iter().enumerate() {
            let TokenKind::Link(link) = &token.kind else {
                continue;
            };
            let text = link.text_from_blocks.as_str();
            let trimmed = text.trim_matches(SPACES);
            // Whitespace-only text is an empty link, not a spacing problem.
            if trimmed.is_empty() || trimmed.len() == text.len() {
                continue;
            }

            let diagnostic = Diagnostic::warning(
                Location::from_token(token),
                self.id(),
                format!("Spaces inside link text [{}]", text),
            );
            diagnostics.push(match create_fix(tokens, idx, link, trimmed) {
                Some(fix) => diagnostic.with_fix(fix),
                None => diagnostic,
            });
        }

        diagnostics
    }
}

fn trim_text(token: &MarkdownToken, start: bool, end: bool) -> Option<MarkdownToken> {
    let TokenKind::Text(text) = &token.kind else {
        return None;
    };
    let trim = |s: &str| {
        let s = if start { s.trim_start_matches(SPACES) } else { s };
        let s = if end { s.trim_end_matches(SPACES) } else { s };
        s.to_string()
    };
    let trimmed = TextToken {
        raw: trim(&text.raw),
        text: trim(&text.text),
    };
    if &trimmed == text {
        return None;
    }
    Some(MarkdownToken::new(
        TokenKind::Text(trimmed),
        token.line,
        token.column,
    ))
}

fn create_fix(
    tokens: &[MarkdownToken],
    idx: usize,
    link: &LinkToken,
    trimmed: &str,
) -> Option<Fix> {
    let end = matching_end(tokens, idx)?;
    let mut link = link.clone();
    link.text_from_blocks = trimmed.to_string();
    let mut replacements = vec![Replacement {
        index: idx,
        token: MarkdownToken::new(TokenKind::Link(link), tokens[idx].line, tokens[idx].column),
    }];

    let first = idx + 1;
    let last = end - 1;
    if first <= last {
        if first == last {
            replacements.extend(trim_text(&tokens[first], true, true).map(|token| Replacement {
                index: first,
                token,
            }));
        } else {
            replacements.extend(trim_text(&tokens[first], true, false).map(|token| Replacement {
                index: first,
                token,
            }));
            replacements.extend(trim_text(&tokens[last], false, true).map(|token| Replacement {
                index: last,
                token,
            }));
        }
    }

    Some(Fix {
        message: "Remove spaces inside link text".to_string(),
        replacements,
    })
}
