use roundmark_parser::MarkdownToken;

use crate::linter::diagnostics::Diagnostic;

pub mod no_alt_text;
pub mod no_empty_links;
pub mod no_space_in_links;

pub trait Rule: Send + Sync {
    /// Short id, e.g. `MD039`.
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn check(&self, tokens: &[MarkdownToken], lines: &[&str]) -> Vec<Diagnostic>;
}

pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of the close token matching the open token at `open`.
pub(crate) fn matching_end(tokens: &[MarkdownToken], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate().skip(open) {
        if token.is_open() {
            depth += 1;
        } else if token.is_end() {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}
