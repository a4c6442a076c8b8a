pub mod diagnostics;
pub mod fixer;
pub mod rules;
pub mod runner;

pub use diagnostics::{Diagnostic, Fix, Location, Replacement, Severity};
pub use fixer::apply_fixes;
pub use rules::{Rule, RuleRegistry};
pub use runner::LintRunner;

use roundmark_parser::{MarkdownToken, StructureError, rehydrate};

use crate::config::Config;

/// Lint a parsed document with the built-in rules.
pub fn lint(tokens: &[MarkdownToken], input: &str, config: &Config) -> Vec<Diagnostic> {
    let lines: Vec<&str> = input.lines().collect();
    let runner = LintRunner::new(default_registry());
    runner.run(tokens, &lines, config)
}

/// Apply every available fix and write the result back to text.
pub fn fix(tokens: &[MarkdownToken], diagnostics: &[Diagnostic]) -> Result<String, StructureError> {
    rehydrate(&apply_fixes(tokens, diagnostics))
}

/// Create the default rule registry with all built-in rules.
pub(crate) fn default_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    registry.register(Box::new(rules::no_space_in_links::NoSpaceInLinksRule));
    registry.register(Box::new(rules::no_empty_links::NoEmptyLinksRule));
    registry.register(Box::new(rules::no_alt_text::NoAltTextRule));
    registry
}
