use roundmark_parser::MarkdownToken;

use crate::config::Config;
use crate::linter::diagnostics::Diagnostic;
use crate::linter::rules::RuleRegistry;

pub struct LintRunner {
    registry: RuleRegistry,
}

impl LintRunner {
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn run(&self, tokens: &[MarkdownToken], lines: &[&str], config: &Config) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for rule in self.registry.rules() {
            if config.lint.is_disabled(rule.id(), rule.name()) {
                log::debug!("Skipping disabled lint rule: {}", rule.id());
                continue;
            }
            log::debug!("Running lint rule: {}", rule.name());
            let rule_diagnostics = rule.check(tokens, lines);
            log::debug!(
                "Rule {} found {} diagnostic(s)",
                rule.name(),
                rule_diagnostics.len()
            );
            diagnostics.extend(rule_diagnostics);
        }

        diagnostics.sort_by_key(|d| d.location);
        diagnostics
    }
}
