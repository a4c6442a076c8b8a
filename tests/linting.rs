//! Integration tests for linting rules.
//!
//! Test files are stored in `tests/linting/*.md` and tested with direct
//! assertions and inline snapshots.

use roundmark::linter::{Diagnostic, apply_fixes, fix, lint};
use roundmark::{Config, ConfigBuilder};
use std::fs;
use std::path::Path;

fn read_fixture(filename: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("linting")
        .join(filename);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read {}", filename))
}

fn lint_file(filename: &str, config: &Config) -> Vec<Diagnostic> {
    let input = read_fixture(filename);
    let tokens = roundmark::parse(&input, Some(config.clone()));
    lint(&tokens, &input, config)
}

fn positions(diagnostics: &[Diagnostic], code: &str) -> Vec<(usize, usize)> {
    diagnostics
        .iter()
        .filter(|d| d.code == code)
        .map(|d| (d.location.line, d.location.column))
        .collect()
}

#[test]
fn test_spaces_in_links() {
    let diagnostics = lint_file("links.md", &Config::default());
    assert_eq!(positions(&diagnostics, "MD039"), vec![(3, 3), (5, 10)]);
    assert!(diagnostics[0].message.contains("[ padded link ]"));
}

#[test]
fn test_empty_links() {
    let diagnostics = lint_file("links.md", &Config::default());
    assert_eq!(positions(&diagnostics, "MD042"), vec![(8, 4), (8, 22)]);
}

#[test]
fn test_missing_alt_text() {
    let diagnostics = lint_file("images.md", &Config::default());
    assert_eq!(positions(&diagnostics, "MD045"), vec![(3, 1), (5, 3)]);
}

fn summary(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("{}:{} {}", d.location.line, d.location.column, d.code))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_fixture_diagnostics() {
    let config = Config::default();
    insta::assert_snapshot!(summary(&lint_file("links.md", &config)), @r"
    3:3 MD039
    5:10 MD039
    8:4 MD042
    8:22 MD042
    ");
    insta::assert_snapshot!(summary(&lint_file("images.md", &config)), @r"
    3:1 MD045
    5:3 MD045
    ");
}

#[test]
fn test_diagnostics_sorted_across_rules() {
    let diagnostics = lint_file("links.md", &Config::default());
    let locations: Vec<_> = diagnostics.iter().map(|d| d.location).collect();
    let mut sorted = locations.clone();
    sorted.sort();
    assert_eq!(locations, sorted);
}

#[test]
fn test_disable_by_id() {
    let config = ConfigBuilder::default().disable_rule("MD039").build();
    let diagnostics = lint_file("links.md", &config);
    assert!(positions(&diagnostics, "MD039").is_empty());
    assert_eq!(positions(&diagnostics, "MD042").len(), 2);
}

#[test]
fn test_fix_rewrites_only_link_text() {
    let input = read_fixture("links.md");
    let config = Config::default();
    let tokens = roundmark::parse(&input, Some(config.clone()));
    let diagnostics = lint(&tokens, &input, &config);

    let fixed = fix(&tokens, &diagnostics).unwrap();
    let expected = input
        .replace("[ padded link ]", "[padded link]")
        .replace("[ *styled* text ]", "[*styled* text]");
    similar_asserts::assert_eq!(fixed, expected);

    let relinted = lint(&roundmark::parse(&fixed, None), &fixed, &config);
    assert!(positions(&relinted, "MD039").is_empty());
}

#[test]
fn test_fixed_tokens_render_trimmed_html() {
    let input = "[ a ](b)\n";
    let config = Config::default();
    let tokens = roundmark::parse(input, Some(config.clone()));
    let diagnostics = lint(&tokens, input, &config);
    let fixed = apply_fixes(&tokens, &diagnostics);
    assert_eq!(
        roundmark::to_html(&fixed, config.parser_options()),
        "<p><a href=\"b\">a</a></p>\n"
    );
}
