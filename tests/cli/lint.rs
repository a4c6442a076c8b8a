//! Lint subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_lint_clean_file() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("test.md");
    fs::write(&test_file, "# Heading\n\n[link](https://example.com)\n").unwrap();

    cargo_bin_cmd!("roundmark")
        .args(["lint", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_lint_with_violations() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("test.md");
    fs::write(&test_file, "Text\n\n![](cat.png) [ a ](b)\n").unwrap();

    let file = test_file.to_str().unwrap();
    cargo_bin_cmd!("roundmark")
        .args(["lint", file])
        .assert()
        .failure()
        .stdout(predicate::str::contains(format!("{file}:3:1: MD045")))
        .stdout(predicate::str::contains(format!("{file}:3:14: MD039")))
        .stderr(predicate::str::contains("Found 2 issue(s)"));
}

#[test]
fn test_lint_disabled_rule() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(".roundmark.toml"),
        "[lint]\ndisable = [\"no-alt-text\"]\n",
    )
    .unwrap();
    let test_file = temp_dir.path().join("test.md");
    fs::write(&test_file, "![](cat.png)\n").unwrap();

    cargo_bin_cmd!("roundmark")
        .args(["lint", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_lint_fix_mode() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("test.md");
    fs::write(&test_file, "> see [ the docs ](https://example.com)\n").unwrap();

    cargo_bin_cmd!("roundmark")
        .args(["lint", "--fix", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixed 1 issue(s)"));

    let content = fs::read_to_string(&test_file).unwrap();
    assert_eq!(content, "> see [the docs](https://example.com)\n");
}

#[test]
fn test_lint_fix_stdin() {
    cargo_bin_cmd!("roundmark")
        .args(["lint", "--fix"])
        .write_stdin("[ x ](y)\n")
        .assert()
        .success()
        .stdout("[x](y)\n");
}
