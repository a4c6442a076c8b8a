//! Cross-cutting CLI tests (help, version, config handling)

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_help() {
    cargo_bin_cmd!("roundmark")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Roundmark parses CommonMark"));
}

#[test]
fn test_version() {
    cargo_bin_cmd!("roundmark")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_subcommand() {
    cargo_bin_cmd!("roundmark")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    cargo_bin_cmd!("roundmark")
        .arg("invalid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_lint_help_lists_rules() {
    cargo_bin_cmd!("roundmark")
        .args(["lint", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MD039"));
}

#[test]
fn test_explicit_config_selects_flavor() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("custom.toml");
    fs::write(&config, "flavor = \"gfm\"\n").unwrap();

    cargo_bin_cmd!("roundmark")
        .args(["html", "--config", config.to_str().unwrap()])
        .write_stdin("~~gone~~\n")
        .assert()
        .success()
        .stdout("<p><del>gone</del></p>\n");
}

#[test]
fn test_discovered_config_applies_to_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("roundmark.toml"), "flavor = \"gfm\"\n").unwrap();
    let test_file = temp_dir.path().join("doc.md");
    fs::write(&test_file, "- [x] done\n").unwrap();

    cargo_bin_cmd!("roundmark")
        .args(["html", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("checked=\"\""));
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("bad.toml");
    fs::write(&config, "flavor = 3\n").unwrap();

    cargo_bin_cmd!("roundmark")
        .args(["parse", "--config", config.to_str().unwrap()])
        .write_stdin("text\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}
