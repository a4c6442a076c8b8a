//! Check subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_check_stdin() {
    cargo_bin_cmd!("roundmark")
        .arg("check")
        .write_stdin("> 1. + list\n>      item\n")
        .assert()
        .success();
}

#[test]
fn test_check_many_files() {
    let temp_dir = TempDir::new().unwrap();
    let inputs = [
        "# Title\r\n\r\nText\r\n",
        "- a\n\n\t- b\n",
        "```\ncode\n",
        "[link]( <x y> 'title' )\n\n[ref]:\n  /url\n",
    ];
    let mut args = vec!["check".to_string()];
    for (idx, input) in inputs.iter().enumerate() {
        let path = temp_dir.path().join(format!("doc{idx}.md"));
        fs::write(&path, input).unwrap();
        args.push(path.to_str().unwrap().to_string());
    }

    cargo_bin_cmd!("roundmark")
        .args(&args)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_check_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.md");

    cargo_bin_cmd!("roundmark")
        .args(["check", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.md"))
        .stderr(predicate::str::contains("failed the round trip check"));
}
