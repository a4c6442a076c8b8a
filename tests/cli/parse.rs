//! Parse subcommand tests

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_parse_stdin() {
    cargo_bin_cmd!("roundmark")
        .arg("parse")
        .write_stdin("# Heading\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[atx(1,1):"))
        .stdout(predicate::str::contains("[text(1,3):Heading]"))
        .stdout(predicate::str::contains("[end-document(1,1):"));
}

#[test]
fn test_parse_file() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("test.md");
    fs::write(&test_file, "> quote\n").unwrap();

    cargo_bin_cmd!("roundmark")
        .args(["parse", test_file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("[block-quote(1,1):"));
}

#[test]
fn test_parse_json() {
    let output = cargo_bin_cmd!("roundmark")
        .args(["parse", "--json"])
        .write_stdin("*a*\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let tokens: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tokens = tokens.as_array().unwrap();
    assert!(tokens.iter().any(|token| token["kind"].get("Emphasis").is_some()));
    assert_eq!(tokens[0]["line"], 1);
}

#[test]
fn test_parse_missing_file() {
    cargo_bin_cmd!("roundmark")
        .args(["parse", "does-not-exist.md"])
        .assert()
        .failure();
}
