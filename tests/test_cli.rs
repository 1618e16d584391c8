//! Tests for CLI argument parsing and the binary's error behavior.

use assert_cmd::Command;
use clap::Parser;
use predicates::prelude::*;
use std::path::PathBuf;
use yw_novx::cli::Cli;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["yw-novx", "book.yw7"]);
    assert_eq!(cli.source, PathBuf::from("book.yw7"));
    assert_eq!(cli.suffix, "", "Default suffix should be empty");
    assert!(!cli.quiet, "Default quiet should be false");
}

#[test]
fn test_cli_suffix_option() {
    let cli = Cli::parse_from(["yw-novx", "-s", "_bak", "book.yw7"]);
    assert_eq!(cli.suffix, "_bak");
    assert_eq!(cli.target_path().unwrap(), PathBuf::from("book_bak.novx"));
}

#[test]
fn test_cli_target_path_derivation() {
    let cli = Cli::parse_from(["yw-novx", "/path/to/book.novx"]);
    assert_eq!(
        cli.target_path().unwrap(),
        PathBuf::from("/path/to/book.yw7")
    );
}

#[test]
fn test_cli_requires_source() {
    let result = Cli::try_parse_from(["yw-novx"]);
    assert!(result.is_err(), "Missing source must be a usage error");
}

#[test]
fn test_binary_without_arguments_prints_usage() {
    Command::cargo_bin("yw-novx")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_binary_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("yw-novx")
        .unwrap()
        .arg(dir.path().join("missing.yw7"))
        .arg("--quiet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn test_binary_converts_quietly() {
    let dir = tempfile::tempdir().unwrap();
    let source = common::write_file(dir.path(), "book.novx", common::sample_novx());
    Command::cargo_bin("yw-novx")
        .unwrap()
        .arg(&source)
        .arg("--quiet")
        .assert()
        .success();
    assert!(dir.path().join("book.yw7").is_file());
}
