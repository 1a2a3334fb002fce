//! Integration tests for the `conrad` binary.
//!
//! These run the compiled CLI and check what reaches stdout, so they cover
//! the default formatter and emitter end to end.
//!
//! Run with: cargo test -p conrad --test cli_tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn conrad_cmd() -> Command {
    let mut cmd = Command::cargo_bin("conrad").unwrap();
    cmd.env_remove("CONRAD_CONFIG").env("RUST_LOG", "warn");
    cmd
}

// ============================================================================
// record
// ============================================================================

#[test]
fn test_record_defaults_to_json_lines_on_stdout() {
    conrad_cmd()
        .args(["record", "-"])
        .write_stdin("a: apple\n")
        .assert()
        .success()
        .stdout("{\"a\":\"apple\"}\n");
}

#[test]
fn test_record_reads_json_lines() {
    conrad_cmd()
        .arg("record")
        .write_stdin("{\"a\": 1}\n{\"b\": 2}\n")
        .assert()
        .success()
        .stdout("{\"a\":1}\n{\"b\":2}\n");
}

#[test]
fn test_record_with_processor_flag() {
    conrad_cmd()
        .args(["record", "-", "--processor", "add_uuid"])
        .write_stdin("a: apple\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{\"a\":\"apple\",\"event_uuid\":\""))
        .stdout(predicate::str::ends_with("\"}\n"));
}

#[test]
fn test_record_with_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("conrad.yaml");
    let output = dir.path().join("audit.log");
    fs::write(
        &config,
        format!(
            "formatter: json\nemitter:\n  type: file\n  path: {}\n",
            output.display()
        ),
    )
    .unwrap();

    conrad_cmd()
        .args(["record", "-", "--config"])
        .arg(&config)
        .write_stdin("- a: apple\n- b: bear\n")
        .assert()
        .success()
        .stdout("");

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "{\"a\":\"apple\"}\n{\"b\":\"bear\"}\n"
    );
}

#[test]
fn test_record_keeps_going_after_a_bad_event() {
    conrad_cmd()
        .args(["record", "-"])
        .write_stdin("a: apple\n---\n1: one\n---\nb: bear\n")
        .assert()
        .failure()
        .stdout("{\"a\":\"apple\"}\n{\"b\":\"bear\"}\n")
        .stderr(predicate::str::contains("1 of 3 events could not be recorded"));
}

#[test]
fn test_record_rejects_unknown_emitter() {
    conrad_cmd()
        .args(["record", "-", "--emitter", "pigeon"])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("pigeon"));
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_default_configuration() {
    conrad_cmd()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ configuration is valid"))
        .stdout(predicate::str::contains("Emitters: discard, file, stderr, stdout"));
}

#[test]
fn test_check_unknown_formatter() {
    conrad_cmd()
        .args(["check", "--formatter", "xml"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗"))
        .stdout(predicate::str::contains("xml"));
}
