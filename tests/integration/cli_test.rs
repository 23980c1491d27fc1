//! Integration tests for the csv-enclose binary

use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::tempdir;

const BIN: &str = env!("CARGO_BIN_EXE_csv-enclose");

/// Helper: run the binary with `args`, feeding `stdin`, returning (code, stdout, stderr)
fn run(args: &[&str], stdin: &str) -> (i32, String, String) {
    let mut child = Command::new(BIN)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn csv-enclose");
    // The binary may exit before reading stdin; a broken pipe is fine here
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    let output = child.wait_with_output().unwrap();
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8(output.stdout).unwrap(),
        String::from_utf8(output.stderr).unwrap(),
    )
}

/// Test that stdin records are enclosed on stdout.
#[test]
fn test_stdin_to_stdout() {
    let input = "[1999, \"Chevy\", \"Venture \\\"Extended Edition\\\"\", null, \"4900.00\"]\n";
    let (code, stdout, _) = run(&["--delimiter", "|", "--sequence", "\\t\\x1f"], input);
    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "\"1999\"|\"Chevy\"|\"Venture \"\"Extended Edition\"\"\"|\"\"|\"4900.00\"\n"
    );
}

/// Test that --no-enclose falls back to minimal quoting.
#[test]
fn test_no_enclose() {
    let (code, stdout, _) = run(&["--no-enclose"], "[\"a\", \"b,c\"]\n");
    assert_eq!(code, 0);
    assert_eq!(stdout, "a,\"b,c\"\n");
}

/// Test file input/output with a configuration file.
#[test]
fn test_files_and_config() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("records.jsonl");
    let output = dir.path().join("records.csv");
    let config = dir.path().join("config.json");
    fs::write(&input, "[\"Year\", \"Make\"]\n[1997, \"Ford\"]\n").unwrap();
    fs::write(&config, r#"{"delimiter": ";", "terminator": "crlf"}"#).unwrap();

    let (code, _, _) = run(
        &[
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ],
        "",
    );
    assert_eq!(code, 0);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "\"Year\";\"Make\"\r\n\"1997\";\"Ford\"\r\n"
    );
}

/// Test that a colliding sequence is a configuration error.
#[test]
fn test_colliding_sequence_exit_code() {
    let (code, stdout, stderr) = run(&["--sequence", ",\\t"], "[\"a\"]\n");
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("collides with the dialect delimiter"));
}

/// Test that conflicting flags are rejected before any work.
#[test]
fn test_conflicting_flags() {
    let (code, _, stderr) = run(&["--no-enclose", "--sequence", "\\t\\x1f"], "");
    assert_eq!(code, 1);
    assert!(stderr.contains("--sequence cannot be used with --no-enclose"));
}

/// Test that a malformed record reports its line.
#[test]
fn test_bad_record_reports_line() {
    let (code, _, stderr) = run(&[], "[\"ok\"]\n{\"not\": \"array\"}\n");
    assert_eq!(code, 1);
    assert!(stderr.contains("Line 2"));
}

/// Test that data holding a placeholder byte is rejected instead of split.
#[test]
fn test_placeholder_byte_in_data_is_rejected() {
    let (code, stdout, stderr) = run(&[], "[\"a\\tb\", \"c\"]\n");
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Line 1: field 1 contains placeholder byte '\\t'"));

    // Without forced enclosure a tab is ordinary data
    let (code, stdout, _) = run(&["--no-enclose"], "[\"a\\tb\", \"c\"]\n");
    assert_eq!(code, 0);
    assert_eq!(stdout, "a\tb,c\n");
}

/// Test that a missing input file is an I/O error.
#[test]
fn test_missing_input_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.jsonl");
    let (code, _, _) = run(&["--input", missing.to_str().unwrap()], "");
    assert_eq!(code, 3);
}
