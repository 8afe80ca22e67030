//! Tests for RealCommandRunner against real processes

#![cfg(unix)]

use astviz::infrastructure::traits::{CommandRunner, RealCommandRunner};

#[test]
fn given_program_reading_stdin_when_running_then_captures_stdout() {
    let output = RealCommandRunner
        .run_with_stdin("sh", &["-c", "cat"], "digraph g {}\n")
        .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "digraph g {}\n");
}

#[test]
fn given_program_exiting_before_reading_when_feeding_stdin_then_reports_its_failure() {
    // Arrange: larger than any pipe buffer, so the write hits a closed pipe
    let input = "x".repeat(4 * 1024 * 1024);

    // Act
    let output = RealCommandRunner
        .run_with_stdin("sh", &["-c", "echo 'Error: bad input' >&2; exit 3"], &input)
        .expect("the program's own failure, not the broken pipe");

    // Assert
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error: bad input"));
}

#[test]
fn given_missing_program_when_running_then_spawn_error() {
    let err = RealCommandRunner
        .run_with_stdin("astviz-no-such-program", &[], "")
        .unwrap_err();

    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}
