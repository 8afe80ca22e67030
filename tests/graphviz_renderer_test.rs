//! Tests for GraphvizRenderer against a mock command runner

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use astviz::infrastructure::traits::{CommandRunner, GraphRenderer, GraphvizRenderer};
use astviz::infrastructure::InfraError;

#[derive(Clone, Copy)]
enum Behavior {
    /// Exit 0 and create the `-o` file
    Succeed,
    /// Exit 0 without creating anything
    SucceedSilently,
    /// Exit 1 with a message on stderr
    Fail,
    /// The program cannot be spawned
    Missing,
}

struct MockCommandRunner {
    behavior: Behavior,
    calls: Mutex<Vec<(String, Vec<String>, String)>>,
}

impl MockCommandRunner {
    fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, Vec<String>, String)> {
        self.calls.lock().unwrap().clone()
    }

    fn output(&self, args: &[&str]) -> io::Result<Output> {
        match self.behavior {
            Behavior::Missing => Err(io::Error::new(io::ErrorKind::NotFound, "no such file")),
            Behavior::Fail => Ok(Output {
                status: ExitStatus::from_raw(1 << 8),
                stdout: vec![],
                stderr: b"Error: <stdin>: syntax error in line 2\n".to_vec(),
            }),
            Behavior::Succeed | Behavior::SucceedSilently => {
                if matches!(self.behavior, Behavior::Succeed) {
                    if let Some(pos) = args.iter().position(|a| *a == "-o") {
                        std::fs::write(args[pos + 1], b"png")?;
                    }
                }
                Ok(Output {
                    status: ExitStatus::from_raw(0),
                    stdout: vec![],
                    stderr: b"dot - graphviz version 9.0.0 (0)\n".to_vec(),
                })
            }
        }
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        self.calls.lock().unwrap().push((
            cmd.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
            String::new(),
        ));
        self.output(args)
    }

    fn run_with_stdin(&self, cmd: &str, args: &[&str], stdin: &str) -> io::Result<Output> {
        self.calls.lock().unwrap().push((
            cmd.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
            stdin.to_string(),
        ));
        self.output(args)
    }
}

fn renderer(behavior: Behavior) -> (Arc<MockCommandRunner>, GraphvizRenderer) {
    let cmd = Arc::new(MockCommandRunner::new(behavior));
    let renderer = GraphvizRenderer::new(cmd.clone(), "dot");
    (cmd, renderer)
}

#[test]
fn given_working_backend_when_rendering_then_pipes_dot_to_program() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("g.png");
    let (cmd, renderer) = renderer(Behavior::Succeed);

    // Act
    renderer.render_png("digraph g {}\n", &out).unwrap();

    // Assert
    let calls = cmd.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "dot");
    assert_eq!(
        calls[0].1,
        vec!["-Tpng".to_string(), "-o".to_string(), out.display().to_string()]
    );
    assert_eq!(calls[0].2, "digraph g {}\n");
    assert!(out.is_file());
}

#[test]
fn given_failing_backend_when_rendering_then_graphviz_error_with_stderr() {
    let temp = TempDir::new().unwrap();
    let (_, renderer) = renderer(Behavior::Fail);

    let err = renderer
        .render_png("digraph {", &temp.path().join("g.png"))
        .unwrap_err();

    match err {
        InfraError::Graphviz { message, exit_code } => {
            assert!(message.contains("syntax error"), "{message}");
            assert_eq!(exit_code, Some(1));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn given_missing_program_when_rendering_then_io_error() {
    let (_, renderer) = renderer(Behavior::Missing);

    let err = renderer
        .render_png("digraph g {}", Path::new("/tmp/never.png"))
        .unwrap_err();

    assert!(matches!(err, InfraError::Io { .. }));
}

#[test]
fn given_backend_without_output_when_rendering_then_error() {
    let temp = TempDir::new().unwrap();
    let (_, renderer) = renderer(Behavior::SucceedSilently);

    let err = renderer
        .render_png("digraph g {}", &temp.path().join("g.png"))
        .unwrap_err();

    match err {
        InfraError::Graphviz { message, .. } => assert!(message.contains("produced no image")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn given_backend_when_querying_version_then_reads_stderr_banner() {
    let (cmd, renderer) = renderer(Behavior::SucceedSilently);

    let version = renderer.version().unwrap();

    assert_eq!(version, "dot - graphviz version 9.0.0 (0)");
    assert_eq!(cmd.calls()[0].1, vec!["-V".to_string()]);
}
