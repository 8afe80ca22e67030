//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::Path;
use std::process::Output;
use std::sync::Arc;

use tracing::debug;

use crate::infrastructure::{InfraError, InfraResult};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command with arguments.
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output>;

    /// Run a command with arguments, feeding `stdin` and capturing output.
    fn run_with_stdin(&self, cmd: &str, args: &[&str], stdin: &str) -> io::Result<Output>;
}

/// Graph layout backend: turns DOT source into a PNG file.
pub trait GraphRenderer: Send + Sync {
    /// Lay out `dot` and write the raster image to `output`.
    fn render_png(&self, dot: &str, output: &Path) -> InfraResult<()>;

    /// Short description of the backend and its version.
    fn version(&self) -> InfraResult<String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        std::process::Command::new(cmd).args(args).output()
    }

    fn run_with_stdin(&self, cmd: &str, args: &[&str], stdin: &str) -> io::Result<Output> {
        use std::io::Write;
        use std::process::Stdio;

        let mut child = std::process::Command::new(cmd)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // The pipe closes at the end of this block, before waiting.
        let written = match child.stdin.take() {
            Some(mut child_stdin) => child_stdin.write_all(stdin.as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output()?;
        match written {
            // a program that exits early fails with its own status and stderr
            Err(e) if output.status.success() => Err(e),
            _ => Ok(output),
        }
    }
}

/// Layout via the Graphviz `dot` program.
pub struct GraphvizRenderer {
    cmd: Arc<dyn CommandRunner>,
    program: String,
}

impl GraphvizRenderer {
    pub fn new(cmd: Arc<dyn CommandRunner>, program: impl Into<String>) -> Self {
        Self {
            cmd,
            program: program.into(),
        }
    }
}

impl GraphRenderer for GraphvizRenderer {
    fn render_png(&self, dot: &str, output: &Path) -> InfraResult<()> {
        let out = output.to_string_lossy();
        let args = ["-Tpng", "-o", out.as_ref()];
        debug!("render_png: {} {}", self.program, args.join(" "));

        let result = self
            .cmd
            .run_with_stdin(&self.program, &args, dot)
            .map_err(|e| InfraError::io(format!("run {}", self.program), e))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(InfraError::Graphviz {
                message: stderr.trim().to_string(),
                exit_code: result.status.code(),
            });
        }

        if !output.is_file() {
            return Err(InfraError::Graphviz {
                message: format!("{} produced no image at {}", self.program, output.display()),
                exit_code: result.status.code(),
            });
        }

        Ok(())
    }

    fn version(&self) -> InfraResult<String> {
        let result = self
            .cmd
            .run(&self.program, &["-V"])
            .map_err(|e| InfraError::io(format!("run {}", self.program), e))?;

        if !result.status.success() {
            return Err(InfraError::Graphviz {
                message: String::from_utf8_lossy(&result.stderr).trim().to_string(),
                exit_code: result.status.code(),
            });
        }

        // dot prints its version banner on stderr
        let banner = if result.stderr.is_empty() {
            &result.stdout
        } else {
            &result.stderr
        };
        Ok(String::from_utf8_lossy(banner).trim().to_string())
    }
}
