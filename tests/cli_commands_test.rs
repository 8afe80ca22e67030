//! Command dispatch tests: exit codes of the commands with mocked dependencies

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{Rgb, RgbImage};
use rstest::rstest;
use tempfile::TempDir;

use astviz::cli::args::ConfigCommands;
use astviz::cli::commands::execute_with;
use astviz::cli::Commands;
use astviz::config::Settings;
use astviz::domain::Section;
use astviz::exitcode;
use astviz::infrastructure::di::ServiceContainer;
use astviz::infrastructure::traits::{GraphRenderer, RealFileSystem};
use astviz::infrastructure::{InfraError, InfraResult};

/// Writes a 4x4 image, or fails like a missing `dot` binary.
struct StubRenderer {
    available: bool,
}

impl GraphRenderer for StubRenderer {
    fn render_png(&self, _dot: &str, output: &Path) -> InfraResult<()> {
        if !self.available {
            return Err(InfraError::io(
                "run dot",
                io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            ));
        }
        RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]))
            .save(output)
            .map_err(|e| InfraError::Graphviz {
                message: e.to_string(),
                exit_code: None,
            })
    }

    fn version(&self) -> InfraResult<String> {
        if self.available {
            Ok("stub 1.0".into())
        } else {
            Err(InfraError::Graphviz {
                message: "not installed".into(),
                exit_code: None,
            })
        }
    }
}

fn container(available: bool) -> ServiceContainer {
    ServiceContainer::with_deps(
        Settings::default(),
        Arc::new(RealFileSystem),
        Arc::new(StubRenderer { available }),
    )
}

fn write_dump(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("output.txt");
    std::fs::write(&path, content).expect("write dump");
    path
}

const DUMP: &str = "Original AST:\nProgram\n  Decl\nOptimized AST:\nProgram\n  Decl\n  Call\n";

#[test]
fn given_valid_dump_when_comparing_then_succeeds_and_writes_images() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let input = write_dump(&temp, DUMP);
    let out = temp.path().join("renders");
    let command = Commands::Compare {
        input,
        output_dir: Some(out.clone()),
        fixed_names: true,
    };

    // Act
    let result = execute_with(&container(true), &command, temp.path());

    // Assert
    assert!(result.is_ok(), "{result:?}");
    assert!(out.join("ast_comparison.png").is_file());
}

#[test]
fn given_missing_backend_when_comparing_then_unavailable_exit_code() {
    let temp = TempDir::new().unwrap();
    let input = write_dump(&temp, DUMP);
    let command = Commands::Compare {
        input,
        output_dir: Some(temp.path().to_path_buf()),
        fixed_names: true,
    };

    let err = execute_with(&container(false), &command, temp.path()).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::UNAVAILABLE);
    assert!(!temp.path().join("ast_comparison.png").exists());
}

#[rstest]
#[case::missing_marker("Original AST:\nProgram\n", exitcode::DATAERR)]
#[case::forest("Original AST:\nA\nB\nOptimized AST:\nA\n", exitcode::DATAERR)]
#[case::valid(DUMP, exitcode::OK)]
fn given_dump_when_diffing_then_exit_code_reflects_input(
    #[case] content: &str,
    #[case] expected: i32,
) {
    let temp = TempDir::new().unwrap();
    let input = write_dump(&temp, content);

    let result = execute_with(&container(true), &Commands::Diff { input }, temp.path());

    let code = result.map(|_| exitcode::OK).unwrap_or_else(|e| e.exit_code());
    assert_eq!(code, expected);
}

#[test]
fn given_missing_input_when_printing_dot_then_noinput_exit_code() {
    let temp = TempDir::new().unwrap();
    let command = Commands::Dot {
        input: temp.path().join("absent.txt"),
        section: Section::Optimized,
    };

    let err = execute_with(&container(true), &command, temp.path()).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}

#[test]
fn given_output_dir_below_a_file_when_comparing_then_cantcreat_exit_code() {
    let temp = TempDir::new().unwrap();
    let input = write_dump(&temp, DUMP);
    let command = Commands::Compare {
        output_dir: Some(input.join("renders")),
        input,
        fixed_names: true,
    };

    let err = execute_with(&container(true), &command, temp.path()).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::CANTCREAT);
}

#[test]
fn given_unavailable_backend_when_showing_info_then_still_succeeds() {
    let temp = TempDir::new().unwrap();

    let result = execute_with(&container(false), &Commands::Info, temp.path());

    assert!(result.is_ok());
}

#[test]
fn given_config_template_command_when_executed_then_succeeds() {
    let temp = TempDir::new().unwrap();
    let command = Commands::Config {
        command: ConfigCommands::Template,
    };

    assert!(execute_with(&container(true), &command, temp.path()).is_ok());
}
