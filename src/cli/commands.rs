//! Command dispatch and implementations

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use colored::Colorize;
use tracing::{debug, instrument};

use crate::application::display::TreeNodeConvert;
use crate::application::services::{ArtifactNaming, ComparisonReport};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{NodeStatus, Section};
use crate::infrastructure::di::ServiceContainer;

/// Execute the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let command = cli
        .command
        .as_ref()
        .ok_or_else(|| CliError::Usage("no command given, see --help".into()))?;

    if let Commands::Completion { shell } = command {
        clap_complete::generate(*shell, &mut Cli::command(), "astviz", &mut io::stdout());
        return Ok(());
    }

    let local_dir = local_dir(cli)?;
    let settings = Settings::load(Some(&local_dir))?;
    debug!("settings: {:?}", settings);

    let container = ServiceContainer::new(settings);
    execute_with(&container, command, &local_dir)
}

/// Execute a command against an already wired container.
pub fn execute_with(
    container: &ServiceContainer,
    command: &Commands,
    local_dir: &Path,
) -> CliResult<()> {
    match command {
        Commands::Compare {
            input,
            output_dir,
            fixed_names,
        } => cmd_compare(container, input, output_dir.as_deref(), *fixed_names),
        Commands::Diff { input } => cmd_diff(container, input),
        Commands::Tree {
            input,
            section,
            plain,
        } => cmd_tree(container, input, *section, *plain),
        Commands::Dot { input, section } => cmd_dot(container, input, *section),
        Commands::Config { command } => cmd_config(container, command, local_dir),
        Commands::Info => cmd_info(container, local_dir),
        Commands::Completion { .. } => Err(CliError::Usage(
            "completion is handled before settings are loaded".into(),
        )),
    }
}

fn local_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.config_dir {
        Some(dir) if !dir.is_dir() => Err(CliError::InvalidArgs(format!(
            "not a directory: {}",
            dir.display()
        ))),
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(crate::infrastructure::InfraError::io("current dir", e))),
    }
}

#[instrument(skip(container))]
fn cmd_compare(
    container: &ServiceContainer,
    input: &Path,
    output_dir: Option<&Path>,
    fixed_names: bool,
) -> CliResult<()> {
    let settings = &container.settings;
    let output_dir = output_dir.unwrap_or(&settings.output_dir);
    let naming = if fixed_names || settings.fixed_names {
        ArtifactNaming::Fixed
    } else {
        ArtifactNaming::generate()
    };

    let report = container
        .comparison_service()
        .compare(input, output_dir, &naming)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &ComparisonReport) {
    if let Some(run_id) = &report.run_id {
        output::action("Run", run_id);
    }
    output::action("Original", &report.artifacts.original.display());
    output::action("Optimized", &report.artifacts.optimized.display());
    output::success(&format!(
        "AST comparison image saved as: {}",
        report.artifacts.comparison.display()
    ));
    output::detail(&format!(
        "{} of {} optimized nodes highlighted (original: {} nodes)",
        report.changed_nodes, report.optimized_nodes, report.original_nodes
    ));
    print_label_changes(&report.added, &report.removed);
}

fn print_label_changes(added: &[String], removed: &[String]) {
    output::header("Added labels (highlighted)");
    if added.is_empty() {
        output::detail("none");
    }
    for label in added {
        output::diff_add(label);
    }

    output::header("Removed labels (not visible in images)");
    if removed.is_empty() {
        output::detail("none");
    }
    for label in removed {
        output::diff_remove(label);
    }
}

#[instrument(skip(container))]
fn cmd_diff(container: &ServiceContainer, input: &Path) -> CliResult<()> {
    let analysis = container.comparison_service().analyze_file(input)?;
    print_label_changes(&analysis.added, &analysis.removed);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, input: &Path, section: Section, plain: bool) -> CliResult<()> {
    let analysis = container.comparison_service().analyze_file(input)?;
    let tree = analysis.tree(section);

    if plain {
        print!("{}", tree.to_indented(&container.settings.indent_unit));
        return Ok(());
    }

    let printable = tree.to_tree_string(analysis.coloring(section), |label, status| match status {
        NodeStatus::Changed => format!("{} {}", label.green().bold(), "+".green()),
        NodeStatus::Unchanged => label.to_string(),
    });
    output::info(&printable);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_dot(container: &ServiceContainer, input: &Path, section: Section) -> CliResult<()> {
    let analysis = container.comparison_service().analyze_file(input)?;
    print!("{}", analysis.graph(section));
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    local_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Path => print_config_paths(local_dir),
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

fn print_config_paths(local_dir: &Path) {
    let describe = |path: &Path| {
        if path.exists() {
            format!("{} {}", path.display(), "(exists)".green())
        } else {
            format!("{} {}", path.display(), "(not found)".dimmed())
        }
    };

    match global_config_path() {
        Some(path) => output::action("Global", &describe(&path)),
        None => output::warning("no global config directory on this platform"),
    }
    output::action("Local", &describe(&local_config_path(local_dir)));
}

fn cmd_info(container: &ServiceContainer, local_dir: &Path) -> CliResult<()> {
    output::header(&format!("astviz {}", env!("CARGO_PKG_VERSION")));
    print_config_paths(local_dir);
    output::action("Output", &container.settings.output_dir.display());

    match container.renderer.version() {
        Ok(version) => output::success(&format!("layout backend: {version}")),
        Err(e) => output::warning(&format!(
            "layout backend '{}' unavailable: {}",
            container.settings.dot_program, e
        )),
    }
    Ok(())
}
