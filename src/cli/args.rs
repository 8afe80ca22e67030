//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::Section;

/// Side-by-side, color-coded rendering of an original and an optimized AST dump
#[derive(Parser, Debug)]
#[command(name = "astviz")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output on stderr (repeat for more: -d -d -d)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Directory holding a local .astviz.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render both trees and the side-by-side comparison image
    Compare {
        /// AST dump with 'Original AST:' and 'Optimized AST:' sections
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Output directory (overrides config)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        output_dir: Option<PathBuf>,
        /// Use fixed artifact names without a run id
        #[arg(long)]
        fixed_names: bool,
    },

    /// List labels added and removed by the optimization
    Diff {
        /// AST dump
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
    },

    /// Print a parsed tree
    Tree {
        /// AST dump
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Which section to print
        #[arg(short, long, default_value = "optimized")]
        section: Section,
        /// Print normalized indentation text instead of a drawn tree
        #[arg(long)]
        plain: bool,
    },

    /// Print the Graphviz DOT source of a section
    Dot {
        /// AST dump
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Which section to emit
        #[arg(short, long, default_value = "optimized")]
        section: Section,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show settings locations and layout backend status
    Info,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
    /// Print a commented config template
    Template,
}
