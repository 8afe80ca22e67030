//! astviz: render an original and an optimized AST dump side by side,
//! highlighting nodes whose labels are new after optimization.
//!
//! Layers, inner to outer:
//! - [`domain`]: indentation parser, label sets, change detection, DOT emission
//! - [`application`]: comparison service and image composition
//! - [`infrastructure`]: filesystem, process and layout backend adapters
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
