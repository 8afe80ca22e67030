//! Splitting an AST dump into its original and optimized sections

use std::fmt;
use std::str::FromStr;

use crate::domain::error::{DomainError, DomainResult};

pub const ORIGINAL_MARKER: &str = "Original AST:";
pub const OPTIMIZED_MARKER: &str = "Optimized AST:";

/// Which half of a dump a tree came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Original,
    Optimized,
}

impl Section {
    pub fn name(&self) -> &'static str {
        match self {
            Section::Original => "original",
            Section::Optimized => "optimized",
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Section::Original => ORIGINAL_MARKER,
            Section::Optimized => OPTIMIZED_MARKER,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(Section::Original),
            "optimized" => Ok(Section::Optimized),
            other => Err(format!("unknown section: {other}")),
        }
    }
}

/// Raw lines of both sections of one dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstDump {
    pub original: Vec<String>,
    pub optimized: Vec<String>,
}

impl AstDump {
    /// Split dump content at the two marker lines.
    ///
    /// Markers must match a whole line exactly. Lines before `Original AST:`
    /// are ignored; `Optimized AST:` is looked up after it.
    pub fn parse(content: &str) -> DomainResult<Self> {
        let lines: Vec<&str> = content.lines().collect();

        let orig_marker = find_marker(&lines, 0, Section::Original)?;
        let opt_marker = find_marker(&lines, orig_marker + 1, Section::Optimized)?;

        let collect = |slice: &[&str]| slice.iter().map(|l| l.to_string()).collect::<Vec<_>>();

        Ok(Self {
            original: collect(&lines[orig_marker + 1..opt_marker]),
            optimized: collect(&lines[opt_marker + 1..]),
        })
    }

    pub fn lines(&self, section: Section) -> &[String] {
        match section {
            Section::Original => &self.original,
            Section::Optimized => &self.optimized,
        }
    }
}

fn find_marker(lines: &[&str], from: usize, section: Section) -> DomainResult<usize> {
    let marker = section.marker();
    lines
        .iter()
        .skip(from)
        .position(|l| *l == marker)
        .map(|i| i + from)
        .ok_or_else(|| DomainError::SectionNotFound {
            marker: marker.to_string(),
        })
}
