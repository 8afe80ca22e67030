//! Graphviz DOT emission for trees

use std::fmt;

use crate::domain::highlight::{Coloring, NodeStatus, Palette};
use crate::domain::tree::{NodeId, TreeNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotNode {
    pub id: NodeId,
    pub label: String,
    pub status: NodeStatus,
    pub fill: String,
}

/// Directed graph ready to hand to the layout backend.
///
/// Nodes and edges are kept in pre-order, so the DOT text is identical
/// for identical input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotGraph {
    pub name: String,
    pub nodes: Vec<DotNode>,
    /// parent -> child
    pub edges: Vec<(NodeId, NodeId)>,
}

impl DotGraph {
    pub fn changed_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.status == NodeStatus::Changed)
            .count()
    }

    pub fn node(&self, id: NodeId) -> Option<&DotNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Walk `root` in pre-order and emit one filled box per node and one edge
/// per parent/child pair. Graph identity is the node id, never the label.
pub fn render_dot(root: &TreeNode, name: &str, coloring: Coloring<'_>, palette: &Palette) -> DotGraph {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    for (parent, node) in root.iter() {
        let status = coloring.status(&node.label);
        nodes.push(DotNode {
            id: node.id,
            label: node.label.clone(),
            status,
            fill: palette.fill(status).to_string(),
        });
        if let Some(parent) = parent {
            edges.push((parent, node.id));
        }
    }

    DotGraph {
        name: sanitize_id(name),
        nodes,
        edges,
    }
}

impl fmt::Display for DotGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph {} {{", self.name)?;
        writeln!(f, "    node [shape=box, style=filled];")?;
        for node in &self.nodes {
            writeln!(
                f,
                "    {} [label=\"{}\", fillcolor=\"{}\"];",
                node.id,
                escape(&node.label),
                escape(&node.fill)
            )?;
        }
        for (parent, child) in &self.edges {
            writeln!(f, "    {} -> {};", parent, child)?;
        }
        writeln!(f, "}}")
    }
}

/// Escape text for a double-quoted DOT string.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}

/// Graph names are emitted unquoted, so keep them to identifier characters.
fn sanitize_id(name: &str) -> String {
    let id: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if id.is_empty() || id.starts_with(|c: char| c.is_ascii_digit()) {
        format!("G{id}")
    } else {
        id
    }
}
