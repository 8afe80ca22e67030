//! Indentation-delimited trees
//!
//! A tree is read from a sequence of lines where leading whitespace is the
//! only structural signal. Construction and every traversal use explicit
//! stacks, so deeply nested input never grows the call stack.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{instrument, trace};

use crate::domain::error::{DomainError, DomainResult};

/// Identifier of a node within one render pass.
///
/// Issued by [`TreeParser`] in source line order; one parser never issues the
/// same id twice, so trees parsed by the same parser never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Node of a parsed tree. Owns its children exclusively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: NodeId,
    /// Trimmed text of the source line
    pub label: String,
    /// Children in source line order
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first pre-order walk yielding `(parent id, node)`.
    pub fn iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Set of distinct labels in this tree (self plus all descendants).
    pub fn labels(&self) -> LabelSet {
        LabelSet::from_tree(self)
    }

    /// Write the tree back as indentation text, each child one `unit`
    /// deeper than its parent.
    pub fn to_indented(&self, unit: &str) -> String {
        let mut out = String::new();
        let mut stack = vec![(self, 0usize)];
        while let Some((node, level)) = stack.pop() {
            for _ in 0..level {
                out.push_str(unit);
            }
            out.push_str(&node.label);
            out.push('\n');
            for child in node.children.iter().rev() {
                stack.push((child, level + 1));
            }
        }
        out
    }

    /// True when both trees have the same labels in the same child order.
    /// Node ids are ignored.
    pub fn same_shape(&self, other: &TreeNode) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.label != b.label || a.children.len() != b.children.len() {
                return false;
            }
            stack.extend(a.children.iter().zip(b.children.iter()));
        }
        true
    }
}

impl Drop for TreeNode {
    // Flatten the teardown so very deep trees do not recurse on drop.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

pub struct PreOrderIter<'a> {
    stack: Vec<(Option<NodeId>, &'a TreeNode)>,
}

impl<'a> PreOrderIter<'a> {
    fn new(root: &'a TreeNode) -> Self {
        Self {
            stack: vec![(None, root)],
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = (Option<NodeId>, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (parent, node) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children.iter().rev() {
            self.stack.push((Some(node.id), child));
        }
        Some((parent, node))
    }
}

/// Builds trees from indented lines.
///
/// Keep one parser per render pass: ids continue across calls to [`parse`](Self::parse).
#[derive(Debug, Default)]
pub struct TreeParser {
    next_id: usize,
}

impl TreeParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one section into a single-rooted tree.
    ///
    /// Depth is the number of leading whitespace characters. A line at the
    /// same depth as the open node is its sibling. Blank lines are skipped.
    ///
    /// # Errors
    /// `MalformedTree` when the section has no non-blank line, or when a
    /// second top-level node follows a completed root.
    #[instrument(level = "debug", skip(self, lines))]
    pub fn parse<I, S>(&mut self, section: &str, lines: I) -> DomainResult<TreeNode>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stack: Vec<(TreeNode, usize)> = Vec::new();
        let mut root: Option<TreeNode> = None;

        for (lineno, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            let label = line.trim();
            if label.is_empty() {
                continue;
            }
            let depth = line.chars().take_while(|c| c.is_whitespace()).count();

            while stack.last().is_some_and(|(_, open)| *open >= depth) {
                close_top(&mut stack, &mut root);
            }

            if stack.is_empty() {
                if let Some(existing) = &root {
                    return Err(DomainError::malformed(
                        section,
                        format!(
                            "second top-level node '{}' at line {} (root is '{}')",
                            label,
                            lineno + 1,
                            existing.label
                        ),
                    ));
                }
            }

            let node = TreeNode::new(NodeId(self.next_id), label);
            self.next_id += 1;
            trace!(id = %node.id, depth, label, "open node");
            stack.push((node, depth));
        }

        while !stack.is_empty() {
            close_top(&mut stack, &mut root);
        }

        root.ok_or_else(|| DomainError::malformed(section, "no tree lines"))
    }
}

/// Pop the innermost open node and attach it to its parent, or make it the root.
fn close_top(stack: &mut Vec<(TreeNode, usize)>, root: &mut Option<TreeNode>) {
    if let Some((node, _)) = stack.pop() {
        match stack.last_mut() {
            Some((parent, _)) => parent.children.push(node),
            None => *root = Some(node),
        }
    }
}

/// Distinct labels of one tree, iterated in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet(BTreeSet<String>);

impl LabelSet {
    pub fn from_tree(root: &TreeNode) -> Self {
        Self(root.iter().map(|(_, node)| node.label.clone()).collect())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Labels in `self` that `other` lacks.
    pub fn difference<'a>(&'a self, other: &'a LabelSet) -> impl Iterator<Item = &'a str> {
        self.0.difference(&other.0).map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> DomainResult<TreeNode> {
        TreeParser::new().parse("test", text.lines())
    }

    #[test]
    fn given_nested_lines_when_parsing_then_builds_hierarchy() {
        let tree = parse("Program\n  Decl\n    Var\n  Call\n").unwrap();

        assert_eq!(tree.label, "Program");
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].label, "Decl");
        assert_eq!(tree.children[0].children[0].label, "Var");
        assert_eq!(tree.children[1].label, "Call");
        assert!(tree.children[1].is_leaf());
    }

    #[test]
    fn given_equal_indentation_when_parsing_then_lines_are_siblings() {
        let tree = parse("Root\n  A\n  B\n").unwrap();

        assert_eq!(tree.children.len(), 2);
        assert!(tree.children.iter().all(TreeNode::is_leaf));
    }

    #[test]
    fn given_blank_lines_when_parsing_then_they_are_ignored() {
        let tree = parse("Root\n\n   \n  A\n\n  B\n").unwrap();

        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.children.len(), 2);
    }

    #[test]
    fn given_only_blank_lines_when_parsing_then_malformed() {
        let err = parse("\n   \n\t\n").unwrap_err();
        assert!(matches!(err, DomainError::MalformedTree { .. }));
    }

    #[test]
    fn given_second_root_when_parsing_then_malformed() {
        let err = parse("A\n  B\nC\n").unwrap_err();
        match err {
            DomainError::MalformedTree { section, reason } => {
                assert_eq!(section, "test");
                assert!(reason.contains("'C'"), "reason: {reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn given_shallower_line_when_parsing_then_closes_deeper_branches() {
        let tree = parse("R\n  A\n    B\n      C\n  D\n").unwrap();

        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[1].label, "D");
        assert_eq!(tree.children[0].children[0].children[0].label, "C");
    }

    #[test]
    fn given_uneven_indentation_when_parsing_then_depth_is_relative() {
        // a child indented by 5 and its sibling by 3: the sibling closes the first child
        let tree = parse("R\n     A\n   B\n").unwrap();

        assert_eq!(tree.children.len(), 2);
    }

    #[test]
    fn given_indented_root_when_parsing_then_first_line_is_root() {
        let tree = parse("    R\n      A\n").unwrap();
        assert_eq!(tree.label, "R");
        assert_eq!(tree.children[0].label, "A");
    }

    #[test]
    fn given_one_parser_when_parsing_two_trees_then_ids_do_not_collide() {
        let mut parser = TreeParser::new();
        let a = parser.parse("a", ["X", "  Y"]).unwrap();
        let b = parser.parse("b", ["X", "  Y"]).unwrap();

        let ids_a: BTreeSet<_> = a.iter().map(|(_, n)| n.id).collect();
        let ids_b: BTreeSet<_> = b.iter().map(|(_, n)| n.id).collect();
        assert!(ids_a.is_disjoint(&ids_b));
    }

    #[test]
    fn given_tree_when_iterating_then_visits_in_preorder_with_parents() {
        let tree = parse("R\n  A\n    A1\n  B\n").unwrap();

        let visited: Vec<_> = tree
            .iter()
            .map(|(parent, n)| (parent.map(|p| p.0), n.label.as_str()))
            .collect();
        assert_eq!(
            visited,
            vec![(None, "R"), (Some(0), "A"), (Some(1), "A1"), (Some(0), "B")]
        );
    }

    #[test]
    fn given_duplicate_labels_when_flattening_then_collapsed() {
        let tree = parse("R\n  X\n  X\n    R\n").unwrap();
        let labels = tree.labels();

        assert_eq!(labels.len(), 2);
        assert!(labels.contains("R"));
        assert!(labels.contains("X"));
        assert!(labels.len() < tree.node_count());
    }

    #[test]
    fn given_tree_when_serializing_then_reparses_to_same_shape() {
        let tree = parse("R\n   A\n      A1\n      A2\n   B\n").unwrap();

        let text = tree.to_indented("  ");
        assert_eq!(text, "R\n  A\n    A1\n    A2\n  B\n");

        let again = parse(&text).unwrap();
        assert!(tree.same_shape(&again));
    }

    #[test]
    fn given_deep_nesting_when_parsing_then_no_stack_overflow() {
        let text: String = (0..5_000).map(|i| format!("{}N{}\n", " ".repeat(i), i)).collect();
        let tree = parse(&text).unwrap();

        assert_eq!(tree.node_count(), 5_000);
        assert_eq!(tree.labels().len(), 5_000);
    }
}
