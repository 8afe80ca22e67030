//! Conversion of parsed trees into printable `termtree` trees

use std::fmt;

use termtree::Tree;

use crate::domain::{Coloring, NodeStatus, TreeNode};

/// Printable tree ready for `Display`.
///
/// Torn down iteratively; `termtree::Tree` itself drops recursively.
#[derive(Debug)]
pub struct PrintableTree(Tree<String>);

impl fmt::Display for PrintableTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Drop for PrintableTree {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.0.leaves);
        while let Some(mut leaf) = pending.pop() {
            pending.append(&mut leaf.leaves);
        }
    }
}

pub trait TreeNodeConvert {
    /// Build a printable tree; `format` renders each label given its status.
    fn to_tree_string<F>(&self, coloring: Coloring<'_>, format: F) -> PrintableTree
    where
        F: Fn(&str, NodeStatus) -> String;
}

impl TreeNodeConvert for TreeNode {
    fn to_tree_string<F>(&self, coloring: Coloring<'_>, format: F) -> PrintableTree
    where
        F: Fn(&str, NodeStatus) -> String,
    {
        // Post-order with an explicit stack: a frame is closed once all of
        // its children have been built into its leaf list.
        let mut stack: Vec<(&TreeNode, Vec<Tree<String>>)> = vec![(self, Vec::new())];
        let mut root = Tree::new(String::new());

        while let Some((node, done)) = stack.last().map(|(node, built)| (*node, built.len())) {
            if let Some(child) = node.children.get(done) {
                stack.push((child, Vec::with_capacity(child.children.len())));
                continue;
            }

            let Some((_, leaves)) = stack.pop() else {
                break;
            };
            let tree = Tree::new(format(&node.label, coloring.status(&node.label))).with_leaves(leaves);
            match stack.last_mut() {
                Some((_, built)) => built.push(tree),
                None => root = tree,
            }
        }

        PrintableTree(root)
    }
}
