//! Change detection by label membership
//!
//! A node is `Changed` when its label is absent from the reference set.
//! Only additions are detected: a label that disappeared from the optimized
//! tree has no node to color. Removed labels are reported separately via
//! [`LabelSet::difference`](crate::domain::LabelSet::difference).

use crate::domain::tree::LabelSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    Unchanged,
    Changed,
}

/// How node fill colors are chosen while emitting a graph.
#[derive(Debug, Clone, Copy)]
pub enum Coloring<'a> {
    /// Every node gets the unchanged color.
    Uniform,
    /// Nodes whose label is missing from the set are changed.
    AgainstReference(&'a LabelSet),
}

impl Coloring<'_> {
    pub fn status(&self, label: &str) -> NodeStatus {
        match self {
            Coloring::Uniform => NodeStatus::Unchanged,
            Coloring::AgainstReference(reference) if reference.contains(label) => {
                NodeStatus::Unchanged
            }
            Coloring::AgainstReference(_) => NodeStatus::Changed,
        }
    }
}

/// Fill colors, as Graphviz color names or `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub unchanged: String,
    pub changed: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            unchanged: "lightgray".into(),
            changed: "lightgreen".into(),
        }
    }
}

impl Palette {
    pub fn fill(&self, status: NodeStatus) -> &str {
        match status {
            NodeStatus::Unchanged => &self.unchanged,
            NodeStatus::Changed => &self.changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_uniform_coloring_when_classifying_then_never_changed() {
        assert_eq!(Coloring::Uniform.status("anything"), NodeStatus::Unchanged);
    }

    #[test]
    fn given_reference_when_classifying_then_missing_labels_are_changed() {
        let reference: LabelSet = ["Program", "Decl"].into_iter().collect();
        let coloring = Coloring::AgainstReference(&reference);

        assert_eq!(coloring.status("Decl"), NodeStatus::Unchanged);
        assert_eq!(coloring.status("Call"), NodeStatus::Changed);
    }

    #[test]
    fn given_default_palette_when_filling_then_uses_gray_and_green() {
        let palette = Palette::default();
        assert_eq!(palette.fill(NodeStatus::Unchanged), "lightgray");
        assert_eq!(palette.fill(NodeStatus::Changed), "lightgreen");
    }
}
