//! Domain layer: trees, label sets and graph emission
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod dot;
pub mod error;
pub mod highlight;
pub mod sections;
pub mod tree;

pub use dot::{render_dot, DotGraph};
pub use error::{DomainError, DomainResult};
pub use highlight::{Coloring, NodeStatus, Palette};
pub use sections::{AstDump, Section, OPTIMIZED_MARKER, ORIGINAL_MARKER};
pub use tree::{LabelSet, NodeId, PreOrderIter, TreeNode, TreeParser};
