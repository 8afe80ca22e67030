//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed input.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("section marker not found: '{marker}'")]
    SectionNotFound { marker: String },

    #[error("malformed {section} tree: {reason}")]
    MalformedTree { section: String, reason: String },
}

impl DomainError {
    pub fn malformed(section: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTree {
            section: section.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
