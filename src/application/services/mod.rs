//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, GraphRenderer)
//! but are themselves concrete structs, not traits.

mod comparison;

pub use comparison::{
    Analysis, ArtifactNaming, ArtifactPaths, ComparisonReport, ComparisonService,
    COMPARISON_STEM, OPTIMIZED_STEM, ORIGINAL_STEM,
};
