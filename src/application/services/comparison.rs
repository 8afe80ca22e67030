//! AST comparison service
//!
//! Runs the whole pipeline for one dump: split sections, parse both trees,
//! flatten the original, emit the plain and the highlighted graph, render
//! both through the layout backend and compose them side by side.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::application::compose::{compose_side_by_side, load_image, save_image};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{
    render_dot, AstDump, Coloring, DotGraph, LabelSet, Section, TreeNode, TreeParser,
};
use crate::infrastructure::traits::{FileSystem, GraphRenderer};

pub const ORIGINAL_STEM: &str = "original_ast";
pub const OPTIMIZED_STEM: &str = "optimized_ast_highlighted";
pub const COMPARISON_STEM: &str = "ast_comparison";

/// How artifact files are named inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactNaming {
    /// `original_ast.png`, ... ; concurrent runs into one directory overwrite each other
    Fixed,
    /// `original_ast-<run>.png`, ...
    PerRun(String),
}

impl ArtifactNaming {
    /// Per-run naming with a fresh run id (first 8 hex chars of a v4 UUID).
    pub fn generate() -> Self {
        let id = Uuid::new_v4().simple().to_string();
        Self::PerRun(id[..8].to_string())
    }

    pub fn run_id(&self) -> Option<&str> {
        match self {
            ArtifactNaming::Fixed => None,
            ArtifactNaming::PerRun(id) => Some(id),
        }
    }

    fn file_name(&self, stem: &str) -> String {
        match self {
            ArtifactNaming::Fixed => format!("{stem}.png"),
            ArtifactNaming::PerRun(id) => format!("{stem}-{id}.png"),
        }
    }
}

/// The three images one comparison run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub original: PathBuf,
    pub optimized: PathBuf,
    pub comparison: PathBuf,
}

impl ArtifactPaths {
    pub fn new(output_dir: &Path, naming: &ArtifactNaming) -> Self {
        Self {
            original: output_dir.join(naming.file_name(ORIGINAL_STEM)),
            optimized: output_dir.join(naming.file_name(OPTIMIZED_STEM)),
            comparison: output_dir.join(naming.file_name(COMPARISON_STEM)),
        }
    }
}

/// Both trees of a dump and the graphs emitted for them.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub original: TreeNode,
    pub optimized: TreeNode,
    /// Labels of the original tree; the highlight reference
    pub reference: LabelSet,
    pub original_graph: DotGraph,
    pub optimized_graph: DotGraph,
    /// Labels only in the optimized tree (highlighted)
    pub added: Vec<String>,
    /// Labels only in the original tree (never highlighted)
    pub removed: Vec<String>,
}

impl Analysis {
    pub fn tree(&self, section: Section) -> &TreeNode {
        match section {
            Section::Original => &self.original,
            Section::Optimized => &self.optimized,
        }
    }

    pub fn graph(&self, section: Section) -> &DotGraph {
        match section {
            Section::Original => &self.original_graph,
            Section::Optimized => &self.optimized_graph,
        }
    }

    /// Coloring used for a section's tree.
    pub fn coloring(&self, section: Section) -> Coloring<'_> {
        match section {
            Section::Original => Coloring::Uniform,
            Section::Optimized => Coloring::AgainstReference(&self.reference),
        }
    }
}

/// Outcome of a full comparison run.
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub run_id: Option<String>,
    pub artifacts: ArtifactPaths,
    pub original_nodes: usize,
    pub optimized_nodes: usize,
    pub changed_nodes: usize,
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// Service comparing an original and an optimized AST.
pub struct ComparisonService {
    fs: Arc<dyn FileSystem>,
    renderer: Arc<dyn GraphRenderer>,
    settings: Arc<Settings>,
}

impl ComparisonService {
    /// Create a new comparison service.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        renderer: Arc<dyn GraphRenderer>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            fs,
            renderer,
            settings,
        }
    }

    /// Read a dump file and split it into its sections.
    pub fn read_dump(&self, input: &Path) -> ApplicationResult<AstDump> {
        let content = self
            .fs
            .read_to_string(input)
            .map_err(|source| ApplicationError::InputUnreadable {
                path: input.to_path_buf(),
                source,
            })?;
        Ok(AstDump::parse(&content)?)
    }

    /// Parse and diff both sections without rendering anything.
    #[instrument(level = "debug", skip(self, dump))]
    pub fn analyze(&self, dump: &AstDump) -> ApplicationResult<Analysis> {
        // one parser for both trees keeps node ids unique across the pass
        let mut parser = TreeParser::new();
        let original = parser.parse(Section::Original.name(), dump.lines(Section::Original))?;
        let optimized = parser.parse(Section::Optimized.name(), dump.lines(Section::Optimized))?;

        let reference = original.labels();
        let current = optimized.labels();
        let added: Vec<String> = current.difference(&reference).map(String::from).collect();
        let removed: Vec<String> = reference.difference(&current).map(String::from).collect();
        debug!(
            "analyze: original={} nodes, optimized={} nodes, added={}, removed={}",
            original.node_count(),
            optimized.node_count(),
            added.len(),
            removed.len()
        );

        let palette = self.settings.palette();
        let original_graph = render_dot(&original, "OriginalAST", Coloring::Uniform, &palette);
        let optimized_graph = render_dot(
            &optimized,
            "OptimizedAST",
            Coloring::AgainstReference(&reference),
            &palette,
        );

        Ok(Analysis {
            original,
            optimized,
            reference,
            original_graph,
            optimized_graph,
            added,
            removed,
        })
    }

    /// Read and analyze a dump file.
    pub fn analyze_file(&self, input: &Path) -> ApplicationResult<Analysis> {
        let dump = self.read_dump(input)?;
        self.analyze(&dump)
    }

    /// Run the full pipeline and write the three images into `output_dir`.
    ///
    /// The combined image is written last, and only after both renders
    /// succeeded.
    #[instrument(level = "debug", skip(self))]
    pub fn compare(
        &self,
        input: &Path,
        output_dir: &Path,
        naming: &ArtifactNaming,
    ) -> ApplicationResult<ComparisonReport> {
        let analysis = self.analyze_file(input)?;

        self.fs
            .create_dir_all(output_dir)
            .map_err(|source| ApplicationError::OutputUncreatable {
                path: output_dir.to_path_buf(),
                source,
            })?;
        let artifacts = ArtifactPaths::new(output_dir, naming);

        // a failed run must not leave a previous run's comparison behind
        if self.fs.exists(&artifacts.comparison) {
            self.fs
                .remove_file(&artifacts.comparison)
                .with_path_context("remove stale comparison", &artifacts.comparison)?;
        }

        self.render(&analysis.original_graph, &artifacts.original)?;
        self.render(&analysis.optimized_graph, &artifacts.optimized)?;

        let left = load_image(&artifacts.original)?;
        let right = load_image(&artifacts.optimized)?;
        let combined = compose_side_by_side(&left, &right);
        save_image(&combined, &artifacts.comparison)?;
        info!("comparison saved: {}", artifacts.comparison.display());

        Ok(ComparisonReport {
            run_id: naming.run_id().map(String::from),
            artifacts,
            original_nodes: analysis.original.node_count(),
            optimized_nodes: analysis.optimized.node_count(),
            changed_nodes: analysis.optimized_graph.changed_count(),
            added: analysis.added,
            removed: analysis.removed,
        })
    }

    fn render(&self, graph: &DotGraph, output: &Path) -> ApplicationResult<()> {
        let source = graph.to_string();

        if self.settings.keep_dot {
            let dot_path = output.with_extension("dot");
            self.fs
                .write(&dot_path, &source)
                .with_path_context("write DOT source", &dot_path)?;
        }

        self.renderer
            .render_png(&source, output)
            .map_err(|e| ApplicationError::render_backend(format!("render {}", output.display()), e))
    }
}
