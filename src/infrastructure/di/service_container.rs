//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::ComparisonService;
use crate::config::Settings;
use crate::infrastructure::traits::{
    CommandRunner, FileSystem, GraphRenderer, GraphvizRenderer, RealCommandRunner, RealFileSystem,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Graph layout backend
    pub renderer: Arc<dyn GraphRenderer>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let cmd: Arc<dyn CommandRunner> = Arc::new(RealCommandRunner);
        let renderer = Arc::new(GraphvizRenderer::new(cmd, settings.dot_program.clone()));
        Self::with_deps(settings, Arc::new(RealFileSystem), renderer)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        renderer: Arc<dyn GraphRenderer>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            renderer,
        }
    }

    pub fn comparison_service(&self) -> ComparisonService {
        ComparisonService::new(
            self.fs.clone(),
            self.renderer.clone(),
            self.settings.clone(),
        )
    }
}
