//! Per-run state shared read-only by every fragment generator

use crate::config::ProjectConfig;
use crate::layout::{BuildTarget, TargetKind};
use std::path::PathBuf;

/// Configuration plus the resolved build targets for one `setup_project` run.
///
/// Generators only ever borrow this; nothing a generator produces flows back
/// into it, so generators can run concurrently.
#[derive(Debug, Clone)]
pub struct GeneratorContext {
    pub config: ProjectConfig,
    pub libraries: Vec<BuildTarget>,
    pub executables: Vec<BuildTarget>,
}

impl GeneratorContext {
    pub fn new(config: ProjectConfig, targets: Vec<BuildTarget>) -> Self {
        let (libraries, executables) = targets
            .into_iter()
            .partition(|t| t.kind == TargetKind::Library);
        Self {
            config,
            libraries,
            executables,
        }
    }

    pub fn targets(&self, kind: TargetKind) -> &[BuildTarget] {
        match kind {
            TargetKind::Library => &self.libraries,
            TargetKind::Executable => &self.executables,
        }
    }

    /// Namespaced make variable name, e.g. `SDLC_ESLINT`
    pub fn var(&self, name: &str) -> String {
        format!("{}_{}", self.config.namespace, name)
    }

    pub fn make_dir(&self) -> PathBuf {
        self.config.make_dir()
    }
}
