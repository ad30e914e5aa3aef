//! Installation of the tool dependencies a build plan needs
//!
//! Driven by the CLI after a successful setup run; `setup_project` never installs.

mod npm;

pub use npm::NpmInstaller;

use crate::fragments::ToolDependency;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to read development package directory {path}: {source}")]
    DevPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait PackageInstaller: Send + Sync {
    /// Installs `dependencies` as dev dependencies of the package at `project_root`.
    ///
    /// An empty dependency list is a no-op.
    async fn install(
        &self,
        project_root: &Path,
        dependencies: &[ToolDependency],
    ) -> Result<(), InstallError>;
}
