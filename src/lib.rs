//! makeplan - layout-aware Makefile fragment generation for node packages
//!
//! Inspects a package's source tree, infers which library and executable
//! artifacts it builds, and writes priority-ordered Makefile fragments under
//! `make/` that a top-level Makefile includes in ascending priority order.
//!
//! # Example Usage
//!
//! ```no_run
//! use makeplan::{ProjectConfig, RealFileSystem, SetupOrchestrator};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), makeplan::SetupError> {
//! let mut config = ProjectConfig::new("/path/to/package");
//! config.no_doc = true;
//!
//! let orchestrator = SetupOrchestrator::new(Arc::new(RealFileSystem::new()), None);
//! let plan = orchestrator.setup_project(&config).await?;
//!
//! for script in plan.scripts() {
//!     println!("{} {}", script.priority, script.path);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`layout`]: entry point lookup and layout classification
//! - [`fragments`]: fragment generators and the shared writer
//! - [`pipeline`]: the setup orchestrator that merges generator output
//! - [`output`]: the resulting [`BuildPlan`] and the persisted builder config
//! - [`install`]: dependency installation, driven by the CLI

pub mod cli;
pub mod config;
pub mod error;
pub mod fragments;
pub mod fs;
pub mod install;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod util;

pub use config::{BuilderInfo, ConfigError, ProjectConfig, Settings, ToolchainConfig};
pub use error::SetupError;
pub use fragments::{FragmentGenerator, GeneratorRegistry, ScriptFragment, ToolDependency};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use install::{InstallError, NpmInstaller, PackageInstaller};
pub use layout::{BuildTarget, LayoutClassifier, TargetKind};
pub use output::{BuildPlan, BuilderConfigRecord};
pub use pipeline::{ResolvedTargets, SetupOrchestrator};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_makeplan() {
        assert_eq!(NAME, "makeplan");
    }
}
