use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of a single `setup_project` run.
///
/// Every variant describes a problem with the caller's input or the package
/// layout. None of them is transient, so nothing here is retried.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Missing required option '{0}'")]
    MissingRequiredOption(&'static str),

    #[error("Invalid namespace prefix '{0}': expected an uppercase make variable token such as 'SDLC'")]
    InvalidNamespace(String),

    #[error("{0} does not appear to be a package root (no 'package.json' found)")]
    MissingPackageRoot(PathBuf),

    #[error("No source directory found at {0}; set 'srcPath' or create the directory")]
    MissingSourceDir(PathBuf),

    #[error("Multiple index files found in {dir}: {}", .candidates.join(", "))]
    AmbiguousLayout {
        dir: PathBuf,
        candidates: Vec<String>,
    },

    #[error("Found multiple executable candidates: {}", .candidates.join(", "))]
    MultipleExecutableCandidates { candidates: Vec<String> },

    #[error("Package {0} does not define 'main'")]
    MissingMainEntry(PathBuf),

    #[error("Failed to parse package metadata {path}: {message}")]
    PackageMetadata { path: PathBuf, message: String },

    #[error("No library or executable source could be identified; use 'withLibs' or 'withExecutables'")]
    NoBuildTargetsIdentified,

    #[error("Fragment path {path} would be written by more than one target: {}", .targets.join(", "))]
    FragmentPathCollision { path: String, targets: Vec<String> },

    #[error("Fragment generator '{generator}' failed")]
    Generator {
        generator: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Filesystem(#[from] anyhow::Error),
}

impl SetupError {
    /// Stable identifier for the error kind, used in machine-readable output
    pub fn kind(&self) -> &'static str {
        match self {
            SetupError::MissingRequiredOption(_) => "MissingRequiredOption",
            SetupError::InvalidNamespace(_) => "InvalidNamespace",
            SetupError::MissingPackageRoot(_) => "MissingPackageRoot",
            SetupError::MissingSourceDir(_) => "MissingSourceDir",
            SetupError::AmbiguousLayout { .. } => "AmbiguousLayout",
            SetupError::MultipleExecutableCandidates { .. } => "MultipleExecutableCandidates",
            SetupError::MissingMainEntry(_) => "MissingMainEntry",
            SetupError::PackageMetadata { .. } => "PackageMetadata",
            SetupError::NoBuildTargetsIdentified => "NoBuildTargetsIdentified",
            SetupError::FragmentPathCollision { .. } => "FragmentPathCollision",
            SetupError::Generator { .. } => "Generator",
            SetupError::Config(_) => "Config",
            SetupError::Filesystem(_) => "Filesystem",
        }
    }
}
