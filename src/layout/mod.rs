//! Source layout inference: entry point lookup, target model, and the layout classifier

pub mod classifier;
pub mod index_finder;
pub mod manifest;
pub mod target;

pub use classifier::{executable_output_name, LayoutClassifier, EXECUTABLE_DIRS, LIBRARY_DIR};
pub use index_finder::{find_index, is_index_file};
pub use manifest::{PackageManifest, PACKAGE_MANIFEST};
pub use target::{BuildTarget, TargetKind};
