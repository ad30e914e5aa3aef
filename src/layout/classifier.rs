//! Infers build targets from the top level of the source root.
//!
//! Precedence, stopping at the first rule that matches:
//!
//! 1. An index file directly under the source root is a single library, or a
//!    single executable when the package is flagged executable.
//! 2. Otherwise `lib/` with its own index becomes the library, and one of
//!    `bin`, `cli`, `exec` or `executable` with its own index becomes the
//!    executable, written next to `main` with an `-exec` suffix.
//! 3. Otherwise nothing is inferred and the caller must name targets.
//!
//! A root index suppresses the `lib/` + executable split even when both exist.

use super::index_finder::find_index;
use super::target::{BuildTarget, TargetKind};
use crate::error::SetupError;
use crate::fs::FileSystem;
use std::path::Path;
use tracing::{debug, info};

pub const LIBRARY_DIR: &str = "lib";
pub const EXECUTABLE_DIRS: [&str; 4] = ["bin", "cli", "exec", "executable"];

pub struct LayoutClassifier<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> LayoutClassifier<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    pub fn classify(
        &self,
        source_root: &Path,
        main: &str,
        is_executable: bool,
    ) -> Result<Vec<BuildTarget>, SetupError> {
        let root_entries = self.fs.read_dir(source_root)?;
        debug!(
            source_root = %source_root.display(),
            entries = root_entries.len(),
            "Classifying source layout"
        );

        if let Some(index) = find_index(source_root, &root_entries)? {
            let kind = if is_executable {
                TargetKind::Executable
            } else {
                TargetKind::Library
            };
            info!("Found root index, treating as single {}.", kind);
            return Ok(vec![BuildTarget::new(index, main, kind)]);
        }

        let mut targets = Vec::new();

        if root_entries
            .iter()
            .any(|e| e.is_dir() && e.file_name() == LIBRARY_DIR)
        {
            let lib_dir = source_root.join(LIBRARY_DIR);
            let lib_entries = self.fs.read_dir(&lib_dir)?;
            if let Some(index) = find_index(&lib_dir, &lib_entries)? {
                info!("Found lib index, adding to library build list.");
                targets.push(BuildTarget::library(
                    format!("{}/{}", LIBRARY_DIR, index),
                    main,
                ));
            }
        }

        let mut exec_dirs: Vec<&str> = root_entries
            .iter()
            .filter(|e| e.is_dir() && EXECUTABLE_DIRS.iter().any(|d| *d == e.file_name()))
            .map(|e| e.file_name())
            .collect();
        exec_dirs.sort_unstable();

        if exec_dirs.len() > 1 {
            return Err(SetupError::MultipleExecutableCandidates {
                candidates: exec_dirs.iter().map(|d| d.to_string()).collect(),
            });
        }

        if let Some(exec_dir) = exec_dirs.first() {
            let abs_exec_dir = source_root.join(exec_dir);
            let exec_entries = self.fs.read_dir(&abs_exec_dir)?;
            if let Some(index) = find_index(&abs_exec_dir, &exec_entries)? {
                info!("Found exec index, adding to executable build list.");
                targets.push(BuildTarget::executable(
                    format!("{}/{}", exec_dir, index),
                    executable_output_name(main),
                ));
            }
        }

        if targets.is_empty() {
            debug!("No entry points recognized under the source root");
        }

        Ok(targets)
    }
}

/// `dist/foo.js` -> `dist/foo-exec.js`; a name without an extension gets the suffix appended.
pub fn executable_output_name(main: &str) -> String {
    let (dir, file) = match main.rfind('/') {
        Some(i) => main.split_at(i + 1),
        None => ("", main),
    };

    match file.rfind('.') {
        Some(i) if i > 0 => format!("{}{}-exec{}", dir, &file[..i], &file[i..]),
        _ => format!("{}{}-exec", dir, file),
    }
}
