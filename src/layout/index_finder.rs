//! Package entry point lookup within a single directory listing

use crate::error::SetupError;
use crate::fs::{DirEntry, FileType};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn index_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^index\.[mc]?js$").expect("index pattern is valid"))
}

pub fn is_index_file(name: &str) -> bool {
    index_pattern().is_match(name)
}

/// Returns the name of the one entry point in `entries`, or `None` when there is none.
///
/// Two or more matches is a layout error; ambiguity is never broken by picking one.
pub fn find_index(dir: &Path, entries: &[DirEntry]) -> Result<Option<String>, SetupError> {
    let mut candidates: Vec<String> = entries
        .iter()
        .filter(|e| e.file_type != FileType::Directory)
        .filter(|e| is_index_file(e.file_name()))
        .map(|e| e.file_name().to_string())
        .collect();

    match candidates.len() {
        0 => Ok(None),
        1 => Ok(candidates.pop()),
        _ => {
            candidates.sort();
            Err(SetupError::AmbiguousLayout {
                dir: dir.to_path_buf(),
                candidates,
            })
        }
    }
}
