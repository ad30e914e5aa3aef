//! Minimal view of `package.json`: only the fields layout inference needs

use crate::error::SetupError;
use crate::fs::FileSystem;
use serde::Deserialize;
use std::path::Path;

pub const PACKAGE_MANIFEST: &str = "package.json";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    pub main: Option<String>,
}

impl PackageManifest {
    pub fn load(fs: &dyn FileSystem, project_root: &Path) -> Result<Self, SetupError> {
        let path = project_root.join(PACKAGE_MANIFEST);
        if !fs.is_file(&path) {
            return Err(SetupError::MissingPackageRoot(project_root.to_path_buf()));
        }

        let content = fs.read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| SetupError::PackageMetadata {
            path,
            message: e.to_string(),
        })
    }

    /// The published entry, required when targets have to be inferred.
    pub fn require_main(&self, project_root: &Path) -> Result<&str, SetupError> {
        self.main
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| SetupError::MissingMainEntry(project_root.join(PACKAGE_MANIFEST)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    #[test]
    fn test_load_main() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "package.json",
            r#"{"name": "foo", "version": "1.2.0", "main": "dist/foo.js", "scripts": {}}"#,
        );

        let manifest = PackageManifest::load(&fs, fs.root()).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("foo"));
        assert_eq!(manifest.require_main(fs.root()).unwrap(), "dist/foo.js");
    }

    #[test]
    fn test_missing_manifest() {
        let fs = MockFileSystem::new();
        assert!(matches!(
            PackageManifest::load(&fs, fs.root()),
            Err(SetupError::MissingPackageRoot(_))
        ));
    }

    #[test]
    fn test_missing_main() {
        let fs = MockFileSystem::new();
        fs.add_file("package.json", r#"{"name": "foo"}"#);

        let manifest = PackageManifest::load(&fs, fs.root()).unwrap();
        match manifest.require_main(fs.root()) {
            Err(SetupError::MissingMainEntry(path)) => {
                assert_eq!(path, fs.root().join("package.json"))
            }
            other => panic!("Expected MissingMainEntry, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_main_counts_as_missing() {
        let fs = MockFileSystem::new();
        fs.add_file("package.json", r#"{"main": "  "}"#);

        let manifest = PackageManifest::load(&fs, fs.root()).unwrap();
        assert!(manifest.require_main(fs.root()).is_err());
    }

    #[test]
    fn test_malformed_manifest() {
        let fs = MockFileSystem::new();
        fs.add_file("package.json", "{ not json");

        assert!(matches!(
            PackageManifest::load(&fs, fs.root()),
            Err(SetupError::PackageMetadata { .. })
        ));
    }
}
