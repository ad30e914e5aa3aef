//! Configuration for a setup run
//!
//! Option values are layered, lowest precedence first:
//!
//! 1. Built-in defaults (`src`, `dist`, `test-staging`, `doc`, `qa`, namespace `SDLC`)
//! 2. `makeplan.toml` in the project root
//! 3. Environment variables
//! 4. Explicit values set by the caller (CLI flags)
//!
//! # Environment Variables
//!
//! - `MAKEPLAN_SRC_PATH`: source root relative to the package root
//! - `MAKEPLAN_DIST_PATH`: distribution root relative to the package root
//! - `MAKEPLAN_TEST_STAGING_PATH`: test staging directory
//! - `MAKEPLAN_DOC_BUILD_PATH`: built documentation directory
//! - `MAKEPLAN_DOC_SRC_PATH`: documentation source directory
//! - `MAKEPLAN_QA_PATH`: QA report directory
//! - `MAKEPLAN_NAMESPACE`: prefix for generated make variables
//! - `MAKEPLAN_LOG_LEVEL`: logging level, read by the CLI

use crate::error::SetupError;
use crate::layout::{BuildTarget, PACKAGE_MANIFEST};
use crate::{NAME, VERSION};
use serde::{Deserialize, Serialize, Serializer};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_SRC_PATH: &str = "src";
pub const DEFAULT_DIST_PATH: &str = "dist";
pub const DEFAULT_TEST_STAGING_PATH: &str = "test-staging";
pub const DEFAULT_DOC_PATH: &str = "doc";
pub const DEFAULT_QA_PATH: &str = "qa";
pub const DEFAULT_NAMESPACE: &str = "SDLC";
pub const DEFAULT_ESLINT_RESOURCE: &str = "@liquid-labs/sdlc-resource-eslint";
pub const DEFAULT_JEST_RESOURCE: &str = "@liquid-labs/sdlc-resource-jest";
pub const DEFAULT_BUILD_RESOURCE: &str = "@liquid-labs/sdlc-resource-babel-and-rollup";

pub const SETTINGS_FILE: &str = "makeplan.toml";
pub const MAKE_DIR: &str = "make";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid target '{0}': expected '<entry file>:<output file>'")]
    InvalidTargetSpec(String),

    #[error("Failed to load settings from {path}: {message}")]
    SettingsFile { path: PathBuf, message: String },

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Identity stamped into every generated fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderInfo {
    pub name: String,
    pub version: String,
}

impl Default for BuilderInfo {
    fn default() -> Self {
        Self {
            name: NAME.to_string(),
            version: VERSION.to_string(),
        }
    }
}

/// Package identifiers of the tool resources the fragments call into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolchainConfig {
    pub eslint_resource: String,
    pub jest_resource: String,
    pub build_resource: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            eslint_resource: DEFAULT_ESLINT_RESOURCE.to_string(),
            jest_resource: DEFAULT_JEST_RESOURCE.to_string(),
            build_resource: DEFAULT_BUILD_RESOURCE.to_string(),
        }
    }
}

/// Optional overrides read from `makeplan.toml` and the environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub src_path: Option<String>,
    pub dist_path: Option<String>,
    pub test_staging_path: Option<String>,
    pub doc_build_path: Option<String>,
    pub doc_src_path: Option<String>,
    pub qa_path: Option<String>,
    pub namespace: Option<String>,
    pub dev_paths: Vec<PathBuf>,
    pub toolchain: Option<ToolchainConfig>,
}

impl Settings {
    /// Reads `makeplan.toml` from `project_root` (if present), then applies environment overrides.
    pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
        let mut settings = Self::from_file(&project_root.join(SETTINGS_FILE))?;
        settings.apply_env();
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::SettingsFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::ParseError { error, .. } => ConfigError::SettingsFile {
                path: path.to_path_buf(),
                message: error,
            },
            other => other,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            field: SETTINGS_FILE.to_string(),
            error: e.to_string(),
        })
    }

    pub fn apply_env(&mut self) {
        let overrides = [
            ("MAKEPLAN_SRC_PATH", &mut self.src_path),
            ("MAKEPLAN_DIST_PATH", &mut self.dist_path),
            ("MAKEPLAN_TEST_STAGING_PATH", &mut self.test_staging_path),
            ("MAKEPLAN_DOC_BUILD_PATH", &mut self.doc_build_path),
            ("MAKEPLAN_DOC_SRC_PATH", &mut self.doc_src_path),
            ("MAKEPLAN_QA_PATH", &mut self.qa_path),
            ("MAKEPLAN_NAMESPACE", &mut self.namespace),
        ];

        for (key, slot) in overrides {
            if let Some(value) = env::var(key).ok().filter(|v| !v.trim().is_empty()) {
                *slot = Some(value);
            }
        }
    }
}

fn serialize_specs<S: Serializer>(targets: &[BuildTarget], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(targets.iter().map(BuildTarget::spec))
}

/// Immutable input to one `setup_project` run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(skip)]
    pub project_root: PathBuf,
    pub src_path: String,
    pub dist_path: String,
    pub test_staging_path: String,
    pub doc_build_path: String,
    pub doc_src_path: String,
    pub qa_path: String,
    pub no_doc: bool,
    pub no_lint: bool,
    pub no_test: bool,
    pub is_executable: bool,
    #[serde(serialize_with = "serialize_specs")]
    pub with_libs: Vec<BuildTarget>,
    #[serde(serialize_with = "serialize_specs")]
    pub with_executables: Vec<BuildTarget>,
    pub namespace: String,
    #[serde(skip)]
    pub builder: BuilderInfo,
    pub toolchain: ToolchainConfig,
}

impl ProjectConfig {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            src_path: DEFAULT_SRC_PATH.to_string(),
            dist_path: DEFAULT_DIST_PATH.to_string(),
            test_staging_path: DEFAULT_TEST_STAGING_PATH.to_string(),
            doc_build_path: DEFAULT_DOC_PATH.to_string(),
            doc_src_path: DEFAULT_DOC_PATH.to_string(),
            qa_path: DEFAULT_QA_PATH.to_string(),
            no_doc: false,
            no_lint: false,
            no_test: false,
            is_executable: false,
            with_libs: Vec::new(),
            with_executables: Vec::new(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            builder: BuilderInfo::default(),
            toolchain: ToolchainConfig::default(),
        }
    }

    /// Defaults overlaid with whatever `settings` provides.
    pub fn from_settings(project_root: impl Into<PathBuf>, settings: &Settings) -> Self {
        let mut config = Self::new(project_root);

        let layers = [
            (&settings.src_path, &mut config.src_path),
            (&settings.dist_path, &mut config.dist_path),
            (&settings.test_staging_path, &mut config.test_staging_path),
            (&settings.doc_build_path, &mut config.doc_build_path),
            (&settings.doc_src_path, &mut config.doc_src_path),
            (&settings.qa_path, &mut config.qa_path),
            (&settings.namespace, &mut config.namespace),
        ];
        for (value, slot) in layers {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
        if let Some(toolchain) = &settings.toolchain {
            config.toolchain = toolchain.clone();
        }

        config
    }

    pub fn has_explicit_targets(&self) -> bool {
        !self.with_libs.is_empty() || !self.with_executables.is_empty()
    }

    pub fn package_manifest_path(&self) -> PathBuf {
        self.project_root.join(PACKAGE_MANIFEST)
    }

    pub fn source_root(&self) -> PathBuf {
        self.project_root.join(&self.src_path)
    }

    pub fn make_dir(&self) -> PathBuf {
        self.project_root.join(MAKE_DIR)
    }

    /// Checks required options before any file system access.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.project_root.as_os_str().is_empty() {
            return Err(SetupError::MissingRequiredOption("projectRoot"));
        }

        let required = [
            ("srcPath", &self.src_path),
            ("distPath", &self.dist_path),
            ("testStagingPath", &self.test_staging_path),
            ("docBuildPath", &self.doc_build_path),
            ("docSrcPath", &self.doc_src_path),
            ("qaPath", &self.qa_path),
            ("namespace", &self.namespace),
            ("builderName", &self.builder.name),
            ("builderVersion", &self.builder.version),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(SetupError::MissingRequiredOption(name));
            }
        }

        if !is_valid_namespace(&self.namespace) {
            return Err(SetupError::InvalidNamespace(self.namespace.clone()));
        }

        Ok(())
    }
}

/// `[A-Z][A-Z0-9_]*`
fn is_valid_namespace(namespace: &str) -> bool {
    let mut chars = namespace.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

impl fmt::Display for ProjectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Project Configuration:")?;
        writeln!(f, "  Root: {}", self.project_root.display())?;
        writeln!(f, "  Source: {}", self.src_path)?;
        writeln!(f, "  Dist: {}", self.dist_path)?;
        writeln!(f, "  Namespace: {}", self.namespace)?;
        writeln!(
            f,
            "  Features: doc={} lint={} test={}",
            !self.no_doc, !self.no_lint, !self.no_test
        )?;
        for target in self.with_libs.iter().chain(&self.with_executables) {
            writeln!(f, "  Target: {}", target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    #[test]
    fn test_defaults() {
        let config = ProjectConfig::new("/pkg");

        assert_eq!(config.src_path, DEFAULT_SRC_PATH);
        assert_eq!(config.dist_path, DEFAULT_DIST_PATH);
        assert_eq!(config.test_staging_path, DEFAULT_TEST_STAGING_PATH);
        assert_eq!(config.doc_build_path, "doc");
        assert_eq!(config.doc_src_path, "doc");
        assert_eq!(config.qa_path, DEFAULT_QA_PATH);
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert_eq!(config.builder.name, NAME);
        assert!(!config.has_explicit_targets());
        assert_eq!(config.source_root(), PathBuf::from("/pkg/src"));
        assert_eq!(config.make_dir(), PathBuf::from("/pkg/make"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_options() {
        let mut config = ProjectConfig::new("");
        assert!(matches!(
            config.validate(),
            Err(SetupError::MissingRequiredOption("projectRoot"))
        ));

        config.project_root = PathBuf::from("/pkg");
        config.builder.version = String::new();
        assert!(matches!(
            config.validate(),
            Err(SetupError::MissingRequiredOption("builderVersion"))
        ));

        config.builder.version = "1.0.0".to_string();
        config.src_path = " ".to_string();
        assert!(matches!(
            config.validate(),
            Err(SetupError::MissingRequiredOption("srcPath"))
        ));
    }

    #[test]
    fn test_validate_namespace() {
        let mut config = ProjectConfig::new("/pkg");
        for ok in ["SDLC", "CATALYST", "X_1"] {
            config.namespace = ok.to_string();
            assert!(config.validate().is_ok(), "{ok} should be valid");
        }
        for bad in ["sdlc", "1SDLC", "SD-LC", "_SDLC"] {
            config.namespace = bad.to_string();
            assert!(
                matches!(config.validate(), Err(SetupError::InvalidNamespace(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_settings_from_toml() {
        let settings = Settings::from_toml(
            r#"
srcPath = "source"
namespace = "CATALYST"
devPaths = ["/work/dev"]

[toolchain]
eslintResource = "my-eslint"
"#,
        )
        .unwrap();

        assert_eq!(settings.src_path.as_deref(), Some("source"));
        assert_eq!(settings.dev_paths, vec![PathBuf::from("/work/dev")]);

        let config = ProjectConfig::from_settings("/pkg", &settings);
        assert_eq!(config.src_path, "source");
        assert_eq!(config.dist_path, DEFAULT_DIST_PATH);
        assert_eq!(config.namespace, "CATALYST");
        assert_eq!(config.toolchain.eslint_resource, "my-eslint");
        assert_eq!(config.toolchain.jest_resource, DEFAULT_JEST_RESOURCE);
    }

    #[test]
    fn test_settings_invalid_toml() {
        assert!(matches!(
            Settings::from_toml("srcPath = ["),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_settings_file_missing_is_default() {
        let settings = Settings::from_file(Path::new("/nonexistent/makeplan.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let _guards = vec![
            EnvGuard::set("MAKEPLAN_DIST_PATH", "build"),
            EnvGuard::set("MAKEPLAN_NAMESPACE", "CATALYST"),
        ];

        let mut settings = Settings::from_toml(r#"distPath = "out""#).unwrap();
        settings.apply_env();

        assert_eq!(settings.dist_path.as_deref(), Some("build"));
        assert_eq!(settings.namespace.as_deref(), Some("CATALYST"));
    }

    #[test]
    fn test_serialized_config_uses_option_names() {
        let mut config = ProjectConfig::new("/pkg");
        config.with_libs = vec![BuildTarget::library("index.js", "dist/foo.js")];
        config.no_doc = true;

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["srcPath"], "src");
        assert_eq!(value["noDoc"], true);
        assert_eq!(value["withLibs"][0], "index.js:dist/foo.js");
        assert!(value.get("projectRoot").is_none());
    }
}
