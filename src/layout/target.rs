//! Build target model: one buildable artifact resolved from the source tree or supplied by the caller

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Library,
    Executable,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Library => "library",
            TargetKind::Executable => "executable",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `entry` is relative to the source root, `output` to the distribution root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildTarget {
    pub entry: String,
    pub output: String,
    pub kind: TargetKind,
}

impl BuildTarget {
    pub fn new(entry: impl Into<String>, output: impl Into<String>, kind: TargetKind) -> Self {
        Self {
            entry: entry.into(),
            output: output.into(),
            kind,
        }
    }

    pub fn library(entry: impl Into<String>, output: impl Into<String>) -> Self {
        Self::new(entry, output, TargetKind::Library)
    }

    pub fn executable(entry: impl Into<String>, output: impl Into<String>) -> Self {
        Self::new(entry, output, TargetKind::Executable)
    }

    /// Parses the `<entryFile>:<outputFile>` form used by `withLibs` / `withExecutables`.
    pub fn parse(spec: &str, kind: TargetKind) -> Result<Self, ConfigError> {
        let (entry, output) = spec
            .split_once(':')
            .ok_or_else(|| ConfigError::InvalidTargetSpec(spec.to_string()))?;
        let (entry, output) = (entry.trim(), output.trim());

        if entry.is_empty() || output.is_empty() || output.contains(':') {
            return Err(ConfigError::InvalidTargetSpec(spec.to_string()));
        }

        Ok(Self::new(entry, output, kind))
    }

    /// Last path component of the output, e.g. `foo.js` for `dist/foo.js`.
    pub fn output_file_name(&self) -> &str {
        self.output
            .rsplit('/')
            .find(|part| !part.is_empty())
            .unwrap_or(&self.output)
    }

    pub fn spec(&self) -> String {
        format!("{}:{}", self.entry, self.output)
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.spec())
    }
}
