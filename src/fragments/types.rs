//! Metadata produced by fragment generators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusion order of a fragment; lower values are included first
pub type Priority = u32;

/// An external package a fragment needs at build time.
///
/// Ordered lexicographically so merged dependency sets are reproducible.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolDependency(String);

impl ToolDependency {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToolDependency {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ToolDependency {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Describes one generated file; never its content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptFragment {
    pub builder: String,
    pub version: String,
    pub priority: Priority,
    /// Project-root relative, always `make/<priority>-<slug>.mk`
    pub path: String,
    pub purpose: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorOutput {
    pub dependencies: Vec<ToolDependency>,
    pub fragments: Vec<ScriptFragment>,
}

impl GeneratorOutput {
    pub fn new(dependencies: Vec<ToolDependency>, fragments: Vec<ScriptFragment>) -> Self {
        Self {
            dependencies,
            fragments,
        }
    }

    pub fn fragments_only(fragments: Vec<ScriptFragment>) -> Self {
        Self::new(Vec::new(), fragments)
    }
}

/// A fragment path a generator will write, known before any generator runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFragment {
    pub path: String,
    pub owner: String,
}
