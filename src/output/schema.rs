//! BuildPlan: the merged result of one setup run
//!
//! Serialized as
//!
//! ```json
//! { "dependencies": ["..."], "scripts": [{ "builder": "...", "version": "...", "priority": 0, "path": "make/0-locations.mk", "purpose": "..." }] }
//! ```

use crate::config::ProjectConfig;
use crate::fragments::{GeneratorOutput, ScriptFragment, ToolDependency};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const BUILDER_CONFIG_DIR: &str = ".makeplan";
pub const BUILDER_CONFIG_FILE: &str = "builder-config.json";

/// Deduplicated, lexicographically ordered dependencies plus priority-ordered scripts.
///
/// Only constructed through [`BuildPlan::merge`] (or deserialization), so the
/// ordering invariants hold for every instance handed out by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    dependencies: Vec<ToolDependency>,
    scripts: Vec<ScriptFragment>,
}

impl BuildPlan {
    /// Unions dependencies and stable-sorts fragments by priority.
    ///
    /// Fragments sharing a priority keep the order in which `outputs` yields them.
    pub fn merge<I>(outputs: I) -> Self
    where
        I: IntoIterator<Item = GeneratorOutput>,
    {
        let mut dependencies = BTreeSet::new();
        let mut scripts = Vec::new();

        for output in outputs {
            dependencies.extend(output.dependencies);
            scripts.extend(output.fragments);
        }
        scripts.sort_by_key(|s| s.priority);

        Self {
            dependencies: dependencies.into_iter().collect(),
            scripts,
        }
    }

    pub fn dependencies(&self) -> &[ToolDependency] {
        &self.dependencies
    }

    pub fn scripts(&self) -> &[ScriptFragment] {
        &self.scripts
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize BuildPlan to JSON")
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize BuildPlan to YAML")
    }
}

impl fmt::Display for BuildPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scripts ({}):", self.scripts.len())?;
        for script in &self.scripts {
            writeln!(f, "  [{:>3}] {}", script.priority, script.path)?;
            writeln!(f, "        {}", script.purpose)?;
        }

        if self.dependencies.is_empty() {
            writeln!(f, "Dependencies: none")?;
        } else {
            writeln!(f, "Dependencies ({}):", self.dependencies.len())?;
            for dep in &self.dependencies {
                writeln!(f, "  - {}", dep)?;
            }
        }

        Ok(())
    }
}

/// Effective options plus the plan they produced, persisted after each CLI run
#[derive(Debug, Serialize)]
pub struct BuilderConfigRecord<'a> {
    pub config: &'a ProjectConfig,
    #[serde(flatten)]
    pub plan: &'a BuildPlan,
}

impl<'a> BuilderConfigRecord<'a> {
    pub fn new(config: &'a ProjectConfig, plan: &'a BuildPlan) -> Self {
        Self { config, plan }
    }
}

pub fn builder_config_path(project_root: &Path) -> PathBuf {
    project_root
        .join(BUILDER_CONFIG_DIR)
        .join(BUILDER_CONFIG_FILE)
}

/// Writes the record as pretty JSON, replacing any previous record.
pub async fn save_builder_config(
    project_root: &Path,
    record: &BuilderConfigRecord<'_>,
) -> Result<PathBuf> {
    let path = builder_config_path(project_root);
    let json =
        serde_json::to_string_pretty(record).context("Failed to serialize builder config")?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(&path, json + "\n")
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    debug!(path = %path.display(), "Saved builder config");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fragment(priority: u32, slug: &str) -> ScriptFragment {
        ScriptFragment {
            builder: "makeplan".to_string(),
            version: "0.3.0".to_string(),
            priority,
            path: format!("make/{}-{}.mk", priority, slug),
            purpose: format!("{} purpose", slug),
        }
    }

    fn output(deps: &[&str], fragments: Vec<ScriptFragment>) -> GeneratorOutput {
        GeneratorOutput::new(deps.iter().map(|d| ToolDependency::from(*d)).collect(), fragments)
    }

    fn paths(plan: &BuildPlan) -> Vec<&str> {
        plan.scripts().iter().map(|s| s.path.as_str()).collect()
    }

    #[test]
    fn test_merge_orders_by_priority() {
        let plan = BuildPlan::merge(vec![
            output(&[], vec![fragment(95, "infra-targets")]),
            output(&["b"], vec![fragment(55, "lint")]),
            output(&["a"], vec![fragment(0, "locations")]),
        ]);

        assert_eq!(
            paths(&plan),
            vec!["make/0-locations.mk", "make/55-lint.mk", "make/95-infra-targets.mk"]
        );
    }

    #[test]
    fn test_merge_ties_keep_input_order() {
        let plan = BuildPlan::merge(vec![
            output(&[], vec![fragment(55, "lint")]),
            output(&[], vec![fragment(50, "b-js"), fragment(50, "a-js")]),
            output(&[], vec![fragment(55, "test")]),
        ]);

        assert_eq!(
            paths(&plan),
            vec![
                "make/50-b-js.mk",
                "make/50-a-js.mk",
                "make/55-lint.mk",
                "make/55-test.mk"
            ]
        );
    }

    #[test]
    fn test_dependency_union_is_order_independent() {
        let forward = BuildPlan::merge(vec![
            output(&["eslint", "jest"], Vec::new()),
            output(&["rollup", "eslint"], Vec::new()),
        ]);
        let reverse = BuildPlan::merge(vec![
            output(&["rollup", "eslint"], Vec::new()),
            output(&["eslint", "jest"], Vec::new()),
        ]);

        assert_eq!(forward.dependencies(), reverse.dependencies());
        let ids: Vec<&str> = forward.dependencies().iter().map(|d| d.as_str()).collect();
        assert_eq!(ids, vec!["eslint", "jest", "rollup"]);
    }

    #[test]
    fn test_serialized_shape() {
        let plan = BuildPlan::merge(vec![output(&["eslint"], vec![fragment(55, "lint")])]);

        let value: serde_json::Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();
        assert_eq!(value["dependencies"], serde_json::json!(["eslint"]));
        assert_eq!(value["scripts"][0]["path"], "make/55-lint.mk");
        assert_eq!(value["scripts"][0]["builder"], "makeplan");

        let yaml = plan.to_yaml().unwrap();
        assert!(yaml.contains("dependencies:"));
        assert!(yaml.contains("- eslint"));
    }

    #[test]
    fn test_display() {
        let plan = BuildPlan::merge(vec![output(&[], vec![fragment(0, "locations")])]);
        let text = plan.to_string();

        assert!(text.contains("Scripts (1):"));
        assert!(text.contains("[  0] make/0-locations.mk"));
        assert!(text.contains("Dependencies: none"));
    }

    #[tokio::test]
    async fn test_save_builder_config_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = ProjectConfig::new(temp_dir.path());
        let first = BuildPlan::merge(vec![output(&["a"], vec![fragment(0, "locations")])]);

        let path = save_builder_config(temp_dir.path(), &BuilderConfigRecord::new(&config, &first))
            .await
            .unwrap();
        assert_eq!(path, temp_dir.path().join(".makeplan/builder-config.json"));

        config.no_lint = true;
        let second = BuildPlan::merge(vec![output(&["b"], Vec::new())]);
        save_builder_config(temp_dir.path(), &BuilderConfigRecord::new(&config, &second))
            .await
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["config"]["noLint"], true);
        assert_eq!(value["dependencies"], serde_json::json!(["b"]));
        assert_eq!(value["scripts"], serde_json::json!([]));
    }
}
