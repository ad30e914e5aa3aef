//! Output formatting for plans and detected targets

use anyhow::{Context, Result};
use serde::Serialize;

use crate::layout::BuildTarget;
use crate::output::BuildPlan;
use crate::pipeline::ResolvedTargets;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

#[derive(Serialize)]
struct TargetsView<'a> {
    inferred: bool,
    targets: &'a [BuildTarget],
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_plan(&self, plan: &BuildPlan) -> Result<String> {
        match self.format {
            OutputFormat::Json => plan.to_json(),
            OutputFormat::Yaml => plan.to_yaml(),
            OutputFormat::Human => Ok(format!(
                "{}\nCreated {} files.",
                plan,
                plan.scripts().len()
            )),
        }
    }

    pub fn format_targets(&self, resolved: &ResolvedTargets) -> Result<String> {
        let view = TargetsView {
            inferred: resolved.inferred,
            targets: &resolved.targets,
        };

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&view).context("Failed to serialize targets to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(&view).context("Failed to serialize targets to YAML")
            }
            OutputFormat::Human => Ok(self.format_targets_human(resolved)),
        }
    }

    fn format_targets_human(&self, resolved: &ResolvedTargets) -> String {
        let source = if resolved.inferred {
            "inferred from source layout"
        } else {
            "explicit"
        };

        let rows: String = resolved
            .targets
            .iter()
            .map(|target| {
                format!(
                    "  {:<10} {} -> {}\n",
                    target.kind.as_str(),
                    target.entry,
                    target.output
                )
            })
            .collect();
        format!("Build targets ({}):\n{}", source, rows)
    }
}
