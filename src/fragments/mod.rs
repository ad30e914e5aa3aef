//! Makefile fragment generators
//!
//! Each generator owns one or more `make/<priority>-<slug>.mk` files. Generators
//! read only the shared [`GeneratorContext`] and never each other's output, so the
//! aggregator runs them concurrently and merges their [`GeneratorOutput`]s.

pub mod builds;
pub mod data_files;
pub mod infra;
pub mod js_files;
pub mod lint;
pub mod locations;
pub mod registry;
pub mod resources;
pub mod testing;
pub mod types;
pub mod writer;

pub use builds::BuildGenerator;
pub use data_files::DataFilesGenerator;
pub use infra::InfraGenerator;
pub use js_files::JsFilesGenerator;
pub use lint::LintGenerator;
pub use locations::LocationsGenerator;
pub use registry::GeneratorRegistry;
pub use resources::ResourcesGenerator;
pub use testing::TestGenerator;
pub use types::{GeneratorOutput, PlannedFragment, Priority, ScriptFragment, ToolDependency};
pub use writer::{fragment_path, slugify, write_fragment};

use crate::pipeline::GeneratorContext;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait FragmentGenerator: Send + Sync {
    /// Stable identifier, used in logs and error reports
    fn name(&self) -> &'static str;

    /// Whether this generator takes part in a run; disabled generators write nothing.
    fn is_enabled(&self, _ctx: &GeneratorContext) -> bool {
        true
    }

    /// Fragment paths [`generate`](Self::generate) will write, computed without side effects.
    fn planned_fragments(&self, ctx: &GeneratorContext) -> Vec<PlannedFragment>;

    async fn generate(&self, ctx: &GeneratorContext) -> Result<GeneratorOutput>;
}

/// Planned path for a generator that owns exactly one fixed fragment
fn single_fragment(name: &str, priority: Priority, slug: &str) -> Vec<PlannedFragment> {
    vec![PlannedFragment {
        path: fragment_path(priority, slug),
        owner: name.to_string(),
    }]
}
