pub mod context;
pub mod orchestrator;

pub use context::GeneratorContext;
pub use orchestrator::{ResolvedTargets, SetupOrchestrator};
