use super::{
    BuildGenerator, DataFilesGenerator, FragmentGenerator, InfraGenerator, JsFilesGenerator,
    LintGenerator, LocationsGenerator, ResourcesGenerator, TestGenerator,
};
use crate::layout::TargetKind;
use crate::pipeline::GeneratorContext;
use std::sync::Arc;

/// Ordered set of generators driven by the aggregator.
///
/// Registration order is the tie-break for fragments sharing a priority.
#[derive(Clone)]
pub struct GeneratorRegistry {
    generators: Vec<Arc<dyn FragmentGenerator>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self {
            generators: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(LocationsGenerator));
        registry.register(Arc::new(InfraGenerator));
        registry.register(Arc::new(ResourcesGenerator));
        registry.register(Arc::new(DataFilesGenerator));
        registry.register(Arc::new(JsFilesGenerator));
        registry.register(Arc::new(BuildGenerator::new(TargetKind::Library)));
        registry.register(Arc::new(BuildGenerator::new(TargetKind::Executable)));
        registry.register(Arc::new(LintGenerator));
        registry.register(Arc::new(TestGenerator));
        registry
    }

    pub fn register(&mut self, generator: Arc<dyn FragmentGenerator>) {
        self.generators.push(generator);
    }

    pub fn enabled(&self, ctx: &GeneratorContext) -> Vec<Arc<dyn FragmentGenerator>> {
        self.generators
            .iter()
            .filter(|g| g.is_enabled(ctx))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use crate::layout::BuildTarget;

    fn names(generators: &[Arc<dyn FragmentGenerator>]) -> Vec<&'static str> {
        generators.iter().map(|g| g.name()).collect()
    }

    #[test]
    fn test_default_registration_order() {
        let registry = GeneratorRegistry::with_defaults();
        assert_eq!(
            names(&registry.generators),
            vec![
                "locations",
                "infra",
                "resources",
                "data-finder",
                "js-src-finder",
                "library-builds",
                "executable-builds",
                "lint",
                "test",
            ]
        );
    }

    #[test]
    fn test_enabled_respects_flags_and_targets() {
        let mut config = ProjectConfig::new("/pkg");
        config.no_lint = true;
        let ctx = GeneratorContext::new(
            config,
            vec![BuildTarget::library("index.js", "dist/foo.js")],
        );

        let enabled = GeneratorRegistry::with_defaults().enabled(&ctx);
        let enabled = names(&enabled);

        assert!(enabled.contains(&"library-builds"));
        assert!(!enabled.contains(&"executable-builds"));
        assert!(!enabled.contains(&"lint"));
        assert!(enabled.contains(&"test"));
    }

    #[test]
    fn test_empty_registry() {
        let registry = GeneratorRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(GeneratorRegistry::default().len(), 9);
    }
}
