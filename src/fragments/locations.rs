use super::{single_fragment, write_fragment, FragmentGenerator, GeneratorOutput, PlannedFragment};
use crate::pipeline::GeneratorContext;
use anyhow::Result;
use async_trait::async_trait;

pub const PRIORITY: u32 = 0;
pub const SLUG: &str = "locations";

/// Declares the directory variables (`SRC`, `DIST`, ...) every other fragment refers to
pub struct LocationsGenerator;

impl LocationsGenerator {
    fn body(ctx: &GeneratorContext) -> String {
        let config = &ctx.config;
        let mut locations = vec![
            ("SRC", config.src_path.as_str()),
            ("DIST", config.dist_path.as_str()),
            ("QA", config.qa_path.as_str()),
        ];
        if !config.no_test {
            locations.push(("TEST_STAGING", config.test_staging_path.as_str()));
        }
        if !config.no_doc {
            locations.push(("DOCS", config.doc_build_path.as_str()));
            locations.push(("DOC_SRC", config.doc_src_path.as_str()));
        }

        locations
            .into_iter()
            .map(|(var, path)| format!("{}:={}\n", var, path))
            .collect()
    }
}

#[async_trait]
impl FragmentGenerator for LocationsGenerator {
    fn name(&self) -> &'static str {
        "locations"
    }

    fn planned_fragments(&self, _ctx: &GeneratorContext) -> Vec<PlannedFragment> {
        single_fragment(self.name(), PRIORITY, SLUG)
    }

    async fn generate(&self, ctx: &GeneratorContext) -> Result<GeneratorOutput> {
        let fragment = write_fragment(
            ctx,
            PRIORITY,
            SLUG,
            "Declares the project directory locations.",
            &Self::body(ctx),
        )
        .await?;

        Ok(GeneratorOutput::fragments_only(vec![fragment]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragments::test_support::{context, project, read};

    #[tokio::test]
    async fn test_all_locations() {
        let temp_dir = project();
        let ctx = context(temp_dir.path(), Vec::new());

        let output = LocationsGenerator.generate(&ctx).await.unwrap();

        assert!(output.dependencies.is_empty());
        assert_eq!(output.fragments[0].path, "make/0-locations.mk");
        let contents = read(temp_dir.path(), "make/0-locations.mk");
        assert!(contents.contains("SRC:=src\n"));
        assert!(contents.contains("DIST:=dist\n"));
        assert!(contents.contains("TEST_STAGING:=test-staging\n"));
        assert!(contents.contains("DOCS:=doc\n"));
    }

    #[tokio::test]
    async fn test_disabled_features_omit_locations() {
        let temp_dir = project();
        let mut ctx = context(temp_dir.path(), Vec::new());
        ctx.config.no_doc = true;
        ctx.config.no_test = true;

        LocationsGenerator.generate(&ctx).await.unwrap();

        let contents = read(temp_dir.path(), "make/0-locations.mk");
        assert!(!contents.contains("TEST_STAGING"));
        assert!(!contents.contains("DOCS"));
        assert!(contents.contains("QA:=qa\n"));
    }
}
