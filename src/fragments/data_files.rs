use super::{single_fragment, write_fragment, FragmentGenerator, GeneratorOutput, PlannedFragment};
use crate::pipeline::GeneratorContext;
use anyhow::Result;
use async_trait::async_trait;

pub const PRIORITY: u32 = 15;
pub const SLUG: &str = "data-finder";

/// Lists test data files that get copied under the test staging dir
pub struct DataFilesGenerator;

impl DataFilesGenerator {
    fn body(ctx: &GeneratorContext) -> String {
        let selector = ctx.var("DATA_SELECTOR");
        let data_src = ctx.var("TEST_DATA_SRC");

        format!(
            "{selector}=\\( -path \"*/test/data/*\" -o -path \"*/test/data-*/*\" -o -path \"*/test-data/*\" \\)\n\
             \n\
             # all test data (cli and lib)\n\
             {data_src}:=$(shell find $(SRC) -type f $({selector}))\n\
             {data_built}:=$(patsubst $(SRC)/%, $(TEST_STAGING)/%, $({data_src}))\n",
            selector = selector,
            data_src = data_src,
            data_built = ctx.var("TEST_DATA_BUILT"),
        )
    }
}

#[async_trait]
impl FragmentGenerator for DataFilesGenerator {
    fn name(&self) -> &'static str {
        "data-finder"
    }

    fn planned_fragments(&self, _ctx: &GeneratorContext) -> Vec<PlannedFragment> {
        single_fragment(self.name(), PRIORITY, SLUG)
    }

    async fn generate(&self, ctx: &GeneratorContext) -> Result<GeneratorOutput> {
        let fragment = write_fragment(
            ctx,
            PRIORITY,
            SLUG,
            "Sets up vars listing test data files which will need to be copied under the test staging dir.",
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
    async fn test_data_finder_vars_are_consistent() {
        let temp_dir = project();
        let ctx = context(temp_dir.path(), Vec::new());

        let output = DataFilesGenerator.generate(&ctx).await.unwrap();
        assert_eq!(output.fragments[0].path, "make/15-data-finder.mk");

        let contents = read(temp_dir.path(), "make/15-data-finder.mk");
        assert!(contents.contains("SDLC_DATA_SELECTOR=\\( -path \"*/test/data/*\""));
        assert!(contents.contains("SDLC_TEST_DATA_SRC:=$(shell find $(SRC) -type f $(SDLC_DATA_SELECTOR))"));
        assert!(contents.contains(
            "SDLC_TEST_DATA_BUILT:=$(patsubst $(SRC)/%, $(TEST_STAGING)/%, $(SDLC_TEST_DATA_SRC))"
        ));
    }
}
