//! Unit test rules: stage transpiled sources and data, run jest, keep coverage

use super::{
    single_fragment, write_fragment, FragmentGenerator, GeneratorOutput, PlannedFragment,
    ToolDependency,
};
use crate::pipeline::GeneratorContext;
use anyhow::Result;
use async_trait::async_trait;

pub const PRIORITY: u32 = 55;
pub const SLUG: &str = "test";

pub struct TestGenerator;

impl TestGenerator {
    fn body(ctx: &GeneratorContext) -> String {
        // jest ignores external source maps, so the staged sources inline them
        format!(
            "#####\n\
             # test rules\n\
             #####\n\
             \n\
             {report}:=$(QA)/unit-test.txt\n\
             {marker}:=$(QA)/.unit-test.passed\n\
             {coverage}:=$(QA)/coverage\n\
             TEST_TARGETS+=$({report}) $({marker}) $({coverage})\n\
             PRECIOUS_TARGETS+=$({report})\n\
             \n\
             $({data_built}): $(TEST_STAGING)/%: $(SRC)/%\n\
             \t@echo \"Copying test data...\"\n\
             \t@mkdir -p $(dir $@)\n\
             \t@cp $< $@\n\
             \n\
             $({files_built}) &: $({all_src})\n\
             \trm -rf $(TEST_STAGING)\n\
             \tmkdir -p $(TEST_STAGING)\n\
             \tNODE_ENV=test $({babel}) \\\n\
             \t\t--config-file=$({babel_config}) \\\n\
             \t\t--out-dir=./$(TEST_STAGING) \\\n\
             \t\t--source-maps=inline \\\n\
             \t\t$(SRC)\n\
             \n\
             $({marker}) $({report}) $(TEST_STAGING)/coverage &: package.json $({files_built}) $({data_built})\n\
             \trm -f $@\n\
             \tmkdir -p $(dir $@)\n\
             \techo -n 'Test git rev: ' > $({report})\n\
             \tgit rev-parse HEAD >> $({report})\n\
             \t( set -e; set -o pipefail; \\\n\
             \t  ( cd $(TEST_STAGING) && $({jest}) \\\n\
             \t    --config=$({jest_config}) \\\n\
             \t    --runInBand \\\n\
             \t    $(TEST) 2>&1 ) \\\n\
             \t  | tee -a $({report}); \\\n\
             \t  touch $({marker}) )\n\
             \n\
             $({coverage}): $({marker}) $(TEST_STAGING)/coverage\n\
             \trm -rf $({coverage})\n\
             \tmkdir -p $({coverage})\n\
             \tcp -r $(TEST_STAGING)/coverage/* $({coverage})\n\
             \n\
             #####\n\
             # end test\n\
             #####\n",
            report = ctx.var("TEST_REPORT"),
            marker = ctx.var("TEST_PASS_MARKER"),
            coverage = ctx.var("COVERAGE_REPORTS"),
            data_built = ctx.var("TEST_DATA_BUILT"),
            files_built = ctx.var("TEST_FILES_BUILT"),
            all_src = ctx.var("ALL_JS_FILES_SRC"),
            babel = ctx.var("BABEL"),
            babel_config = ctx.var("BABEL_CONFIG"),
            jest = ctx.var("JEST"),
            jest_config = ctx.var("JEST_CONFIG"),
        )
    }
}

#[async_trait]
impl FragmentGenerator for TestGenerator {
    fn name(&self) -> &'static str {
        "test"
    }

    fn is_enabled(&self, ctx: &GeneratorContext) -> bool {
        !ctx.config.no_test
    }

    fn planned_fragments(&self, _ctx: &GeneratorContext) -> Vec<PlannedFragment> {
        single_fragment(self.name(), PRIORITY, SLUG)
    }

    async fn generate(&self, ctx: &GeneratorContext) -> Result<GeneratorOutput> {
        let fragment = write_fragment(
            ctx,
            PRIORITY,
            SLUG,
            "Provides test functionality with jest.",
            &Self::body(ctx),
        )
        .await?;

        let toolchain = &ctx.config.toolchain;
        Ok(GeneratorOutput::new(
            vec![
                ToolDependency::new(toolchain.eslint_resource.as_str()),
                ToolDependency::new(toolchain.build_resource.as_str()),
            ],
            vec![fragment],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragments::test_support::{context, project, read};

    #[tokio::test]
    async fn test_test_fragment() {
        let temp_dir = project();
        let mut ctx = context(temp_dir.path(), Vec::new());
        ctx.config.namespace = "CATALYST".to_string();

        let output = TestGenerator.generate(&ctx).await.unwrap();

        assert_eq!(output.dependencies.len(), 2);
        assert_eq!(output.fragments[0].path, "make/55-test.mk");
        assert_eq!(output.fragments[0].purpose, "Provides test functionality with jest.");

        let contents = read(temp_dir.path(), "make/55-test.mk");
        assert!(contents.contains("CATALYST_TEST_REPORT:=$(QA)/unit-test.txt\n"));
        assert!(contents.contains("$(CATALYST_TEST_FILES_BUILT) &: $(CATALYST_ALL_JS_FILES_SRC)\n"));
        assert!(contents.contains("\t  ( cd $(TEST_STAGING) && $(CATALYST_JEST) \\\n"));
        assert!(!contents.contains("SDLC_"));
    }

    #[test]
    fn test_disabled_by_no_test() {
        let mut ctx = context(std::path::Path::new("/pkg"), Vec::new());
        ctx.config.no_test = true;
        assert!(!TestGenerator.is_enabled(&ctx));
    }
}
