use super::{single_fragment, write_fragment, FragmentGenerator, GeneratorOutput, PlannedFragment};
use crate::pipeline::GeneratorContext;
use anyhow::Result;
use async_trait::async_trait;

pub const PRIORITY: u32 = 20;
pub const SLUG: &str = "js-src-finder";

/// Lists the JS sources to build and test; test data is excluded via the data selector.
pub struct JsFilesGenerator;

impl JsFilesGenerator {
    fn body(ctx: &GeneratorContext) -> String {
        let js = ctx.var("JS_SELECTOR");
        let data = ctx.var("DATA_SELECTOR");
        let all_src = ctx.var("ALL_JS_FILES_SRC");
        let mut body = format!(
            "{js}=\\( -name \"*.js\" -o -name \"*.cjs\" -o -name \"*.mjs\" \\)\n\
             \n\
             # all source files (cli and lib)\n\
             {all_src}:=$(shell find $(SRC) $({js}) -not $({data}) -type f)\n\
             # source files less tests\n\
             {non_test}:=$(shell find $(SRC) $({js}) -not $({data}) -not -path \"*/test/*\" -not -name \"*.test.*\" -type f)\n",
            non_test = ctx.var("ALL_NON_TEST_JS_FILES_SRC"),
        );

        if !ctx.config.no_test {
            body.push_str(&format!(
                "{}:=$(patsubst %.cjs, %.js, $(patsubst %.mjs, %.js, $(patsubst $(SRC)/%, $(TEST_STAGING)/%, $({}))))\n",
                ctx.var("TEST_FILES_BUILT"),
                all_src
            ));
        }

        body
    }
}

#[async_trait]
impl FragmentGenerator for JsFilesGenerator {
    fn name(&self) -> &'static str {
        "js-src-finder"
    }

    fn planned_fragments(&self, _ctx: &GeneratorContext) -> Vec<PlannedFragment> {
        single_fragment(self.name(), PRIORITY, SLUG)
    }

    async fn generate(&self, ctx: &GeneratorContext) -> Result<GeneratorOutput> {
        let fragment = write_fragment(
            ctx,
            PRIORITY,
            SLUG,
            "Sets up vars listing JS files which will need to be tested and built.",
            &Self::body(ctx),
        )
        .await?;

        Ok(GeneratorOutput::fragments_only(vec![fragment]))
    }
}
