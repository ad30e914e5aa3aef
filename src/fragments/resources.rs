use super::{
    single_fragment, write_fragment, FragmentGenerator, GeneratorOutput, PlannedFragment,
    ToolDependency,
};
use crate::pipeline::GeneratorContext;
use anyhow::Result;
use async_trait::async_trait;

pub const PRIORITY: u32 = 10;
pub const SLUG: &str = "resources";

/// Locates the tool executables and the config files shipped in the resource packages
pub struct ResourcesGenerator;

fn explore(package: &str) -> String {
    format!("$(shell npm explore {} -- pwd)", package)
}

impl ResourcesGenerator {
    fn body(ctx: &GeneratorContext) -> String {
        let config = &ctx.config;
        let toolchain = &config.toolchain;
        let build = explore(&toolchain.build_resource);
        let mut body = format!(
            "{babel}:=npx babel\n\
             {babel_config}:={build}/dist/babel/babel.config.cjs\n\
             \n\
             {rollup}:=npx rollup\n\
             {rollup_config}:={build}/dist/rollup/rollup.config.mjs\n",
            babel = ctx.var("BABEL"),
            babel_config = ctx.var("BABEL_CONFIG"),
            rollup = ctx.var("ROLLUP"),
            rollup_config = ctx.var("ROLLUP_CONFIG"),
        );

        if !config.no_test {
            body.push_str(&format!(
                "\n{}:=npx jest\n{}:={}/dist/jest.config.js\n",
                ctx.var("JEST"),
                ctx.var("JEST_CONFIG"),
                explore(&toolchain.jest_resource)
            ));
        }

        if !config.no_lint {
            body.push_str(&format!(
                "\n{}:=npx eslint\n{}:={}/dist/eslint.config.js\n",
                ctx.var("ESLINT"),
                ctx.var("ESLINT_CONFIG"),
                explore(&toolchain.eslint_resource)
            ));
        }

        body
    }
}

#[async_trait]
impl FragmentGenerator for ResourcesGenerator {
    fn name(&self) -> &'static str {
        "resources"
    }

    fn planned_fragments(&self, _ctx: &GeneratorContext) -> Vec<PlannedFragment> {
        single_fragment(self.name(), PRIORITY, SLUG)
    }

    async fn generate(&self, ctx: &GeneratorContext) -> Result<GeneratorOutput> {
        let fragment = write_fragment(
            ctx,
            PRIORITY,
            SLUG,
            "Locates tool executables and configuration files.",
            &Self::body(ctx),
        )
        .await?;

        let toolchain = &ctx.config.toolchain;
        let dependencies = [
            &toolchain.eslint_resource,
            &toolchain.jest_resource,
            &toolchain.build_resource,
        ]
        .into_iter()
        .map(|id| ToolDependency::new(id.as_str()))
        .collect();

        Ok(GeneratorOutput::new(dependencies, vec![fragment]))
    }
}
