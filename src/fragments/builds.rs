//! One build fragment per resolved target
//!
//! Library and executable targets go through the same routine; executables
//! additionally get a shebang preamble and the executable bit.

use super::writer::slug_var_suffix;
use super::{
    fragment_path, slugify, write_fragment, FragmentGenerator, GeneratorOutput, PlannedFragment,
    ScriptFragment, ToolDependency,
};
use crate::layout::{BuildTarget, TargetKind};
use crate::pipeline::GeneratorContext;
use anyhow::Result;
use async_trait::async_trait;
use futures_util::future::try_join_all;
use tracing::info;

pub const PRIORITY: u32 = 50;

const EXEC_PREAMBLE: &str = "#!/usr/bin/env -S node --enable-source-maps";

pub struct BuildGenerator {
    kind: TargetKind,
}

impl BuildGenerator {
    pub fn new(kind: TargetKind) -> Self {
        Self { kind }
    }

    pub fn slug(target: &BuildTarget) -> String {
        slugify(target.output_file_name())
    }

    fn body(ctx: &GeneratorContext, target: &BuildTarget) -> String {
        let var = ctx.var(&slug_var_suffix(&Self::slug(target)));
        let (preamble, chmod) = match target.kind {
            TargetKind::Executable => (
                format!("\t  JS_OUT_PREAMBLE='{}' \\\n", EXEC_PREAMBLE),
                "\tchmod a+x $@\n",
            ),
            TargetKind::Library => (String::new(), ""),
        };

        format!(
            "#####\n\
             # build {output}\n\
             #####\n\
             \n\
             {var}:=$(DIST)/{file_name}\n\
             {var}_ENTRY=$(SRC)/{entry}\n\
             BUILD_TARGETS+=$({var})\n\
             \n\
             $({var}): package.json $({all_src})\n\
             \tJS_BUILD_TARGET=$({var}_ENTRY) \\\n\
             \t  JS_OUT=$@ \\\n\
             {preamble}\
             \t  $({rollup}) --config $({rollup_config})\n\
             {chmod}\
             \n\
             #####\n\
             # end {output}\n\
             #####\n",
            output = target.output,
            file_name = target.output_file_name(),
            entry = target.entry,
            all_src = ctx.var("ALL_NON_TEST_JS_FILES_SRC"),
            rollup = ctx.var("ROLLUP"),
            rollup_config = ctx.var("ROLLUP_CONFIG"),
        )
    }

    async fn generate_target(
        ctx: &GeneratorContext,
        target: &BuildTarget,
    ) -> Result<ScriptFragment> {
        info!(kind = %target.kind, output = %target.output, "Creating build script");
        write_fragment(
            ctx,
            PRIORITY,
            &Self::slug(target),
            format!("Builds the '{}' artifact.", target.output),
            &Self::body(ctx, target),
        )
        .await
    }
}

#[async_trait]
impl FragmentGenerator for BuildGenerator {
    fn name(&self) -> &'static str {
        match self.kind {
            TargetKind::Library => "library-builds",
            TargetKind::Executable => "executable-builds",
        }
    }

    fn is_enabled(&self, ctx: &GeneratorContext) -> bool {
        !ctx.targets(self.kind).is_empty()
    }

    fn planned_fragments(&self, ctx: &GeneratorContext) -> Vec<PlannedFragment> {
        ctx.targets(self.kind)
            .iter()
            .map(|target| PlannedFragment {
                path: fragment_path(PRIORITY, &Self::slug(target)),
                owner: target.to_string(),
            })
            .collect()
    }

    async fn generate(&self, ctx: &GeneratorContext) -> Result<GeneratorOutput> {
        let fragments = try_join_all(
            ctx.targets(self.kind)
                .iter()
                .map(|target| Self::generate_target(ctx, target)),
        )
        .await?;

        Ok(GeneratorOutput::new(
            vec![ToolDependency::new(ctx.config.toolchain.build_resource.as_str())],
            fragments,
        ))
    }
}
