use super::{
    single_fragment, write_fragment, FragmentGenerator, GeneratorOutput, PlannedFragment,
    ToolDependency,
};
use crate::pipeline::GeneratorContext;
use anyhow::Result;
use async_trait::async_trait;

pub const PRIORITY: u32 = 55;
pub const SLUG: &str = "lint";

/// Lint report and `lint-fix` rules driven by eslint
pub struct LintGenerator;

impl LintGenerator {
    fn body(ctx: &GeneratorContext) -> String {
        let report = ctx.var("LINT_REPORT");
        let marker = ctx.var("LINT_PASS_MARKER");
        let eslint = ctx.var("ESLINT");
        let eslint_config = ctx.var("ESLINT_CONFIG");

        let mut ignore = String::from("LINT_IGNORE_PATTERNS:=--ignore-pattern '$(DIST)/**/*'");
        if !ctx.config.no_test {
            ignore.push_str(" \\\n\t--ignore-pattern '$(TEST_STAGING)/**/*'");
        }
        if !ctx.config.no_doc {
            ignore.push_str(" \\\n\t--ignore-pattern '$(DOCS)/**/*'");
        }

        format!(
            "#####\n\
             # lint rules\n\
             #####\n\
             \n\
             {report}:=$(QA)/lint.txt\n\
             {marker}:=$(QA)/.lint.passed\n\
             LINT_TARGETS+=$({report}) $({marker})\n\
             PRECIOUS_TARGETS+=$({report})\n\
             \n\
             {ignore}\n\
             \n\
             $({report}) $({marker}): $({all_src})\n\
             \tmkdir -p $(dir $@)\n\
             \techo -n 'Test git rev: ' > $({report})\n\
             \tgit rev-parse HEAD >> $({report})\n\
             \t( set -e; set -o pipefail; \\\n\
             \t  $({eslint}) \\\n\
             \t    --config $({eslint_config}) \\\n\
             \t    --ext .cjs,.js,.mjs \\\n\
             \t    $(LINT_IGNORE_PATTERNS) \\\n\
             \t    . \\\n\
             \t    | tee -a $({report}); \\\n\
             \t  touch $({marker}) )\n\
             \n\
             lint-fix:\n\
             \t@( set -e; set -o pipefail; \\\n\
             \t  $({eslint}) \\\n\
             \t    --config $({eslint_config}) \\\n\
             \t    --ext .cjs,.js,.mjs \\\n\
             \t    $(LINT_IGNORE_PATTERNS) \\\n\
             \t    --fix . )\n\
             \n\
             #####\n\
             # end lint\n\
             #####\n",
            report = report,
            marker = marker,
            ignore = ignore,
            all_src = ctx.var("ALL_JS_FILES_SRC"),
            eslint = eslint,
            eslint_config = eslint_config,
        )
    }
}

#[async_trait]
impl FragmentGenerator for LintGenerator {
    fn name(&self) -> &'static str {
        "lint"
    }

    fn is_enabled(&self, ctx: &GeneratorContext) -> bool {
        !ctx.config.no_lint
    }

    fn planned_fragments(&self, _ctx: &GeneratorContext) -> Vec<PlannedFragment> {
        single_fragment(self.name(), PRIORITY, SLUG)
    }

    async fn generate(&self, ctx: &GeneratorContext) -> Result<GeneratorOutput> {
        let fragment = write_fragment(
            ctx,
            PRIORITY,
            SLUG,
            "Provides lint functionality with eslint.",
            &Self::body(ctx),
        )
        .await?;

        Ok(GeneratorOutput::new(
            vec![ToolDependency::new(ctx.config.toolchain.eslint_resource.as_str())],
            vec![fragment],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ESLINT_RESOURCE;
    use crate::fragments::test_support::{context, project, read};

    #[tokio::test]
    async fn test_lint_fragment() {
        let temp_dir = project();
        let ctx = context(temp_dir.path(), Vec::new());

        let output = LintGenerator.generate(&ctx).await.unwrap();

        assert_eq!(output.dependencies, vec![ToolDependency::from(DEFAULT_ESLINT_RESOURCE)]);
        assert_eq!(output.fragments[0].path, "make/55-lint.mk");

        let contents = read(temp_dir.path(), "make/55-lint.mk");
        assert!(contents.contains("LINT_TARGETS+=$(SDLC_LINT_REPORT) $(SDLC_LINT_PASS_MARKER)\n"));
        assert!(contents.contains("$(SDLC_LINT_REPORT) $(SDLC_LINT_PASS_MARKER): $(SDLC_ALL_JS_FILES_SRC)\n"));
        assert!(contents.contains("--ignore-pattern '$(TEST_STAGING)/**/*'"));
        assert!(contents.contains("--ignore-pattern '$(DOCS)/**/*'"));
        assert!(contents.contains("\n\tmkdir -p $(dir $@)\n"));
        assert!(contents.contains("lint-fix:\n"));
    }

    #[tokio::test]
    async fn test_ignore_patterns_follow_flags() {
        let temp_dir = project();
        let mut ctx = context(temp_dir.path(), Vec::new());
        ctx.config.no_doc = true;
        ctx.config.no_test = true;

        LintGenerator.generate(&ctx).await.unwrap();

        let contents = read(temp_dir.path(), "make/55-lint.mk");
        assert!(contents.contains("LINT_IGNORE_PATTERNS:=--ignore-pattern '$(DIST)/**/*'\n"));
        assert!(!contents.contains("$(TEST_STAGING)"));
        assert!(!contents.contains("$(DOCS)"));
    }

    #[test]
    fn test_disabled_by_no_lint() {
        let mut ctx = context(std::path::Path::new("/pkg"), Vec::new());
        assert!(LintGenerator.is_enabled(&ctx));
        ctx.config.no_lint = true;
        assert!(!LintGenerator.is_enabled(&ctx));
    }
}
