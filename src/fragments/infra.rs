//! Makefile scaffolding: target accumulators up front, phony targets at the end

use super::{fragment_path, write_fragment, FragmentGenerator, GeneratorOutput, PlannedFragment};
use crate::pipeline::GeneratorContext;
use anyhow::Result;
use async_trait::async_trait;
use futures_util::future::try_join;

pub const VARS_PRIORITY: u32 = 1;
pub const VARS_SLUG: &str = "infra-vars";
pub const TARGETS_PRIORITY: u32 = 95;
pub const TARGETS_SLUG: &str = "infra-targets";

const ACCUMULATORS: [&str; 5] = [
    "BUILD_TARGETS",
    "TEST_TARGETS",
    "LINT_TARGETS",
    "PRECIOUS_TARGETS",
    "DOC_TARGETS",
];

pub struct InfraGenerator;

impl InfraGenerator {
    fn vars_body() -> String {
        ACCUMULATORS
            .iter()
            .map(|var| format!("{}:=\n", var))
            .collect()
    }

    fn targets_body(ctx: &GeneratorContext) -> String {
        let config = &ctx.config;
        let mut phony = vec!["all", "build"];
        let mut all = vec!["build"];
        let mut qa = Vec::new();
        let mut rules = vec!["build: $(BUILD_TARGETS)".to_string()];
        let mut clean = vec!["$(DIST)", "$(QA)"];

        if !config.no_test {
            phony.push("test");
            qa.push("test");
            rules.push("test: $(TEST_TARGETS)".to_string());
            clean.push("$(TEST_STAGING)");
        }
        if !config.no_lint {
            phony.extend(["lint", "lint-fix"]);
            qa.push("lint");
            rules.push("lint: $(LINT_TARGETS)".to_string());
        }
        if !config.no_doc {
            phony.push("doc");
            all.push("doc");
            rules.push("doc: $(DOC_TARGETS)".to_string());
        }
        phony.extend(["qa", "clean"]);
        rules.push(format!("qa: {}", qa.join(" ")).trim_end().to_string());
        rules.push(format!("clean:\n\trm -rf {}", clean.join(" ")));

        format!(
            ".DEFAULT_GOAL:=all\n\
             .PHONY: {}\n\n\
             all: {}\n\n\
             {}\n\n\
             .PRECIOUS: $(PRECIOUS_TARGETS)\n",
            phony.join(" "),
            all.join(" "),
            rules.join("\n\n")
        )
    }
}

#[async_trait]
impl FragmentGenerator for InfraGenerator {
    fn name(&self) -> &'static str {
        "infra"
    }

    fn planned_fragments(&self, _ctx: &GeneratorContext) -> Vec<PlannedFragment> {
        [(VARS_PRIORITY, VARS_SLUG), (TARGETS_PRIORITY, TARGETS_SLUG)]
            .into_iter()
            .map(|(priority, slug)| PlannedFragment {
                path: fragment_path(priority, slug),
                owner: self.name().to_string(),
            })
            .collect()
    }

    async fn generate(&self, ctx: &GeneratorContext) -> Result<GeneratorOutput> {
        let vars_body = Self::vars_body();
        let targets_body = Self::targets_body(ctx);

        let (vars, targets) = try_join(
            write_fragment(
                ctx,
                VARS_PRIORITY,
                VARS_SLUG,
                "Initializes the target accumulator variables.",
                &vars_body,
            ),
            write_fragment(
                ctx,
                TARGETS_PRIORITY,
                TARGETS_SLUG,
                "Defines the standard phony targets over the accumulated targets.",
                &targets_body,
            ),
        )
        .await?;

        Ok(GeneratorOutput::fragments_only(vec![vars, targets]))
    }
}
