//! Naming and writing of `make/<priority>-<slug>.mk` fragment files

use super::types::{Priority, ScriptFragment};
use crate::config::{BuilderInfo, MAKE_DIR};
use crate::pipeline::GeneratorContext;
use anyhow::{Context, Result};
use tracing::debug;

/// Project-root relative path of a fragment. Always `/`-separated.
pub fn fragment_path(priority: Priority, slug: &str) -> String {
    format!("{}/{}-{}.mk", MAKE_DIR, priority, slug)
}

/// Lower-cases `name` and collapses each run of characters outside `[a-z0-9-]` into one `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_run = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            slug.push(c);
            in_run = false;
        } else if !in_run {
            slug.push('-');
            in_run = true;
        }
    }

    slug
}

/// Upper snake case make variable suffix for a slug, e.g. `FOO_EXEC_JS` for `foo-exec-js`.
///
/// Injective over [`slugify`] output, so distinct fragment paths never share a variable.
pub fn slug_var_suffix(slug: &str) -> String {
    slug.to_ascii_uppercase().replace('-', "_")
}

pub fn generated_file_notice(builder: &BuilderInfo) -> String {
    format!(
        "# This file was generated by {}@{}.\n\
         # Do not edit it by hand; re-run setup to regenerate it.\n",
        builder.name, builder.version
    )
}

/// Writes one fragment under the project's `make/` directory and returns its metadata.
///
/// The `make/` directory must already exist.
pub async fn write_fragment(
    ctx: &GeneratorContext,
    priority: Priority,
    slug: &str,
    purpose: impl Into<String>,
    body: &str,
) -> Result<ScriptFragment> {
    let builder = &ctx.config.builder;
    let path = fragment_path(priority, slug);
    let abs_path = ctx.config.project_root.join(&path);

    let mut contents = generated_file_notice(builder);
    contents.push('\n');
    contents.push_str(body);
    if !contents.ends_with('\n') {
        contents.push('\n');
    }

    tokio::fs::write(&abs_path, contents)
        .await
        .with_context(|| format!("Failed to write fragment {}", abs_path.display()))?;
    debug!(path = %path, priority, "Wrote fragment");

    Ok(ScriptFragment {
        builder: builder.name.clone(),
        version: builder.version.clone(),
        priority,
        path,
        purpose: purpose.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use tempfile::TempDir;
    use yare::parameterized;

    #[parameterized(
        plain = { "foo.js", "foo-js" },
        upper = { "Foo.MJS", "foo-mjs" },
        run_collapsed = { "my lib__v2.js", "my-lib-v2-js" },
        dash_kept = { "foo-exec.cjs", "foo-exec-cjs" },
    )]
    fn test_slugify(input: &str, expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[parameterized(
        dotted = { "foo.js", "FOO_JS" },
        dashed = { "foo-exec.js", "FOO_EXEC_JS" },
        camel = { "myTool.mjs", "MYTOOL_MJS" },
        underscored = { "foo_js.js", "FOO_JS_JS" },
        digits = { "v2build.js", "V2BUILD_JS" },
    )]
    fn test_slug_var_suffix(file_name: &str, expected: &str) {
        assert_eq!(slug_var_suffix(&slugify(file_name)), expected);
    }

    #[test]
    fn test_distinct_slugs_give_distinct_vars() {
        let names = ["fooJs.js", "foo_js.js", "foo-js.js", "foo.js.js", "FOO.JS"];
        let slugs: std::collections::BTreeSet<String> = names.iter().map(|n| slugify(n)).collect();
        let vars: std::collections::BTreeSet<String> =
            slugs.iter().map(|s| slug_var_suffix(s)).collect();
        assert_eq!(slugs.len(), vars.len());
    }

    #[test]
    fn test_fragment_path() {
        assert_eq!(fragment_path(50, "foo-js"), "make/50-foo-js.mk");
        assert_eq!(fragment_path(0, "locations"), "make/0-locations.mk");
    }

    #[tokio::test]
    async fn test_write_fragment() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("make")).unwrap();
        let ctx = GeneratorContext::new(ProjectConfig::new(temp_dir.path()), Vec::new());

        let fragment = write_fragment(&ctx, 15, "data-finder", "Finds data.", "X:=1")
            .await
            .unwrap();

        assert_eq!(fragment.path, "make/15-data-finder.mk");
        assert_eq!(fragment.priority, 15);
        assert_eq!(fragment.builder, crate::NAME);

        let written = std::fs::read_to_string(temp_dir.path().join(&fragment.path)).unwrap();
        assert!(written.starts_with("# This file was generated by makeplan@"));
        assert!(written.ends_with("X:=1\n"));
    }

    #[tokio::test]
    async fn test_write_fragment_without_make_dir_fails() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = GeneratorContext::new(ProjectConfig::new(temp_dir.path()), Vec::new());

        let result = write_fragment(&ctx, 0, "locations", "", "").await;
        assert!(result.is_err());
    }
}
