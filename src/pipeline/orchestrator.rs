use super::context::GeneratorContext;
use crate::config::ProjectConfig;
use crate::error::SetupError;
use crate::fragments::{FragmentGenerator, GeneratorOutput, GeneratorRegistry};
use crate::fs::FileSystem;
use crate::layout::{BuildTarget, LayoutClassifier, PackageManifest};
use crate::output::BuildPlan;
use crate::progress::{ProgressEvent, ProgressHandler};
use anyhow::Context;
use futures_util::future::try_join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Targets for a run and whether they came from layout classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTargets {
    pub targets: Vec<BuildTarget>,
    pub inferred: bool,
}

/// Drives one `setup_project` run: validation, target resolution, generator
/// fan-out, and the merge into a [`BuildPlan`].
pub struct SetupOrchestrator {
    fs: Arc<dyn FileSystem>,
    registry: GeneratorRegistry,
    progress_handler: Option<Arc<dyn ProgressHandler>>,
}

impl SetupOrchestrator {
    pub fn new(fs: Arc<dyn FileSystem>, progress_handler: Option<Arc<dyn ProgressHandler>>) -> Self {
        Self::with_registry(fs, GeneratorRegistry::with_defaults(), progress_handler)
    }

    pub fn with_registry(
        fs: Arc<dyn FileSystem>,
        registry: GeneratorRegistry,
        progress_handler: Option<Arc<dyn ProgressHandler>>,
    ) -> Self {
        Self {
            fs,
            registry,
            progress_handler,
        }
    }

    fn notify(&self, event: ProgressEvent) {
        if let Some(handler) = &self.progress_handler {
            handler.on_progress(&event);
        }
    }

    /// Validates preconditions and resolves build targets without writing anything.
    pub fn resolve_targets(&self, config: &ProjectConfig) -> Result<ResolvedTargets, SetupError> {
        resolve_targets_with(self.fs.as_ref(), config)
    }

    pub async fn setup_project(&self, config: &ProjectConfig) -> Result<BuildPlan, SetupError> {
        let start = Instant::now();
        self.notify(ProgressEvent::Started {
            project_root: config.project_root.display().to_string(),
        });

        match self.run(config).await {
            Ok(plan) => {
                info!(
                    scripts = plan.scripts().len(),
                    dependencies = plan.dependencies().len(),
                    "Build plan assembled"
                );
                self.notify(ProgressEvent::Completed {
                    scripts: plan.scripts().len(),
                    dependencies: plan.dependencies().len(),
                    total_time: start.elapsed(),
                });
                Ok(plan)
            }
            Err(e) => {
                self.notify(ProgressEvent::Failed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn run(&self, config: &ProjectConfig) -> Result<BuildPlan, SetupError> {
        // FileSystem reads block, so resolution runs off the async workers.
        let fs = Arc::clone(&self.fs);
        let owned_config = config.clone();
        let resolved =
            tokio::task::spawn_blocking(move || resolve_targets_with(fs.as_ref(), &owned_config))
                .await
                .context("Target resolution task failed")??;
        self.notify(ProgressEvent::TargetsResolved {
            targets: resolved.targets.len(),
            inferred: resolved.inferred,
        });

        let ctx = GeneratorContext::new(config.clone(), resolved.targets);
        let generators = self.registry.enabled(&ctx);
        check_fragment_paths(&generators, &ctx)?;

        let make_dir = ctx.make_dir();
        tokio::fs::create_dir_all(&make_dir)
            .await
            .with_context(|| format!("Failed to create {}", make_dir.display()))?;

        let outputs = try_join_all(
            generators
                .iter()
                .map(|generator| self.run_generator(generator.as_ref(), &ctx)),
        )
        .await?;

        Ok(BuildPlan::merge(outputs))
    }

    async fn run_generator(
        &self,
        generator: &dyn FragmentGenerator,
        ctx: &GeneratorContext,
    ) -> Result<GeneratorOutput, SetupError> {
        let name = generator.name();
        self.notify(ProgressEvent::GeneratorStarted {
            generator: name.to_string(),
        });

        let started = Instant::now();
        let output = generator
            .generate(ctx)
            .await
            .map_err(|source| SetupError::Generator {
                generator: name,
                source,
            })?;

        self.notify(ProgressEvent::GeneratorComplete {
            generator: name.to_string(),
            fragments: output.fragments.len(),
            duration: started.elapsed(),
        });
        Ok(output)
    }
}

/// Explicit `withLibs` / `withExecutables` win; otherwise the source layout is
/// classified using `main` from `package.json`.
fn resolve_targets_with(
    fs: &dyn FileSystem,
    config: &ProjectConfig,
) -> Result<ResolvedTargets, SetupError> {
    config.validate()?;

    let manifest_path = config.package_manifest_path();
    if !fs.is_file(&manifest_path) {
        return Err(SetupError::MissingPackageRoot(config.project_root.clone()));
    }

    let source_root = config.source_root();
    if !fs.is_dir(&source_root) {
        return Err(SetupError::MissingSourceDir(source_root));
    }

    if config.has_explicit_targets() {
        debug!(
            libs = config.with_libs.len(),
            executables = config.with_executables.len(),
            "Using explicit build targets"
        );
        let targets = config
            .with_libs
            .iter()
            .chain(&config.with_executables)
            .cloned()
            .collect();
        return Ok(ResolvedTargets {
            targets,
            inferred: false,
        });
    }

    let manifest = PackageManifest::load(fs, &config.project_root)?;
    let main = manifest.require_main(&config.project_root)?;
    let targets = LayoutClassifier::new(fs).classify(
        &source_root,
        main,
        config.is_executable,
    )?;

    if targets.is_empty() {
        return Err(SetupError::NoBuildTargetsIdentified);
    }

    Ok(ResolvedTargets {
        targets,
        inferred: true,
    })
}

/// Fails when two planned fragments share a path, before any file is written.
fn check_fragment_paths(
    generators: &[Arc<dyn FragmentGenerator>],
    ctx: &GeneratorContext,
) -> Result<(), SetupError> {
    let mut owners: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for generator in generators {
        for planned in generator.planned_fragments(ctx) {
            owners.entry(planned.path).or_default().push(planned.owner);
        }
    }

    match owners.into_iter().find(|(_, owners)| owners.len() > 1) {
        Some((path, targets)) => Err(SetupError::FragmentPathCollision { path, targets }),
        None => Ok(()),
    }
}
