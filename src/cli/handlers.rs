use super::commands::{DetectArgs, SetupArgs};
use super::output::OutputFormatter;
use crate::config::{ConfigError, ProjectConfig, Settings};
use crate::error::SetupError;
use crate::fs::RealFileSystem;
use crate::install::{InstallError, NpmInstaller, PackageInstaller};
use crate::layout::{BuildTarget, TargetKind};
use crate::output::{save_builder_config, BuilderConfigRecord};
use crate::pipeline::SetupOrchestrator;
use crate::progress::LoggingHandler;
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub const EXIT_OK: i32 = 0;
pub const EXIT_SETUP_ERROR: i32 = 1;
pub const EXIT_INSTALL_ERROR: i32 = 2;

pub async fn handle_setup(args: &SetupArgs) -> i32 {
    match run_setup(args).await {
        Ok(()) => EXIT_OK,
        Err(e) => report_error(&e),
    }
}

pub fn handle_detect(args: &DetectArgs) -> i32 {
    match run_detect(args) {
        Ok(()) => EXIT_OK,
        Err(e) => report_error(&e),
    }
}

fn report_error(e: &anyhow::Error) -> i32 {
    if let Some(setup_error) = e.downcast_ref::<SetupError>() {
        eprintln!("Error [{}]: {:#}", setup_error.kind(), e);
    } else {
        eprintln!("Error: {:#}", e);
    }

    if e.downcast_ref::<InstallError>().is_some() {
        EXIT_INSTALL_ERROR
    } else {
        EXIT_SETUP_ERROR
    }
}

fn resolve_project_root(path: Option<&Path>) -> Result<PathBuf> {
    let cwd = env::current_dir().context("Failed to determine current directory")?;
    Ok(match path {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => cwd.join(p),
        None => cwd,
    })
}

fn parse_targets(specs: &[String], kind: TargetKind) -> Result<Vec<BuildTarget>, ConfigError> {
    specs
        .iter()
        .map(|spec| BuildTarget::parse(spec, kind))
        .collect()
}

/// Defaults < `makeplan.toml` < environment < flags
pub fn build_project_config(
    project_root: &Path,
    settings: &Settings,
    args: &SetupArgs,
) -> Result<ProjectConfig, ConfigError> {
    let mut config = ProjectConfig::from_settings(project_root, settings);

    let flags = [
        (&args.src_path, &mut config.src_path),
        (&args.dist_path, &mut config.dist_path),
        (&args.test_staging_path, &mut config.test_staging_path),
        (&args.doc_build_path, &mut config.doc_build_path),
        (&args.doc_src_path, &mut config.doc_src_path),
        (&args.qa_path, &mut config.qa_path),
        (&args.namespace, &mut config.namespace),
    ];
    for (value, slot) in flags {
        if let Some(value) = value {
            *slot = value.clone();
        }
    }

    config.no_doc = args.no_doc;
    config.no_lint = args.no_lint;
    config.no_test = args.no_test;
    config.is_executable = args.is_executable;
    config.with_libs = parse_targets(&args.with_libs, TargetKind::Library)?;
    config.with_executables = parse_targets(&args.with_executables, TargetKind::Executable)?;

    Ok(config)
}

async fn run_setup(args: &SetupArgs) -> Result<()> {
    let project_root = resolve_project_root(args.project_path.as_deref())?;
    let settings = Settings::load(&project_root)?;
    let config = build_project_config(&project_root, &settings, args)?;
    debug!("{}", config);

    let orchestrator = SetupOrchestrator::new(
        Arc::new(RealFileSystem::new()),
        Some(Arc::new(LoggingHandler)),
    );
    let plan = orchestrator.setup_project(&config).await?;

    let record_path =
        save_builder_config(&project_root, &BuilderConfigRecord::new(&config, &plan)).await?;
    info!(path = %record_path.display(), "Recorded builder config");

    if args.no_install {
        debug!("Skipping dependency installation");
    } else {
        let dev_paths = if args.no_dev_install {
            Vec::new()
        } else {
            settings
                .dev_paths
                .iter()
                .chain(&args.dev_paths)
                .cloned()
                .collect()
        };
        NpmInstaller::new(dev_paths)
            .install(&project_root, plan.dependencies())
            .await?;
    }

    let formatter = OutputFormatter::new(args.format.into());
    println!("{}", formatter.format_plan(&plan)?);
    Ok(())
}

fn run_detect(args: &DetectArgs) -> Result<()> {
    let project_root = resolve_project_root(args.project_path.as_deref())?;
    let settings = Settings::load(&project_root)?;

    let mut config = ProjectConfig::from_settings(&project_root, &settings);
    if let Some(src_path) = &args.src_path {
        config.src_path = src_path.clone();
    }
    config.is_executable = args.is_executable;

    let orchestrator = SetupOrchestrator::new(Arc::new(RealFileSystem::new()), None);
    let resolved = orchestrator.resolve_targets(&config)?;

    let formatter = OutputFormatter::new(args.format.into());
    println!("{}", formatter.format_targets(&resolved)?);
    Ok(())
}
