use super::{InstallError, PackageInstaller};
use crate::fragments::ToolDependency;
use crate::layout::PACKAGE_MANIFEST;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Deserialize)]
struct ManifestName {
    name: Option<String>,
}

/// `npm install --save-dev`, preferring local checkouts found under `dev_paths`
#[derive(Debug, Clone)]
pub struct NpmInstaller {
    program: String,
    dev_paths: Vec<PathBuf>,
}

impl NpmInstaller {
    pub fn new(dev_paths: Vec<PathBuf>) -> Self {
        Self::with_program("npm", dev_paths)
    }

    pub fn with_program(program: impl Into<String>, dev_paths: Vec<PathBuf>) -> Self {
        Self {
            program: program.into(),
            dev_paths,
        }
    }

    /// Maps package names to the local directories providing them.
    ///
    /// Each dev path may itself be a package or contain packages one level down;
    /// the first directory claiming a name wins.
    async fn local_packages(&self) -> Result<HashMap<String, PathBuf>, InstallError> {
        let mut packages = HashMap::new();

        for dev_path in &self.dev_paths {
            let dev_path_error = |source| InstallError::DevPath {
                path: dev_path.clone(),
                source,
            };
            let mut candidates = vec![dev_path.clone()];
            let mut entries = tokio::fs::read_dir(dev_path)
                .await
                .map_err(dev_path_error)?;
            while let Some(entry) = entries.next_entry().await.map_err(dev_path_error)? {
                candidates.push(entry.path());
            }
            candidates[1..].sort();

            for dir in candidates {
                if let Some(name) = read_package_name(&dir).await {
                    packages.entry(name).or_insert(dir);
                }
            }
        }

        Ok(packages)
    }

    /// Install arguments: a local path when a dev package matches, otherwise `<id>@latest`.
    pub async fn install_specs(
        &self,
        dependencies: &[ToolDependency],
    ) -> Result<Vec<String>, InstallError> {
        let local = if self.dev_paths.is_empty() {
            HashMap::new()
        } else {
            self.local_packages().await?
        };

        Ok(dependencies
            .iter()
            .map(|dep| match local.get(dep.as_str()) {
                Some(dir) => {
                    debug!(dependency = %dep, path = %dir.display(), "Using local package");
                    dir.display().to_string()
                }
                None => format!("{}@latest", dep),
            })
            .collect())
    }
}

async fn read_package_name(dir: &Path) -> Option<String> {
    let content = tokio::fs::read_to_string(dir.join(PACKAGE_MANIFEST))
        .await
        .ok()?;
    serde_json::from_str::<ManifestName>(&content).ok()?.name
}

#[async_trait]
impl PackageInstaller for NpmInstaller {
    async fn install(
        &self,
        project_root: &Path,
        dependencies: &[ToolDependency],
    ) -> Result<(), InstallError> {
        if dependencies.is_empty() {
            debug!("No dependencies to install");
            return Ok(());
        }

        let specs = self.install_specs(dependencies).await?;
        let command = format!("{} install --save-dev {}", self.program, specs.join(" "));
        info!(count = specs.len(), "Installing dependencies");

        let output = Command::new(&self.program)
            .arg("install")
            .arg("--save-dev")
            .args(&specs)
            .current_dir(project_root)
            .output()
            .await
            .map_err(|source| InstallError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(InstallError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(command = %command, "Install complete");
        Ok(())
    }
}
