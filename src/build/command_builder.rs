//! Command artifact builder - default build collaborator
//!
//! Runs the build command configured for the project (if any), then lifts the
//! entries of the build manifest the pipeline produced into `BuildResult`s
//! carrying the project's package and configuration snapshots.

use crate::core::config_loader::ConfigLoader;
use crate::core::options::BuildOptions;
use crate::core::traits::ArtifactBuilder;
use crate::core::types::{BuildResult, current_arch, current_platform};
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;

/// Manifest location when the build section does not name one
pub const DEFAULT_BUILD_MANIFEST: &str = "out/build-manifest.json";

/// One build manifest entry, as written by the build pipeline
#[derive(Debug, Deserialize)]
struct BuildManifestEntry {
    artifacts: Vec<PathBuf>,
    platform: Option<String>,
    arch: Option<String>,
}

/// Default `ArtifactBuilder`: configured build command + build manifest
#[derive(Debug, Default)]
pub struct CommandArtifactBuilder;

impl CommandArtifactBuilder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ArtifactBuilder for CommandArtifactBuilder {
    async fn build(&self, dir: &Path, options: &BuildOptions) -> anyhow::Result<Vec<BuildResult>> {
        let config = ConfigLoader::load(dir).await?;

        if let Some(build) = &config.build
            && let Some(command) = &build.command
        {
            let output = Command::new(command)
                .args(&build.args)
                .current_dir(dir)
                .output()
                .await
                .with_context(|| format!("failed to run build command {}", command))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                anyhow::bail!(
                    "build command {} exited with {}: {}",
                    command,
                    output.status,
                    stderr.trim()
                );
            }
        }

        let manifest_path = dir.join(
            config
                .build
                .as_ref()
                .and_then(|build| build.manifest.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_MANIFEST)),
        );
        let content = fs::read_to_string(&manifest_path)
            .await
            .with_context(|| format!("build manifest not found: {}", manifest_path.display()))?;
        let entries: Vec<BuildManifestEntry> = serde_json::from_str(&content)
            .with_context(|| format!("invalid build manifest: {}", manifest_path.display()))?;

        let results = entries
            .into_iter()
            .map(|entry| BuildResult {
                artifacts: entry
                    .artifacts
                    .into_iter()
                    .map(|path| if path.is_relative() { dir.join(path) } else { path })
                    .collect(),
                platform: entry
                    .platform
                    .or_else(|| options.platform.clone())
                    .unwrap_or_else(|| current_platform().to_string()),
                arch: entry
                    .arch
                    .or_else(|| options.arch.clone())
                    .unwrap_or_else(|| current_arch().to_string()),
                package: config.package.clone(),
                config: config.clone(),
            })
            .collect();

        Ok(results)
    }
}
