//! Core traits for the publish pipeline
//!
//! This module defines the seams between the orchestrator and its external
//! collaborators: the artifact build pipeline and the per-target publishers.

use crate::core::config::ProjectConfig;
use crate::core::options::BuildOptions;
use crate::core::types::{BuildResult, PackageManifest};
use async_trait::async_trait;
use secrecy::SecretString;
use std::path::{Path, PathBuf};

/// Everything a publisher needs for one publish pass
///
/// Built once per orchestrator run and shared by reference across every
/// dispatched target.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// All artifact paths for this run, flattened in build order
    pub artifacts: Vec<PathBuf>,

    /// Package metadata for the release
    pub package: PackageManifest,

    /// Project configuration for the release
    pub config: ProjectConfig,

    /// Opaque authentication token, forwarded not interpreted
    pub auth_token: Option<SecretString>,

    /// Release tag (defaults to the package version)
    pub tag: String,

    /// Target platform identifier
    pub platform: String,

    /// Target architecture identifier
    pub arch: String,
}

/// A named publish destination
///
/// Stateless from the orchestrator's point of view; resolved fresh per target
/// name on every publish pass.
#[async_trait]
pub trait PublisherPlugin: Send + Sync + std::fmt::Debug {
    /// Target name this plugin was resolved for
    fn name(&self) -> &str;

    /// Publish the given artifacts to this target
    async fn publish(&self, request: &PublishRequest) -> anyhow::Result<()>;
}

/// The artifact build pipeline
///
/// Consumed once per orchestrator run that neither resumes a dry run nor
/// receives pre-supplied build results.
#[async_trait]
pub trait ArtifactBuilder: Send + Sync {
    /// Build distributables for the project at `dir`
    async fn build(&self, dir: &Path, options: &BuildOptions) -> anyhow::Result<Vec<BuildResult>>;
}
