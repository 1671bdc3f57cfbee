//! Publish orchestrator - the top-level publish state machine
//!
//! Validates option combinations, decides whether to build, resume a dry run,
//! or use pre-supplied build results, then either persists a dry-run snapshot
//! or dispatches publishers strictly in sequence, propagating the first
//! failure. One logical thread of control per invocation; no internal
//! retries, locking, or timeouts.

use crate::core::config_loader::ConfigLoader;
use crate::core::error::PublishError;
use crate::core::options::{PublishOptions, TargetSpec};
use crate::core::traits::{ArtifactBuilder, PublishRequest};
use crate::core::types::{BuildResult, current_arch, current_platform};
use crate::plugins::resolver::TargetResolver;
use crate::snapshot::store::SnapshotStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;

/// Notice emitted when the deprecated single-string target form is used
pub const DEPRECATED_TARGET_STRING_NOTICE: &str =
    "publish target as a string is deprecated; pass a list of publish targets";

/// Report returned after a publish operation
#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    /// Targets dispatched successfully, in dispatch order
    pub published_targets: Vec<String>,

    /// Where the dry-run snapshot was saved, if this was a dry run
    pub dry_run_dir: Option<PathBuf>,

    /// Non-fatal notices (currently only the deprecated-target notice)
    pub warnings: Vec<String>,

    /// Wall-clock duration in milliseconds
    pub duration: u64,
}

/// Top-level publish orchestrator
pub struct PublishOrchestrator {
    builder: Arc<dyn ArtifactBuilder>,
    resolver: TargetResolver,
}

impl PublishOrchestrator {
    /// Create an orchestrator with the default target resolver
    pub fn new(builder: Arc<dyn ArtifactBuilder>) -> Self {
        Self::with_resolver(builder, TargetResolver::new())
    }

    /// Create an orchestrator with a custom target resolver
    pub fn with_resolver(builder: Arc<dyn ArtifactBuilder>, resolver: TargetResolver) -> Self {
        Self { builder, resolver }
    }

    /// Publish the project described by `options`
    ///
    /// Success means every required step completed: dry-run snapshot saved,
    /// or every target dispatched for every group. Any other outcome is a
    /// single terminal error; there is no partial-success return value.
    pub async fn publish(&self, options: &PublishOptions) -> Result<PublishReport, PublishError> {
        let start = Instant::now();

        // Before any I/O
        options.validate()?;

        if options.dry_run_resume {
            let groups = SnapshotStore::load(&options.dry_run_dir()).await?;
            if options.interactive {
                println!("📦 Resuming dry run: {} group(s)", groups.len());
            }

            // Groups run strictly in order through the shared pipeline; the
            // first failure stops the loop, later groups are not attempted.
            let mut report = PublishReport::default();
            for group in groups {
                let group_options = PublishOptions {
                    dry_run_resume: false,
                    build_results: Some(group.results),
                    ..options.clone()
                };
                let group_report = self.run(&group_options).await?;
                report.published_targets.extend(group_report.published_targets);
                report.warnings.extend(group_report.warnings);
            }
            report.duration = start.elapsed().as_millis() as u64;
            return Ok(report);
        }

        let mut report = self.run(options).await?;
        report.duration = start.elapsed().as_millis() as u64;
        Ok(report)
    }

    /// The non-resume pipeline: acquire results, save or dispatch
    async fn run(&self, options: &PublishOptions) -> Result<PublishReport, PublishError> {
        let mut warnings = Vec::new();
        let supplied = options.build_results.is_some();

        // Acquire build results
        let results: Vec<BuildResult> = if let Some(supplied_results) = &options.build_results {
            for result in supplied_results {
                for artifact in &result.artifacts {
                    if fs::metadata(artifact).await.is_err() {
                        return Err(PublishError::MissingBuildArtifact {
                            path: artifact.clone(),
                        });
                    }
                }
            }
            supplied_results.clone()
        } else {
            if options.interactive {
                println!("🔨 Building distributables...");
            }
            self.builder
                .build(&options.dir, &options.build_options)
                .await
                .map_err(|source| PublishError::BuildFailed { source })?
        };

        // Dry-run short-circuit: each result becomes its own group so that a
        // resume publishes once per result
        if options.dry_run {
            let dry_run_dir = options.dry_run_dir();
            let groups: Vec<Vec<BuildResult>> =
                results.into_iter().map(|result| vec![result]).collect();
            SnapshotStore::save(&dry_run_dir, &groups).await?;
            if options.interactive {
                println!("💾 Dry run saved: {}", dry_run_dir.display());
            }
            return Ok(PublishReport {
                published_targets: Vec::new(),
                dry_run_dir: Some(dry_run_dir),
                warnings,
                duration: 0,
            });
        }

        // Publishing requires a well-defined project context even when the
        // build results were supplied externally
        let project_dir = ConfigLoader::resolve_project_root(&options.dir).await?;
        let mut config = ConfigLoader::load(&project_dir).await?;
        let mut package = config.package.clone();
        let mut platform = options
            .build_options
            .platform
            .clone()
            .unwrap_or_else(|| current_platform().to_string());
        let mut arch = options
            .build_options
            .arch
            .clone()
            .unwrap_or_else(|| current_arch().to_string());

        // Supplied results carry the context they were built with; it
        // overrides anything loaded above (last result wins)
        if supplied && let Some(last) = results.last() {
            package = last.package.clone();
            config = last.config.clone();
            platform = last.platform.clone();
            arch = last.arch.clone();
        }

        let artifacts: Vec<PathBuf> = results
            .iter()
            .flat_map(|result| result.artifacts.iter().cloned())
            .collect();

        let targets: Vec<String> = match &options.targets {
            Some(TargetSpec::List(list)) => list.clone(),
            Some(TargetSpec::Single(name)) => {
                warnings.push(DEPRECATED_TARGET_STRING_NOTICE.to_string());
                if options.interactive {
                    println!("⚠️  {}", DEPRECATED_TARGET_STRING_NOTICE);
                }
                vec![name.clone()]
            }
            None => config
                .targets_for_platform(&platform)
                .cloned()
                .unwrap_or_default(),
        };

        let tag = options
            .tag
            .clone()
            .unwrap_or_else(|| package.version.clone());
        let request = PublishRequest {
            artifacts,
            package,
            config,
            auth_token: options.auth_token.clone(),
            tag,
            platform,
            arch,
        };

        // Strictly sequential dispatch; the first failure aborts and later
        // targets are never attempted
        let mut published_targets = Vec::new();
        for target in &targets {
            if options.interactive {
                println!("📤 Resolving publish target: {}", target);
            }
            let plugin = self.resolver.resolve(target, &project_dir).await?;
            plugin
                .publish(&request)
                .await
                .map_err(|source| PublishError::PublisherFailed {
                    target: target.clone(),
                    source,
                })?;
            published_targets.push(target.clone());
        }

        Ok(PublishReport {
            published_targets,
            dry_run_dir: None,
            warnings,
            duration: 0,
        })
    }
}
