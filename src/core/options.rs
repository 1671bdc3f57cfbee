//! Caller-facing options for the publish orchestrator
//!
//! Options are an immutable value: branches of the orchestrator derive
//! effective parameters from them instead of mutating the caller's input.

use crate::core::error::PublishError;
use crate::core::types::BuildResult;
use secrecy::SecretString;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Directory name for dry-run snapshots under the output directory
pub const DRY_RUN_DIR_NAME: &str = "publish-dry-run";

/// Requested publish targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// Single target name (deprecated calling convention, coerced to a
    /// one-element list with a non-fatal notice)
    Single(String),

    /// Ordered list of target names
    List(Vec<String>),
}

/// Options forwarded to the artifact build pipeline
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Target platform override (host platform if unset)
    pub platform: Option<String>,

    /// Target architecture override (host architecture if unset)
    pub arch: Option<String>,

    /// Builder-specific options, forwarded not interpreted
    pub extra: HashMap<String, serde_json::Value>,
}

/// Options for one publish orchestrator invocation
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Path to the project to publish
    pub dir: PathBuf,

    /// Whether progress output may be written to the terminal
    pub interactive: bool,

    /// Authentication token, forwarded to publishers
    pub auth_token: Option<SecretString>,

    /// Release tag (defaults to the package version)
    pub tag: Option<String>,

    /// Publish targets (platform default list from config if unset)
    pub targets: Option<TargetSpec>,

    /// Options passed through to the build step
    pub build_options: BuildOptions,

    /// Output directory override (`<dir>/out` if unset)
    pub out_dir: Option<PathBuf>,

    /// Save build results as a dry-run snapshot instead of publishing
    pub dry_run: bool,

    /// Resume a previously saved dry run
    pub dry_run_resume: bool,

    /// Pre-supplied build results, so the publish step skips the build
    pub build_results: Option<Vec<BuildResult>>,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            interactive: false,
            auth_token: None,
            tag: None,
            targets: None,
            build_options: BuildOptions::default(),
            out_dir: None,
            dry_run: false,
            dry_run_resume: false,
            build_results: None,
        }
    }
}

impl PublishOptions {
    /// Convenience constructor for a project directory
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Check the mutual-exclusion invariants
    ///
    /// Called before any I/O: violations are configuration errors, never
    /// build or publish failures.
    pub fn validate(&self) -> Result<(), PublishError> {
        if self.dry_run && self.dry_run_resume {
            return Err(PublishError::InvalidOptionCombination {
                message: "dryRunとdryRunResume".to_string(),
            });
        }

        if self.dry_run_resume && self.build_results.is_some() {
            return Err(PublishError::InvalidOptionCombination {
                message: "dryRunResumeとbuildResults".to_string(),
            });
        }

        Ok(())
    }

    /// Effective output directory
    pub fn out_dir(&self) -> PathBuf {
        self.out_dir.clone().unwrap_or_else(|| self.dir.join("out"))
    }

    /// Directory holding the dry-run snapshot for this project
    pub fn dry_run_dir(&self) -> PathBuf {
        self.out_dir().join(DRY_RUN_DIR_NAME)
    }
}
