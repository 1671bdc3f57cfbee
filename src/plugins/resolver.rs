//! Target resolver - maps a target name to a publisher
//!
//! Candidate locations are tried in a fixed order, first success wins:
//!
//! 1. built-in publisher registered under the name;
//! 2. `dist-publisher-<name>` executable on `PATH`;
//! 3. `<name>` itself as an executable on `PATH`;
//! 4. `<project>/<name>` as an executable file;
//! 5. `<project>/plugins/<name>` as an executable file.
//!
//! Resolution is a pure lookup: no retries, no side effects beyond the
//! filesystem probes.

use crate::core::error::PublishError;
use crate::core::traits::PublisherPlugin;
use crate::plugins::command_publisher::CommandPublisher;
use crate::plugins::local_publisher::LocalPublisher;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

/// External plugin executables follow this naming convention
pub const PLUGIN_EXECUTABLE_PREFIX: &str = "dist-publisher-";

/// Project subdirectory searched for plugin executables
pub const PLUGIN_DIR_NAME: &str = "plugins";

/// Resolves target names to loadable publishers
pub struct TargetResolver {
    builtins: HashMap<String, Arc<dyn PublisherPlugin>>,
}

impl Default for TargetResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetResolver {
    /// Create a resolver with the bundled built-in publishers
    pub fn new() -> Self {
        let mut resolver = Self::empty();
        resolver.register(Arc::new(LocalPublisher::new()));
        resolver
    }

    /// Create a resolver with no built-in publishers
    pub fn empty() -> Self {
        Self {
            builtins: HashMap::new(),
        }
    }

    /// Register a built-in publisher under its own name
    ///
    /// Registered publishers take precedence over every executable candidate.
    pub fn register(&mut self, plugin: Arc<dyn PublisherPlugin>) {
        self.builtins.insert(plugin.name().to_string(), plugin);
    }

    /// Names of all registered built-in publishers, sorted
    pub fn builtin_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.builtins.keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolve `name` to a publisher for the project at `project_dir`
    pub async fn resolve(
        &self,
        name: &str,
        project_dir: &Path,
    ) -> Result<Arc<dyn PublisherPlugin>, PublishError> {
        if let Some(plugin) = self.builtins.get(name) {
            return Ok(Arc::clone(plugin));
        }

        if let Some(executable) = Self::find_executable(name, project_dir).await {
            return Ok(Arc::new(CommandPublisher::new(name, executable)));
        }

        Err(PublishError::TargetNotFound {
            name: name.to_string(),
        })
    }

    /// First executable candidate for `name`, in resolution order
    pub async fn find_executable(name: &str, project_dir: &Path) -> Option<PathBuf> {
        for candidate in Self::executable_candidates(name, project_dir) {
            if is_executable_file(&candidate).await {
                return Some(candidate);
            }
        }
        None
    }

    fn executable_candidates(name: &str, project_dir: &Path) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        candidates.extend(path_candidates(&format!(
            "{}{}",
            PLUGIN_EXECUTABLE_PREFIX, name
        )));
        candidates.extend(path_candidates(name));
        candidates.push(project_dir.join(name));
        candidates.push(project_dir.join(PLUGIN_DIR_NAME).join(name));
        candidates
    }
}

/// Join `name` onto every `PATH` entry, in `PATH` order
fn path_candidates(name: &str) -> Vec<PathBuf> {
    let Some(path_var) = std::env::var_os("PATH") else {
        return Vec::new();
    };
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .collect()
}

async fn is_executable_file(path: &Path) -> bool {
    let Ok(metadata) = fs::metadata(path).await else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::PublishRequest;
    use async_trait::async_trait;
    use tempfile::TempDir;

    #[derive(Debug)]
    struct MarkerPublisher {
        name: String,
    }

    #[async_trait]
    impl PublisherPlugin for MarkerPublisher {
        fn name(&self) -> &str {
            &self.name
        }

        async fn publish(&self, _request: &PublishRequest) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        std::fs::write(path, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[tokio::test]
    async fn test_unknown_target_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = TargetResolver::empty();

        let err = resolver
            .resolve("no-such-target", temp_dir.path())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "TARGET_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_default_resolver_has_local_builtin() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = TargetResolver::new();

        let plugin = resolver.resolve("local", temp_dir.path()).await.unwrap();
        assert_eq!(plugin.name(), "local");
        assert_eq!(resolver.builtin_names(), vec!["local".to_string()]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_builtin_wins_over_project_executable() {
        let temp_dir = TempDir::new().unwrap();
        make_executable(&temp_dir.path().join("mytarget"));

        let mut resolver = TargetResolver::empty();
        let builtin: Arc<dyn PublisherPlugin> = Arc::new(MarkerPublisher {
            name: "mytarget".to_string(),
        });
        resolver.register(Arc::clone(&builtin));

        let resolved = resolver.resolve("mytarget", temp_dir.path()).await.unwrap();
        assert!(Arc::ptr_eq(&resolved, &builtin));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolves_project_dir_executable() {
        let temp_dir = TempDir::new().unwrap();
        make_executable(&temp_dir.path().join("mytarget"));

        let resolver = TargetResolver::empty();
        let plugin = resolver.resolve("mytarget", temp_dir.path()).await.unwrap();
        assert_eq!(plugin.name(), "mytarget");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_project_dir_beats_plugin_dir() {
        let temp_dir = TempDir::new().unwrap();
        let plugin_dir = temp_dir.path().join(PLUGIN_DIR_NAME);
        std::fs::create_dir(&plugin_dir).unwrap();
        make_executable(&temp_dir.path().join("mytarget"));
        make_executable(&plugin_dir.join("mytarget"));

        let found = TargetResolver::find_executable("mytarget", temp_dir.path())
            .await
            .unwrap();
        assert_eq!(found, temp_dir.path().join("mytarget"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_plugin_dir_executable_resolves() {
        let temp_dir = TempDir::new().unwrap();
        let plugin_dir = temp_dir.path().join(PLUGIN_DIR_NAME);
        std::fs::create_dir(&plugin_dir).unwrap();
        make_executable(&plugin_dir.join("mytarget"));

        let found = TargetResolver::find_executable("mytarget", temp_dir.path())
            .await
            .unwrap();
        assert_eq!(found, plugin_dir.join("mytarget"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_executable_file_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("mytarget"), "not a program").unwrap();
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(
            temp_dir.path().join("mytarget"),
            std::fs::Permissions::from_mode(0o644),
        )
        .unwrap();

        let found = TargetResolver::find_executable("mytarget", temp_dir.path()).await;
        assert!(found.is_none());
    }
}
