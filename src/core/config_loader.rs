//! Configuration loading and project root resolution
//!
//! Loads `publisher.yaml` / `publisher.toml` from a project directory and
//! resolves the nearest enclosing project root by walking ancestors.

use crate::core::config::ProjectConfig;
use crate::core::error::PublishError;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Recognized configuration file names, checked in order
pub const CONFIG_FILE_NAMES: &[&str] = &["publisher.yaml", "publisher.yml", "publisher.toml"];

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Find the configuration file directly inside `dir`
    pub async fn find_config_file(dir: &Path) -> Option<PathBuf> {
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if fs::metadata(&candidate).await.is_ok() {
                return Some(candidate);
            }
        }
        None
    }

    /// Load the project configuration from `dir`
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` if no configuration file exists in `dir`,
    /// `ConfigInvalid` if it cannot be parsed or carries a non-SemVer
    /// package version.
    pub async fn load(dir: &Path) -> Result<ProjectConfig, PublishError> {
        let path = Self::find_config_file(dir)
            .await
            .ok_or_else(|| PublishError::ProjectNotFound {
                dir: dir.to_path_buf(),
            })?;

        let content = fs::read_to_string(&path).await?;

        let config: ProjectConfig = if path.extension().map(|e| e == "toml").unwrap_or(false) {
            toml::from_str(&content).map_err(|e| PublishError::ConfigInvalid {
                path: path.clone(),
                message: e.to_string(),
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|e| PublishError::ConfigInvalid {
                path: path.clone(),
                message: e.to_string(),
            })?
        };

        if let Err(e) = semver::Version::parse(&config.package.version) {
            return Err(PublishError::ConfigInvalid {
                path,
                message: format!("package.version: {}", e),
            });
        }

        Ok(config)
    }

    /// Resolve the project root for `dir`: the nearest ancestor (including
    /// `dir` itself) that holds a configuration file
    pub async fn resolve_project_root(dir: &Path) -> Result<PathBuf, PublishError> {
        for ancestor in dir.ancestors() {
            if Self::find_config_file(ancestor).await.is_some() {
                return Ok(ancestor.to_path_buf());
            }
        }

        Err(PublishError::ProjectNotFound {
            dir: dir.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn write_config(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).await.unwrap();
    }

    #[tokio::test]
    async fn test_load_yaml_config() {
        let temp_dir = TempDir::new().unwrap();
        write_config(
            temp_dir.path(),
            "publisher.yaml",
            "package:\n  name: myapp\n  version: 1.2.3\n",
        )
        .await;

        let config = ConfigLoader::load(temp_dir.path()).await.unwrap();
        assert_eq!(config.package.name, "myapp");
        assert_eq!(config.package.version, "1.2.3");
    }

    #[tokio::test]
    async fn test_load_toml_config() {
        let temp_dir = TempDir::new().unwrap();
        write_config(
            temp_dir.path(),
            "publisher.toml",
            "[package]\nname = \"myapp\"\nversion = \"0.4.0\"\n",
        )
        .await;

        let config = ConfigLoader::load(temp_dir.path()).await.unwrap();
        assert_eq!(config.package.version, "0.4.0");
    }

    #[tokio::test]
    async fn test_load_missing_config_is_project_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = ConfigLoader::load(temp_dir.path()).await.unwrap_err();
        assert_eq!(err.code(), "PROJECT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_load_invalid_version_is_config_invalid() {
        let temp_dir = TempDir::new().unwrap();
        write_config(
            temp_dir.path(),
            "publisher.yaml",
            "package:\n  name: myapp\n  version: not-a-version\n",
        )
        .await;

        let err = ConfigLoader::load(temp_dir.path()).await.unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID");
    }

    #[tokio::test]
    async fn test_load_malformed_yaml_is_config_invalid() {
        let temp_dir = TempDir::new().unwrap();
        write_config(temp_dir.path(), "publisher.yaml", "package: [not: valid").await;

        let err = ConfigLoader::load(temp_dir.path()).await.unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID");
    }

    #[tokio::test]
    async fn test_resolve_project_root_walks_ancestors() {
        let temp_dir = TempDir::new().unwrap();
        write_config(
            temp_dir.path(),
            "publisher.yaml",
            "package:\n  name: myapp\n  version: 1.0.0\n",
        )
        .await;
        let nested = temp_dir.path().join("src").join("deep");
        fs::create_dir_all(&nested).await.unwrap();

        let root = ConfigLoader::resolve_project_root(&nested).await.unwrap();
        assert_eq!(root, temp_dir.path());
    }

    #[tokio::test]
    async fn test_resolve_project_root_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = ConfigLoader::resolve_project_root(temp_dir.path())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "PROJECT_NOT_FOUND");
    }
}
