//! Project configuration structures for dist-publisher
//!
//! This module provides type-safe configuration management with serde support.

use crate::core::types::PackageManifest;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration object (publisher.yaml / publisher.toml)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    /// Package metadata (required)
    pub package: PackageManifest,

    /// Default publish targets, keyed by platform identifier
    #[serde(default, rename = "publishTargets")]
    pub publish_targets: HashMap<String, Vec<String>>,

    /// Destination directory for the built-in `local` publisher (optional)
    #[serde(skip_serializing_if = "Option::is_none", rename = "publishDir")]
    pub publish_dir: Option<PathBuf>,

    /// Build command configuration (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildConfig>,
}

/// Build command configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildConfig {
    /// Command executed from the project directory before collecting artifacts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Arguments for the build command
    #[serde(default)]
    pub args: Vec<String>,

    /// Build manifest path relative to the project directory
    /// (default: "out/build-manifest.json")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,
}

impl ProjectConfig {
    /// Default target list for a platform, if one is configured
    pub fn targets_for_platform(&self, platform: &str) -> Option<&Vec<String>> {
        self.publish_targets.get(platform)
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            package: PackageManifest::new("unnamed", "0.0.0"),
            publish_targets: HashMap::new(),
            publish_dir: None,
            build: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let yaml = r#"
package:
  name: myapp
  version: 1.2.3
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.package.name, "myapp");
        assert!(config.publish_targets.is_empty());
        assert!(config.build.is_none());
    }

    #[test]
    fn test_deserialize_publish_targets() {
        let yaml = r#"
package:
  name: myapp
  version: 1.2.3
publishTargets:
  linux: [github, local]
  darwin: [github]
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.targets_for_platform("linux"),
            Some(&vec!["github".to_string(), "local".to_string()])
        );
        assert_eq!(config.targets_for_platform("win32"), None);
    }

    #[test]
    fn test_deserialize_toml_config() {
        let toml = r#"
[package]
name = "myapp"
version = "1.2.3"

[build]
command = "make"
args = ["dist"]
"#;
        let config: ProjectConfig = toml::from_str(toml).unwrap();
        let build = config.build.unwrap();
        assert_eq!(build.command.as_deref(), Some("make"));
        assert_eq!(build.args, vec!["dist".to_string()]);
        assert!(build.manifest.is_none());
    }

    #[test]
    fn test_config_round_trip() {
        let yaml = r#"
package:
  name: myapp
  version: 1.2.3
publishTargets:
  linux: [github]
publishDir: ./published
"#;
        let config: ProjectConfig = serde_yaml::from_str(yaml).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let restored: ProjectConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
        assert!(json.contains("publishDir"));
    }
}
