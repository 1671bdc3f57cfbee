//! Build result types shared across the publish pipeline

use crate::core::config::ProjectConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Package metadata snapshot carried alongside every build result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields this tool does not interpret but must round-trip
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl PackageManifest {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
            extra: HashMap::new(),
        }
    }
}

/// One build invocation's output: distributable artifacts plus the
/// platform/arch/metadata context that produced them.
///
/// Immutable once created; either published immediately, persisted into a
/// dry-run snapshot, or reconstructed from one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResult {
    /// Distributable files, in build order
    pub artifacts: Vec<PathBuf>,

    /// Target platform identifier ("linux", "darwin", "win32")
    pub platform: String,

    /// Target architecture identifier ("x64", "arm64")
    pub arch: String,

    /// Package metadata at build time
    pub package: PackageManifest,

    /// Project configuration at build time
    pub config: ProjectConfig,
}

/// Platform identifier for the host, in the same vocabulary build results use
pub fn current_platform() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

/// Architecture identifier for the host
pub fn current_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> BuildResult {
        BuildResult {
            artifacts: vec![PathBuf::from("out/app.tar.gz"), PathBuf::from("out/app.deb")],
            platform: "linux".to_string(),
            arch: "x64".to_string(),
            package: PackageManifest::new("myapp", "1.2.3"),
            config: ProjectConfig::default(),
        }
    }

    #[test]
    fn test_build_result_round_trip() {
        let result = sample_result();
        let json = serde_json::to_string(&result).unwrap();
        let restored: BuildResult = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, result);
    }

    #[test]
    fn test_build_result_serializes_camel_case() {
        let result = sample_result();
        let json = serde_json::to_string(&result).unwrap();

        assert!(json.contains("\"artifacts\""));
        assert!(json.contains("\"platform\":\"linux\""));
        assert!(json.contains("\"arch\":\"x64\""));
    }

    #[test]
    fn test_manifest_preserves_unknown_fields() {
        let json = r#"{"name":"myapp","version":"1.2.3","homepage":"https://example.com"}"#;
        let manifest: PackageManifest = serde_json::from_str(json).unwrap();

        assert_eq!(manifest.name, "myapp");
        assert_eq!(
            manifest.extra.get("homepage"),
            Some(&serde_json::Value::String("https://example.com".to_string()))
        );

        let round_tripped = serde_json::to_string(&manifest).unwrap();
        assert!(round_tripped.contains("homepage"));
    }

    #[test]
    fn test_current_platform_vocabulary() {
        let platform = current_platform();
        assert!(["linux", "darwin", "win32"].contains(&platform) || !platform.is_empty());
        assert_ne!(platform, "macos");
        assert_ne!(platform, "windows");
    }
}
