//! Command publisher - external executables as publish targets
//!
//! Targets resolved outside the built-in registry are executables: the
//! publish request is serialized as JSON on stdin and the auth token is
//! passed through an environment variable, never embedded in the payload.
//! A non-zero exit status fails the publish with the process's stderr.

use crate::core::traits::{PublishRequest, PublisherPlugin};
use anyhow::Context;
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Environment variable carrying the auth token into publisher processes
pub const AUTH_TOKEN_ENV: &str = "DIST_PUBLISHER_TOKEN";

/// A publish target backed by an external executable
#[derive(Debug)]
pub struct CommandPublisher {
    name: String,
    executable: PathBuf,
}

impl CommandPublisher {
    /// Create a publisher for the target `name` backed by `executable`
    pub fn new(name: impl Into<String>, executable: PathBuf) -> Self {
        Self {
            name: name.into(),
            executable,
        }
    }

    /// Path of the backing executable
    pub fn executable(&self) -> &PathBuf {
        &self.executable
    }

    /// JSON payload written to the publisher's stdin
    fn wire_payload(request: &PublishRequest) -> serde_json::Value {
        serde_json::json!({
            "artifacts": request.artifacts,
            "package": request.package,
            "config": request.config,
            "tag": request.tag,
            "platform": request.platform,
            "arch": request.arch,
        })
    }
}

#[async_trait]
impl PublisherPlugin for CommandPublisher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&self, request: &PublishRequest) -> anyhow::Result<()> {
        let payload = serde_json::to_vec(&Self::wire_payload(request))?;

        let mut command = Command::new(&self.executable);
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(token) = &request.auth_token {
            command.env(AUTH_TOKEN_ENV, token.expose_secret());
        }

        let mut child = command
            .spawn()
            .with_context(|| format!("failed to start publisher {}", self.executable.display()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&payload).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "publisher {} exited with {}: {}",
                self.name,
                output.status,
                stderr.trim()
            );
        }

        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::config::ProjectConfig;
    use crate::core::types::PackageManifest;
    use secrecy::SecretString;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn request(token: Option<&str>) -> PublishRequest {
        PublishRequest {
            artifacts: vec![PathBuf::from("out/app.tar.gz")],
            package: PackageManifest::new("myapp", "1.2.3"),
            config: ProjectConfig::default(),
            auth_token: token.map(SecretString::from),
            tag: "1.2.3".to_string(),
            platform: "linux".to_string(),
            arch: "x64".to_string(),
        }
    }

    #[tokio::test]
    async fn test_successful_publish() {
        let temp_dir = TempDir::new().unwrap();
        let script = write_script(temp_dir.path(), "ok-publisher", "cat > /dev/null; exit 0");

        let publisher = CommandPublisher::new("ok", script);
        publisher.publish(&request(None)).await.unwrap();
    }

    #[tokio::test]
    async fn test_failing_publish_carries_stderr() {
        let temp_dir = TempDir::new().unwrap();
        let script = write_script(
            temp_dir.path(),
            "bad-publisher",
            "cat > /dev/null; echo 'upload rejected' >&2; exit 3",
        );

        let publisher = CommandPublisher::new("bad", script);
        let err = publisher.publish(&request(None)).await.unwrap_err();
        assert!(err.to_string().contains("upload rejected"));
    }

    #[tokio::test]
    async fn test_token_passed_via_environment_only() {
        let temp_dir = TempDir::new().unwrap();
        // Fails unless the token env var is set; fails if the payload leaks it.
        let script = write_script(
            temp_dir.path(),
            "token-publisher",
            r#"payload=$(cat)
case "$payload" in *tok-123*) exit 2 ;; esac
[ "$DIST_PUBLISHER_TOKEN" = "tok-123" ] || exit 1
exit 0"#,
        );

        let publisher = CommandPublisher::new("token", script);
        publisher.publish(&request(Some("tok-123"))).await.unwrap();
    }

    #[tokio::test]
    async fn test_payload_contains_publish_context() {
        let temp_dir = TempDir::new().unwrap();
        let script = write_script(
            temp_dir.path(),
            "echo-publisher",
            r#"payload=$(cat)
case "$payload" in *app.tar.gz*) ;; *) exit 1 ;; esac
case "$payload" in *'"platform":"linux"'*) ;; *) exit 1 ;; esac
exit 0"#,
        );

        let publisher = CommandPublisher::new("echo", script);
        publisher.publish(&request(None)).await.unwrap();
    }
}
