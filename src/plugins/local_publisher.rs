//! Local publisher - the built-in `local` target
//!
//! Copies the release artifacts into the directory configured as
//! `publishDir` in the project configuration.

use crate::core::traits::{PublishRequest, PublisherPlugin};
use async_trait::async_trait;
use tokio::fs;

/// Built-in publisher that copies artifacts into a local directory
#[derive(Debug, Default)]
pub struct LocalPublisher;

impl LocalPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PublisherPlugin for LocalPublisher {
    fn name(&self) -> &str {
        "local"
    }

    async fn publish(&self, request: &PublishRequest) -> anyhow::Result<()> {
        let dest = request
            .config
            .publish_dir
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("publishDir is not configured"))?;

        fs::create_dir_all(dest).await?;

        for artifact in &request.artifacts {
            let file_name = artifact
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("artifact has no file name: {}", artifact.display()))?;
            fs::copy(artifact, dest.join(file_name)).await?;
        }

        Ok(())
    }
}
