//! Dry-run snapshot persistence
//!
//! Persists build-result groups to a directory so a publish can be resumed in
//! a later process invocation. A save replaces any prior snapshot wholesale;
//! group ordering is encoded in directory names, never derived from
//! filesystem enumeration order. The metadata record is written last, so an
//! interrupted save is detectable on the next load.

use crate::core::error::PublishError;
use crate::core::types::BuildResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Snapshot metadata file name
const META_FILE: &str = "meta.json";

/// Snapshot-level metadata, written after every group is on disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub group_count: usize,
}

/// One independently resumable group of build results
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotGroup {
    /// Position of this group in save order
    pub sequence: usize,

    /// Rehydrated build results
    pub results: Vec<BuildResult>,
}

/// Persists and reconstructs build-result groups to/from a directory
pub struct SnapshotStore;

impl SnapshotStore {
    /// Save `groups` beneath `dir`, replacing any prior snapshot
    pub async fn save(dir: &Path, groups: &[Vec<BuildResult>]) -> Result<(), PublishError> {
        if fs::metadata(dir).await.is_ok() {
            fs::remove_dir_all(dir).await?;
        }
        fs::create_dir_all(dir).await?;

        for (sequence, group) in groups.iter().enumerate() {
            let group_dir = dir.join(group_dir_name(sequence));
            fs::create_dir(&group_dir).await?;

            for (index, result) in group.iter().enumerate() {
                let path = group_dir.join(format!("result-{:03}.json", index));
                let json = serde_json::to_string_pretty(result)
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
                write_atomic(&path, &json).await?;
            }
        }

        // Meta goes last: its presence marks the save as complete
        let meta = SnapshotMeta {
            id: Uuid::new_v4(),
            saved_at: Utc::now(),
            group_count: groups.len(),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        write_atomic(&dir.join(META_FILE), &meta_json).await?;

        Ok(())
    }

    /// Load every group from `dir`, ordered by embedded sequence number
    ///
    /// # Errors
    ///
    /// `SnapshotNotFound` if `dir` does not exist; `SnapshotCorrupt` if the
    /// metadata is missing or unreadable, a group declared by the metadata is
    /// absent, or a stored record cannot be deserialized.
    pub async fn load(dir: &Path) -> Result<Vec<SnapshotGroup>, PublishError> {
        if fs::metadata(dir).await.is_err() {
            return Err(PublishError::SnapshotNotFound {
                dir: dir.to_path_buf(),
            });
        }

        let meta_path = dir.join(META_FILE);
        let meta_content =
            fs::read_to_string(&meta_path)
                .await
                .map_err(|_| PublishError::SnapshotCorrupt {
                    path: meta_path.clone(),
                    message: "metadata missing (interrupted save?)".to_string(),
                })?;
        let meta: SnapshotMeta =
            serde_json::from_str(&meta_content).map_err(|e| PublishError::SnapshotCorrupt {
                path: meta_path.clone(),
                message: e.to_string(),
            })?;

        let mut groups = Vec::with_capacity(meta.group_count);
        for sequence in 0..meta.group_count {
            let group_dir = dir.join(group_dir_name(sequence));
            if fs::metadata(&group_dir).await.is_err() {
                return Err(PublishError::SnapshotCorrupt {
                    path: group_dir,
                    message: format!(
                        "metadata declares {} groups but group {} is missing",
                        meta.group_count, sequence
                    ),
                });
            }

            let mut results = Vec::new();
            for path in record_paths(&group_dir).await? {
                let content = fs::read_to_string(&path).await?;
                let result: BuildResult =
                    serde_json::from_str(&content).map_err(|e| PublishError::SnapshotCorrupt {
                        path: path.clone(),
                        message: e.to_string(),
                    })?;
                results.push(result);
            }

            groups.push(SnapshotGroup { sequence, results });
        }

        Ok(groups)
    }
}

fn group_dir_name(sequence: usize) -> String {
    format!("group-{:03}", sequence)
}

/// Record files of one group, ordered by embedded index
async fn record_paths(group_dir: &Path) -> Result<Vec<PathBuf>, PublishError> {
    let mut indexed = Vec::new();

    let mut entries = fs::read_dir(group_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(index) = name
            .strip_prefix("result-")
            .and_then(|n| n.strip_suffix(".json"))
            .and_then(|n| n.parse::<usize>().ok())
        else {
            continue;
        };
        indexed.push((index, entry.path()));
    }

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, path)| path).collect())
}

/// Write to a temp file, then rename into place
async fn write_atomic(path: &Path, content: &str) -> Result<(), std::io::Error> {
    let temp_file = path.with_extension("json.tmp");
    fs::write(&temp_file, content).await?;
    fs::rename(&temp_file, path).await?;
    Ok(())
}
