//! Error handling for publish orchestration
//!
//! This module provides typed error kinds with recovery guidance
//! using the thiserror crate for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for publish operations
#[derive(Error, Debug)]
pub enum PublishError {
    // Option validation errors
    #[error("同時に指定できないオプションです: {message}")]
    InvalidOptionCombination { message: String },

    // Project resolution errors
    #[error("公開対象のプロジェクトが見つかりません: {dir}")]
    ProjectNotFound { dir: PathBuf },

    #[error("設定ファイルの読み込みに失敗しました: {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    // Snapshot errors
    #[error("ドライランのスナップショットが見つかりません: {dir}")]
    SnapshotNotFound { dir: PathBuf },

    #[error("スナップショットが破損しています: {path}: {message}")]
    SnapshotCorrupt { path: PathBuf, message: String },

    #[error("ビルド成果物が見つかりません: {path}")]
    MissingBuildArtifact { path: PathBuf },

    // Dispatch errors
    #[error("公開ターゲットが見つかりません: {name}")]
    TargetNotFound { name: String },

    #[error("[{target}] 公開処理に失敗しました: {source}")]
    PublisherFailed {
        target: String,
        #[source]
        source: anyhow::Error,
    },

    // Build errors
    #[error("ビルドに失敗しました: {source}")]
    BuildFailed {
        #[source]
        source: anyhow::Error,
    },

    // I/O errors
    #[error("I/Oエラーが発生しました: {0}")]
    Io(#[from] std::io::Error),
}

impl PublishError {
    /// Check if this error is a configuration mistake rather than a runtime failure
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidOptionCombination { .. }
                | Self::ProjectNotFound { .. }
                | Self::ConfigInvalid { .. }
        )
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::InvalidOptionCombination { .. } => vec![
                "--dry-runと--dry-run-resumeは同時に指定できません",
                "オプションの組み合わせを確認してください",
            ],
            Self::ProjectNotFound { .. } => vec![
                "プロジェクトディレクトリを確認してください",
                "publisher.yamlまたはpublisher.tomlが存在するか確認してください",
            ],
            Self::ConfigInvalid { .. } => vec![
                "設定ファイルの構文を確認してください",
                "package.versionはSemVer形式（例: 1.0.0）で指定してください",
            ],
            Self::SnapshotNotFound { .. } => vec![
                "先に--dry-runで公開を実行してください",
                "--out-dirの指定が保存時と一致しているか確認してください",
            ],
            Self::SnapshotCorrupt { .. } => vec![
                "スナップショットディレクトリを削除して--dry-runからやり直してください",
            ],
            Self::MissingBuildArtifact { .. } => vec![
                "成果物が移動または削除されていないか確認してください",
                "ビルドを再実行してください",
            ],
            Self::TargetNotFound { .. } => vec![
                "ターゲット名のつづりを確認してください",
                "外部ターゲットの場合はdist-publisher-<name>がPATH上にあるか確認してください",
            ],
            Self::PublisherFailed { .. } => vec![
                "エラーメッセージを確認してください",
                "認証トークンが正しく設定されているか確認してください",
            ],
            Self::BuildFailed { .. } => vec![
                "ビルドコマンドの出力を確認してください",
                "build.manifestの出力先が設定と一致しているか確認してください",
            ],
            Self::Io(_) => vec![
                "ディレクトリの権限を確認してください",
                "ディスク容量を確認してください",
            ],
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidOptionCombination { .. } => "INVALID_OPTION_COMBINATION",
            Self::ProjectNotFound { .. } => "PROJECT_NOT_FOUND",
            Self::ConfigInvalid { .. } => "CONFIG_INVALID",
            Self::SnapshotNotFound { .. } => "SNAPSHOT_NOT_FOUND",
            Self::SnapshotCorrupt { .. } => "SNAPSHOT_CORRUPT",
            Self::MissingBuildArtifact { .. } => "MISSING_BUILD_ARTIFACT",
            Self::TargetNotFound { .. } => "TARGET_NOT_FOUND",
            Self::PublisherFailed { .. } => "PUBLISHER_FAILED",
            Self::BuildFailed { .. } => "BUILD_FAILED",
            Self::Io(_) => "IO_ERROR",
        }
    }
}
