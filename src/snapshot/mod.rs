//! Dry-run snapshot persistence

pub mod store;

pub use store::{SnapshotGroup, SnapshotMeta, SnapshotStore};
