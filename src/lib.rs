pub mod build;
pub mod core;
pub mod orchestration;
pub mod plugins;
pub mod snapshot;

pub use crate::build::CommandArtifactBuilder;
pub use crate::core::*;
pub use crate::orchestration::{PublishOrchestrator, PublishReport};
pub use crate::plugins::{CommandPublisher, LocalPublisher, TargetResolver};
pub use crate::snapshot::{SnapshotGroup, SnapshotStore};
