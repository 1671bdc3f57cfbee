//! Orchestration layer for artifact publishing

pub mod publish_orchestrator;

pub use publish_orchestrator::{
    DEPRECATED_TARGET_STRING_NOTICE, PublishOrchestrator, PublishReport,
};
