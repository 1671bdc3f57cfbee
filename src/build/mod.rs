//! Artifact build collaborator

pub mod command_builder;

pub use command_builder::CommandArtifactBuilder;
