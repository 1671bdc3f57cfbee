pub mod command_publisher;
pub mod local_publisher;
pub mod resolver;

pub use command_publisher::{AUTH_TOKEN_ENV, CommandPublisher};
pub use local_publisher::LocalPublisher;
pub use resolver::TargetResolver;
