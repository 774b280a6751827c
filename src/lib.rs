pub mod auth;
pub mod cli;
pub mod client;
pub mod describe;
pub mod error;
pub mod printers;
pub mod render;
pub mod resources;
pub mod tabwriter;

// Re-export commonly used types
pub use auth::ApiKey;
pub use cli::{Cli, Command, DescribeCommand};
pub use client::{PostmanClient, PostmanService, build_client};
pub use describe::describe;
pub use error::{ApiError, DescribeError, RenderError};
pub use printers::PrintOptions;
pub use resources::ResourceKind;
