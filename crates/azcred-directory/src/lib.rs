pub mod auth;
pub mod client;
pub mod directory;
pub mod error;
pub mod principal;
pub mod resolver;
pub mod role;

pub use client::{ApiResponse, BaseUrls, DirectoryClient};
pub use directory::{AzureDirectory, Directory};
pub use error::DirectoryError;
pub use resolver::resolve_subscriptions;
pub use role::AssignmentOutcome;

/// HTTP verbs accepted by [`DirectoryClient::call`].
pub use reqwest::Method;
