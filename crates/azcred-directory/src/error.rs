use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("no tenant visible to this identity")]
    NoTenantFound,

    #[error("role '{role}' not found in subscription {subscription}")]
    RoleNotFound { role: String, subscription: String },

    #[error("remote call failed: {0}")]
    RemoteCall(String),

    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}
