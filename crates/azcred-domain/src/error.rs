use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("unknown role '{0}' (expected one of: Contributor, Owner)")]
    UnknownRole(String),
}
