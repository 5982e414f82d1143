pub mod encode;
pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use encode::encode;
pub use error::DomainError;
pub use types::*;
