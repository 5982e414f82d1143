pub mod config;
pub mod error;
pub mod provision;
pub mod report;
pub mod retry;

pub use config::ProvisionConfig;
pub use error::ProvisionError;
pub use provision::Provisioner;
pub use report::RunReport;
pub use retry::RetryPolicy;
