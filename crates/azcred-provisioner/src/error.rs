use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("{0}")]
    Directory(#[from] azcred_directory::DirectoryError),

    #[error(
        "failed to assign role '{role}' to the service principal in subscription {subscription} \
         after {attempts} attempts: {last_error}"
    )]
    RoleAssignmentFailed {
        subscription: String,
        role: String,
        attempts: u32,
        last_error: String,
    },

    #[error("io error writing {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
