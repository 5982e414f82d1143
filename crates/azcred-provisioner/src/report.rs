use std::path::PathBuf;

use azcred_domain::CredentialRecord;

/// Outcome of a completed run.
#[derive(Clone)]
pub struct RunReport {
    /// One record per subscription, in processing order.
    pub records: Vec<CredentialRecord>,
    /// The text written to `output_path`. Contains client secrets.
    pub rendered: String,
    pub output_path: PathBuf,
}

impl std::fmt::Debug for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunReport")
            .field("records", &self.records)
            .field("rendered", &format_args!("<{} bytes>", self.rendered.len()))
            .field("output_path", &self.output_path)
            .finish()
    }
}
