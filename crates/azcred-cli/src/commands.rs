use std::sync::Arc;

use anyhow::{Context, Result};
use azcred_directory::{AzureDirectory, Directory};
use azcred_domain::SubscriptionId;
use azcred_provisioner::{ProvisionConfig, Provisioner};

use crate::cli::Cli;
use crate::prompt;

/// Build the run configuration from parsed flags, prompting for anything
/// missing.
pub fn config_from_cli(cli: Cli) -> Result<ProvisionConfig> {
    let username = prompt::username_or_prompt(cli.username)?;
    let password = prompt::password_or_prompt(cli.password)?;

    let mut config = ProvisionConfig::new(username, password);
    config.subscriptions = cli
        .subscriptions
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(SubscriptionId::new)
        .collect();
    config.role = cli.role.into();
    config.output_style = cli.output_type.into();
    config.output_path = cli.output_file;
    config.echo = cli.verbose;
    Ok(config)
}

pub async fn provision(cli: Cli) -> Result<()> {
    let config = config_from_cli(cli)?;
    let echo = config.echo;

    let directory: Arc<dyn Directory> =
        Arc::new(AzureDirectory::new().context("Failed to initialise HTTP client")?);
    let report = Provisioner::new(directory, config)
        .run()
        .await
        .context("Failed to create Azure credentials")?;

    if echo {
        println!("{}", report.rendered);
    }
    println!(
        "Wrote {} credential(s) to {}",
        report.records.len(),
        report.output_path.display()
    );
    Ok(())
}
