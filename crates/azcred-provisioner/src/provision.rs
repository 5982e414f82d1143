use std::sync::Arc;

use azcred_directory::{resolve_subscriptions, Directory};
use azcred_domain::{encode, AccessToken, CredentialRecord, SubscriptionId, TenantId};
use rand::Rng;
use tracing::{debug, info};

use crate::config::ProvisionConfig;
use crate::error::ProvisionError;
use crate::report::RunReport;
use crate::retry::{assign_with_retry, RetryPolicy};

/// Prefix shared by every application this tool creates.
pub const APPLICATION_PREFIX: &str = "azure";

/// Short random tag grouping the applications created by one run.
pub fn run_identifier() -> String {
    format!("{:04x}", rand::rng().random::<u16>())
}

/// Display name of the application created for `subscription_id`.
pub fn application_name(run_id: &str, subscription_id: &SubscriptionId) -> String {
    format!("{}_{}_{}", APPLICATION_PREFIX, run_id, subscription_id)
}

/// Drives one front-to-back provisioning run.
///
/// Subscriptions are processed strictly in order. The first fatal error ends
/// the run and nothing is emitted.
pub struct Provisioner {
    directory: Arc<dyn Directory>,
    config:    ProvisionConfig,
    retry:     RetryPolicy,
}

impl Provisioner {
    pub fn new(directory: Arc<dyn Directory>, config: ProvisionConfig) -> Self {
        Self { directory, config, retry: RetryPolicy::default() }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &ProvisionConfig {
        &self.config
    }

    /// Create credentials for every target subscription.
    pub async fn provision(&self) -> Result<Vec<CredentialRecord>, ProvisionError> {
        let token = self
            .directory
            .authenticate(&self.config.username, &self.config.password)
            .await?;

        let tenant_id = self.directory.resolve_tenant(&token).await?;
        info!(tenant = %tenant_id, "Resolved tenant");

        let subscriptions =
            resolve_subscriptions(self.directory.as_ref(), &token, &self.config.subscriptions).await?;
        info!(count = subscriptions.len(), "Processing subscriptions");

        let run_id = run_identifier();
        debug!(run_id = %run_id, "generated run identifier");

        let mut records = Vec::with_capacity(subscriptions.len());
        for subscription_id in &subscriptions {
            let record = self
                .provision_subscription(&tenant_id, &token, subscription_id, &run_id)
                .await?;
            records.push(record);
        }
        Ok(records)
    }

    async fn provision_subscription(
        &self,
        tenant_id: &TenantId,
        token: &AccessToken,
        subscription_id: &SubscriptionId,
        run_id: &str,
    ) -> Result<CredentialRecord, ProvisionError> {
        let name = application_name(run_id, subscription_id);

        let application = self
            .directory
            .create_application(tenant_id, token, &name)
            .await?;
        debug!(application_id = %application.application_id, "application created");

        let principal = self
            .directory
            .create_service_principal(tenant_id, token, &application.application_id)
            .await?;
        debug!(object_id = %principal.object_id, "service principal created");

        let role = self
            .directory
            .resolve_role_definition(subscription_id, token, self.config.role.as_str())
            .await?;

        let attempts = assign_with_retry(
            self.directory.as_ref(),
            &self.retry,
            subscription_id,
            token,
            &principal.object_id,
            &role,
        )
        .await?;
        info!(
            role = %self.config.role,
            subscription = %subscription_id,
            attempts,
            "Assigned service principal to role"
        );

        Ok(CredentialRecord {
            subscription_id: subscription_id.clone(),
            client_id: application.application_id,
            client_secret: application.client_secret,
            tenant_id: tenant_id.clone(),
        })
    }

    /// Provision, render and write the credentials file.
    ///
    /// The file is only written once every subscription has succeeded.
    pub async fn run(&self) -> Result<RunReport, ProvisionError> {
        let records = self.provision().await?;
        let rendered = encode(&records, self.config.output_style);

        let output_path = self.config.resolved_output_path();
        info!("Creating credentials file at {}", output_path.display());
        tokio::fs::write(&output_path, &rendered)
            .await
            .map_err(|source| ProvisionError::Output { path: output_path.clone(), source })?;

        info!("Done!");
        Ok(RunReport { records, rendered, output_path })
    }
}
