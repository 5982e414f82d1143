use async_trait::async_trait;
use azcred_domain::{
    AccessToken, ApplicationDescriptor, RoleDefinition, ServicePrincipalDescriptor, SubscriptionId,
    TenantId,
};

use crate::client::{BaseUrls, DirectoryClient};
use crate::error::DirectoryError;
use crate::role::AssignmentOutcome;
use crate::{auth, principal, resolver, role};

/// Remote operations the provisioning run is built from.
///
/// Every call after `authenticate` takes the run's token explicitly; no
/// implementation holds token state of its own.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> Result<AccessToken, DirectoryError>;

    async fn resolve_tenant(&self, token: &AccessToken) -> Result<TenantId, DirectoryError>;

    async fn list_subscriptions(&self, token: &AccessToken) -> Result<Vec<SubscriptionId>, DirectoryError>;

    async fn create_application(
        &self,
        tenant_id: &TenantId,
        token: &AccessToken,
        display_name: &str,
    ) -> Result<ApplicationDescriptor, DirectoryError>;

    async fn create_service_principal(
        &self,
        tenant_id: &TenantId,
        token: &AccessToken,
        application_id: &str,
    ) -> Result<ServicePrincipalDescriptor, DirectoryError>;

    async fn resolve_role_definition(
        &self,
        subscription_id: &SubscriptionId,
        token: &AccessToken,
        role_name: &str,
    ) -> Result<RoleDefinition, DirectoryError>;

    /// One assignment attempt. Retrying is the caller's business.
    async fn assign_role(
        &self,
        subscription_id: &SubscriptionId,
        token: &AccessToken,
        principal_object_id: &str,
        role_definition_id: &str,
    ) -> Result<AssignmentOutcome, DirectoryError>;
}

// ── AzureDirectory ────────────────────────────────────────────────────────────

/// [`Directory`] backed by the public Azure login, AAD Graph and ARM endpoints.
#[derive(Debug, Clone)]
pub struct AzureDirectory {
    client: DirectoryClient,
}

impl AzureDirectory {
    pub fn new() -> Result<Self, DirectoryError> {
        Ok(Self { client: DirectoryClient::new()? })
    }

    /// Create an `AzureDirectory` against custom endpoints (mock servers, sovereign clouds).
    pub fn with_base_urls(base: BaseUrls) -> Result<Self, DirectoryError> {
        Ok(Self { client: DirectoryClient::with_base_urls(base)? })
    }

    pub fn client(&self) -> &DirectoryClient {
        &self.client
    }
}

#[async_trait]
impl Directory for AzureDirectory {
    async fn authenticate(&self, username: &str, password: &str) -> Result<AccessToken, DirectoryError> {
        auth::authenticate(&self.client, username, password).await
    }

    async fn resolve_tenant(&self, token: &AccessToken) -> Result<TenantId, DirectoryError> {
        resolver::resolve_tenant(&self.client, token).await
    }

    async fn list_subscriptions(&self, token: &AccessToken) -> Result<Vec<SubscriptionId>, DirectoryError> {
        resolver::list_subscriptions(&self.client, token).await
    }

    async fn create_application(
        &self,
        tenant_id: &TenantId,
        token: &AccessToken,
        display_name: &str,
    ) -> Result<ApplicationDescriptor, DirectoryError> {
        principal::create_application(&self.client, tenant_id, token, display_name).await
    }

    async fn create_service_principal(
        &self,
        tenant_id: &TenantId,
        token: &AccessToken,
        application_id: &str,
    ) -> Result<ServicePrincipalDescriptor, DirectoryError> {
        principal::create_service_principal(&self.client, tenant_id, token, application_id).await
    }

    async fn resolve_role_definition(
        &self,
        subscription_id: &SubscriptionId,
        token: &AccessToken,
        role_name: &str,
    ) -> Result<RoleDefinition, DirectoryError> {
        role::resolve_role_definition(&self.client, subscription_id, token, role_name).await
    }

    async fn assign_role(
        &self,
        subscription_id: &SubscriptionId,
        token: &AccessToken,
        principal_object_id: &str,
        role_definition_id: &str,
    ) -> Result<AssignmentOutcome, DirectoryError> {
        role::assign_role(&self.client, subscription_id, token, principal_object_id, role_definition_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve_subscriptions;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn directory(server: &MockServer) -> AzureDirectory {
        AzureDirectory::with_base_urls(BaseUrls::single(&server.uri())).unwrap()
    }

    #[tokio::test]
    async fn explicit_subscriptions_skip_listing() {
        // No mocks mounted: any request would come back 404 and show up below.
        let server = MockServer::start().await;
        let d      = directory(&server);
        let explicit = vec![SubscriptionId::new("S9"), SubscriptionId::new("S3")];

        let subs = resolve_subscriptions(&d, &AccessToken::new("t"), &explicit).await.unwrap();
        assert_eq!(subs, explicit);

        let received = server.received_requests().await;
        assert!(received.is_none() || received.unwrap().is_empty(),
            "Expected no API calls for explicit subscriptions, but got requests");
    }

    #[tokio::test]
    async fn no_explicit_subscriptions_lists_all() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subscriptions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{ "subscriptionId": "S1" }, { "subscriptionId": "S2" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let d    = directory(&server);
        let subs = resolve_subscriptions(&d, &AccessToken::new("t"), &[]).await.unwrap();
        assert_eq!(subs, vec![SubscriptionId::new("S1"), SubscriptionId::new("S2")]);
    }
}
