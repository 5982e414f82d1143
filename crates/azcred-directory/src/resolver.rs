use azcred_domain::{AccessToken, SubscriptionId, TenantId};
use reqwest::Method;
use tracing::{debug, info};

use crate::client::{arm_error_message, DirectoryClient};
use crate::directory::Directory;
use crate::error::DirectoryError;

const TENANTS_API_VERSION: &str = "2015-01-01";
const SUBSCRIPTIONS_API_VERSION: &str = "2015-01-01";

/// The first tenant visible to the token's identity.
pub async fn resolve_tenant(
    client: &DirectoryClient,
    token: &AccessToken,
) -> Result<TenantId, DirectoryError> {
    info!("Retrieving tenant info");
    let url = format!(
        "{}/tenants?api-version={}",
        client.base().management,
        TENANTS_API_VERSION
    );
    let resp = client.call(Method::GET, &url, None, token).await?;
    if !resp.is_success() {
        return Err(DirectoryError::RemoteCall(format!(
            "GET {}: status {} — {}",
            url,
            resp.status,
            arm_error_message(&resp.body)
        )));
    }

    resp.body["value"]
        .as_array()
        .and_then(|tenants| tenants.first())
        .and_then(|t| t["tenantId"].as_str())
        .map(TenantId::new)
        .ok_or(DirectoryError::NoTenantFound)
}

/// Every subscription visible to the token, in service order.
///
/// Follows `nextLink` until the listing is exhausted.
pub async fn list_subscriptions(
    client: &DirectoryClient,
    token: &AccessToken,
) -> Result<Vec<SubscriptionId>, DirectoryError> {
    info!("Retrieving subscriptions info");
    let mut subscriptions = Vec::new();
    let mut next = Some(format!(
        "{}/subscriptions?api-version={}",
        client.base().management,
        SUBSCRIPTIONS_API_VERSION
    ));

    while let Some(url) = next.take() {
        let resp = client.call(Method::GET, &url, None, token).await?;
        if !resp.is_success() {
            return Err(DirectoryError::RemoteCall(format!(
                "GET {}: status {} — {}",
                url,
                resp.status,
                arm_error_message(&resp.body)
            )));
        }
        let page = resp.body["value"].as_array().ok_or_else(|| {
            DirectoryError::UnexpectedResponse(format!("GET {}: no 'value' array", url))
        })?;
        subscriptions.extend(
            page.iter()
                .filter_map(|s| s["subscriptionId"].as_str())
                .map(SubscriptionId::new),
        );
        next = resp.body["nextLink"]
            .as_str()
            .filter(|l| !l.is_empty())
            .map(str::to_string);
    }

    debug!(subscriptions = ?subscriptions, "subscription ids returned");
    Ok(subscriptions)
}

/// The subscriptions a run will process.
///
/// Explicit ids are returned verbatim and unvalidated; only an empty list
/// triggers discovery.
pub async fn resolve_subscriptions(
    directory: &dyn Directory,
    token: &AccessToken,
    explicit: &[SubscriptionId],
) -> Result<Vec<SubscriptionId>, DirectoryError> {
    if !explicit.is_empty() {
        debug!(count = explicit.len(), "using operator-supplied subscriptions");
        return Ok(explicit.to_vec());
    }
    directory.list_subscriptions(token).await
}
