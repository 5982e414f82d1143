use azcred_domain::{AccessToken, ApplicationDescriptor, ServicePrincipalDescriptor, TenantId};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::RngCore;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::client::{arm_error_message, DirectoryClient};
use crate::error::DirectoryError;

const GRAPH_API_VERSION: &str = "1.42-previewInternal";

/// Random bytes behind each generated client secret.
pub const CLIENT_SECRET_BYTES: usize = 16;

/// Lifetime of the password credential attached to a new application.
pub fn secret_validity() -> Duration {
    Duration::days(365 * 10)
}

/// A fresh URL-safe client secret from the thread-local CSPRNG.
pub fn generate_client_secret() -> String {
    let mut bytes = [0u8; CLIENT_SECRET_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn rfc3339(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Graph payload for a single-tenant application with one password credential.
///
/// `identifierUris` embeds the tenant and display name so that it is unique
/// within the tenant.
fn application_payload(
    tenant_id: &TenantId,
    display_name: &str,
    client_secret: &str,
    start: &DateTime<Utc>,
    end: &DateTime<Utc>,
    key_id: Uuid,
) -> Value {
    json!({
        "availableToOtherTenants": false,
        "displayName": display_name,
        "homepage": "https://management.core.windows.net",
        "identifierUris": [
            format!("https://{}/{}", tenant_id, display_name),
        ],
        "passwordCredentials": [
            {
                "startDate": rfc3339(start),
                "endDate":   rfc3339(end),
                "keyId":     key_id.to_string(),
                "value":     client_secret,
            }
        ]
    })
}

/// Create an AAD application carrying a locally generated password credential.
///
/// The returned descriptor holds the secret; the service never echoes it back.
pub async fn create_application(
    client: &DirectoryClient,
    tenant_id: &TenantId,
    token: &AccessToken,
    display_name: &str,
) -> Result<ApplicationDescriptor, DirectoryError> {
    info!(application = display_name, tenant = %tenant_id, "Creating application");
    let url = format!(
        "{}/{}/applications?api-version={}",
        client.base().graph,
        tenant_id,
        GRAPH_API_VERSION
    );

    let client_secret = generate_client_secret();
    let start = Utc::now();
    let end = start + secret_validity();
    let body = application_payload(tenant_id, display_name, &client_secret, &start, &end, Uuid::new_v4());

    let resp = client.call(Method::POST, &url, Some(&body), token).await?;
    if !resp.is_success() {
        return Err(DirectoryError::UnexpectedResponse(format!(
            "create application '{}': status {} — {}",
            display_name,
            resp.status,
            arm_error_message(&resp.body)
        )));
    }
    let application_id = resp.body["appId"].as_str().ok_or_else(|| {
        DirectoryError::UnexpectedResponse(format!(
            "create application '{}': no appId in response",
            display_name
        ))
    })?;

    Ok(ApplicationDescriptor {
        application_id: application_id.to_string(),
        display_name: display_name.to_string(),
        client_secret,
        secret_start: start,
        secret_end: end,
    })
}

/// Instantiate the application as a service principal in the tenant.
pub async fn create_service_principal(
    client: &DirectoryClient,
    tenant_id: &TenantId,
    token: &AccessToken,
    application_id: &str,
) -> Result<ServicePrincipalDescriptor, DirectoryError> {
    info!(application_id, "Creating service principal for application");
    let url = format!(
        "{}/{}/servicePrincipals?api-version={}",
        client.base().graph,
        tenant_id,
        GRAPH_API_VERSION
    );
    let body = json!({
        "appId": application_id,
        "accountEnabled": true,
    });

    let resp = client.call(Method::POST, &url, Some(&body), token).await?;
    if !resp.is_success() {
        return Err(DirectoryError::UnexpectedResponse(format!(
            "create service principal for {}: status {} — {}",
            application_id,
            resp.status,
            arm_error_message(&resp.body)
        )));
    }
    let object_id = resp.body["objectId"].as_str().ok_or_else(|| {
        DirectoryError::UnexpectedResponse(format!(
            "create service principal for {}: no objectId in response",
            application_id
        ))
    })?;

    Ok(ServicePrincipalDescriptor {
        object_id: object_id.to_string(),
        application_id: application_id.to_string(),
    })
}
