use azcred_domain::AccessToken;
use serde_json::Value;
use tracing::{debug, info};

use crate::client::{decode_body, DirectoryClient};
use crate::error::DirectoryError;

/// Well-known first-party public client (the Azure CLI) used for the
/// resource-owner-password grant.
pub const AZURE_CLI_CLIENT_ID: &str = "1950a258-227b-4e31-a9cf-717495945fc2";

/// Audience of the issued token: the classic management endpoint, which ARM
/// and AAD Graph both accept.
pub const MANAGEMENT_RESOURCE: &str = "https://management.core.windows.net/";

/// Exchange an AAD username/password for a bearer token.
pub async fn authenticate(
    client: &DirectoryClient,
    username: &str,
    password: &str,
) -> Result<AccessToken, DirectoryError> {
    info!("Authenticating to Azure Active Directory");
    let url = format!("{}/Common/oauth2/token", client.base().login);
    let params = [
        ("resource", MANAGEMENT_RESOURCE),
        ("client_id", AZURE_CLI_CLIENT_ID),
        ("grant_type", "password"),
        ("username", username),
        ("scope", "openid"),
        ("password", password),
    ];

    let resp = client
        .http()
        .post(&url)
        .form(&params)
        .send()
        .await
        .map_err(|e| DirectoryError::AuthenticationFailed(format!("token request: {}", e)))?;
    let status = resp.status().as_u16();
    let text = resp
        .text()
        .await
        .map_err(|e| DirectoryError::AuthenticationFailed(format!("token response: {}", e)))?;
    debug!(url = %url, status, "token endpoint responded");

    let body: Value = decode_body(&url, &text)
        .map_err(|e| DirectoryError::AuthenticationFailed(e.to_string()))?;

    match body["access_token"].as_str() {
        Some(tok) if !tok.is_empty() => Ok(AccessToken::new(tok)),
        _ => {
            let reason = body["error_description"]
                .as_str()
                .or_else(|| body["error"].as_str())
                .unwrap_or("no access_token in response");
            Err(DirectoryError::AuthenticationFailed(format!(
                "status {}: {}",
                status, reason
            )))
        }
    }
}
