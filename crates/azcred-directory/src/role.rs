use azcred_domain::{AccessToken, RoleDefinition, SubscriptionId};
use reqwest::{Method, Url};
use serde_json::json;
use tracing::{debug, info};

use crate::client::{arm_error_message, DirectoryClient};
use crate::error::DirectoryError;

const AUTHORIZATION_API_VERSION: &str = "2015-07-01";

/// Result of a single role assignment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentOutcome {
    Assigned,
    /// The service answered with an error body. Usually the principal is not
    /// yet visible to the authorization subsystem.
    Rejected(String),
}

/// Look up a built-in role by exact name within a subscription.
pub async fn resolve_role_definition(
    client: &DirectoryClient,
    subscription_id: &SubscriptionId,
    token: &AccessToken,
    role_name: &str,
) -> Result<RoleDefinition, DirectoryError> {
    let base = format!(
        "{}/subscriptions/{}/providers/Microsoft.Authorization/roleDefinitions",
        client.base().management,
        subscription_id
    );
    let filter = format!("roleName eq '{}'", role_name);
    let url = Url::parse_with_params(
        &base,
        &[("$filter", filter.as_str()), ("api-version", AUTHORIZATION_API_VERSION)],
    )
    .map_err(|e| DirectoryError::RemoteCall(format!("invalid URL {}: {}", base, e)))?;

    let resp = client.call(Method::GET, url.as_str(), None, token).await?;
    if !resp.is_success() {
        return Err(DirectoryError::RemoteCall(format!(
            "list role definitions in {}: status {} — {}",
            subscription_id,
            resp.status,
            arm_error_message(&resp.body)
        )));
    }

    let first = resp.body["value"]
        .as_array()
        .and_then(|defs| defs.first())
        .ok_or_else(|| DirectoryError::RoleNotFound {
            role: role_name.to_string(),
            subscription: subscription_id.to_string(),
        })?;
    let id = first["id"].as_str().ok_or_else(|| {
        DirectoryError::UnexpectedResponse(format!("role definition '{}' has no id", role_name))
    })?;
    let name = first["properties"]["roleName"].as_str().unwrap_or(role_name);

    debug!(role = name, id, "resolved role definition");
    Ok(RoleDefinition { id: id.to_string(), name: name.to_string() })
}

/// Attempt once to grant `role_definition_id` to the principal at subscription
/// scope.
///
/// The principal's object id doubles as the assignment name, so repeated
/// attempts all target the same assignment.
pub async fn assign_role(
    client: &DirectoryClient,
    subscription_id: &SubscriptionId,
    token: &AccessToken,
    principal_object_id: &str,
    role_definition_id: &str,
) -> Result<AssignmentOutcome, DirectoryError> {
    info!(subscription = %subscription_id, "Attempting to assign service principal to role");
    let url = format!(
        "{}/subscriptions/{}/providers/Microsoft.Authorization/roleAssignments/{}?api-version={}",
        client.base().management,
        subscription_id,
        principal_object_id,
        AUTHORIZATION_API_VERSION
    );
    let body = json!({
        "properties": {
            "roleDefinitionId": role_definition_id,
            "principalId": principal_object_id,
        }
    });

    let resp = client.call(Method::PUT, &url, Some(&body), token).await?;
    if resp.has_error() {
        return Ok(AssignmentOutcome::Rejected(arm_error_message(&resp.body)));
    }
    Ok(AssignmentOutcome::Assigned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::BaseUrls;
    use wiremock::{
        matchers::{body_partial_json, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    const CONTRIBUTOR_ID: &str =
        "/subscriptions/S1/providers/Microsoft.Authorization/roleDefinitions/b24988ac-6180-42a0-ab88-20f7382dd24c";

    fn client(server: &MockServer) -> DirectoryClient {
        DirectoryClient::with_base_urls(BaseUrls::single(&server.uri())).unwrap()
    }

    fn token() -> AccessToken {
        AccessToken::new("fake-token")
    }

    #[tokio::test]
    async fn role_definition_filtered_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subscriptions/S1/providers/Microsoft.Authorization/roleDefinitions"))
            .and(query_param("$filter", "roleName eq 'Contributor'"))
            .and(query_param("api-version", "2015-07-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{
                    "id":   CONTRIBUTOR_ID,
                    "name": "b24988ac-6180-42a0-ab88-20f7382dd24c",
                    "properties": { "roleName": "Contributor", "type": "BuiltInRole" }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let def = resolve_role_definition(&client(&server), &SubscriptionId::new("S1"), &token(), "Contributor")
            .await
            .unwrap();
        assert_eq!(def.id, CONTRIBUTOR_ID);
        assert_eq!(def.name, "Contributor");
    }

    #[tokio::test]
    async fn empty_role_definition_list_is_role_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subscriptions/S1/providers/Microsoft.Authorization/roleDefinitions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let err = resolve_role_definition(&client(&server), &SubscriptionId::new("S1"), &token(), "Owner")
            .await
            .unwrap_err();
        assert!(
            matches!(err, DirectoryError::RoleNotFound { ref role, ref subscription } if role == "Owner" && subscription == "S1"),
            "got: {}",
            err
        );
    }

    #[tokio::test]
    async fn assignment_targets_principal_object_id() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/subscriptions/S1/providers/Microsoft.Authorization/roleAssignments/sp-object-1"))
            .and(query_param("api-version", "2015-07-01"))
            .and(body_partial_json(json!({
                "properties": {
                    "roleDefinitionId": CONTRIBUTOR_ID,
                    "principalId": "sp-object-1",
                }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "/subscriptions/S1/providers/Microsoft.Authorization/roleAssignments/sp-object-1",
                "properties": { "roleDefinitionId": CONTRIBUTOR_ID, "principalId": "sp-object-1" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = assign_role(&client(&server), &SubscriptionId::new("S1"), &token(), "sp-object-1", CONTRIBUTOR_ID)
            .await
            .unwrap();
        assert_eq!(outcome, AssignmentOutcome::Assigned);
    }

    #[tokio::test]
    async fn assignment_error_body_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/subscriptions/S1/providers/Microsoft.Authorization/roleAssignments/sp-object-1"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": "PrincipalNotFound",
                    "message": "Principal sp-object-1 does not exist in the directory."
                }
            })))
            .mount(&server)
            .await;

        let outcome = assign_role(&client(&server), &SubscriptionId::new("S1"), &token(), "sp-object-1", CONTRIBUTOR_ID)
            .await
            .unwrap();
        match outcome {
            AssignmentOutcome::Rejected(msg) => assert!(msg.starts_with("PrincipalNotFound"), "got: {}", msg),
            other => panic!("expected Rejected, got {:?}", other),
        }
    }
}
