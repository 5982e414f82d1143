use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

// ── Identifiers ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

impl TenantId {
    pub fn new(s: impl Into<String>) -> Self {
        TenantId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub String);

impl SubscriptionId {
    pub fn new(s: impl Into<String>) -> Self {
        SubscriptionId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bearer token obtained once per run. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(s: impl Into<String>) -> Self {
        AccessToken(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

// ── Enums ─────────────────────────────────────────────────────────────────────

/// Built-in Azure roles the service principal may be granted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleName {
    #[default]
    Contributor,
    Owner,
}

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Contributor => "Contributor",
            RoleName::Owner => "Owner",
        }
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoleName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "contributor" => Ok(RoleName::Contributor),
            "owner" => Ok(RoleName::Owner),
            _ => Err(DomainError::UnknownRole(s.to_string())),
        }
    }
}

/// Target tool syntax for the rendered credentials file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    Chef,
    Puppet,
    Terraform,
    #[default]
    Generic,
}

impl OutputStyle {
    /// Resolve a style name. Anything unrecognised, empty or absent renders as
    /// [`OutputStyle::Generic`].
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            Some("chef") => OutputStyle::Chef,
            Some("puppet") => OutputStyle::Puppet,
            Some("terraform") => OutputStyle::Terraform,
            _ => OutputStyle::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputStyle::Chef => "chef",
            OutputStyle::Puppet => "puppet",
            OutputStyle::Terraform => "terraform",
            OutputStyle::Generic => "generic",
        }
    }
}

impl std::fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Directory objects ─────────────────────────────────────────────────────────

/// An AAD application created for one subscription.
///
/// `client_secret` is generated locally and is never returned by the service;
/// this struct is the only place it exists until it is written out.
#[derive(Clone, PartialEq, Eq)]
pub struct ApplicationDescriptor {
    pub application_id: String,
    pub display_name: String,
    pub client_secret: String,
    pub secret_start: DateTime<Utc>,
    pub secret_end: DateTime<Utc>,
}

impl std::fmt::Debug for ApplicationDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationDescriptor")
            .field("application_id", &self.application_id)
            .field("display_name", &self.display_name)
            .field("client_secret", &"***")
            .field("secret_start", &self.secret_start)
            .field("secret_end", &self.secret_end)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePrincipalDescriptor {
    pub object_id: String,
    pub application_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Fully qualified role definition resource id.
    pub id: String,
    pub name: String,
}

// ── Output ────────────────────────────────────────────────────────────────────

/// One subscription's worth of machine credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub subscription_id: SubscriptionId,
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: TenantId,
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("subscription_id", &self.subscription_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}
