use std::time::Duration;

use azcred_domain::AccessToken;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::DirectoryError;

/// Upper bound on any single request. A hung remote call otherwise blocks
/// the whole run.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ── Base URLs (overridden in tests) ───────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct BaseUrls {
    /// OAuth2 token endpoint host.
    pub login:      String,
    /// Azure Resource Manager.
    pub management: String,
    /// AAD Graph (applications and service principals).
    pub graph:      String,
}

impl Default for BaseUrls {
    fn default() -> Self {
        Self {
            login:      "https://login.windows.net".into(),
            management: "https://management.azure.com".into(),
            graph:      "https://graph.windows.net".into(),
        }
    }
}

impl BaseUrls {
    /// Point every endpoint family at one host. Used with mock servers.
    pub fn single(url: &str) -> Self {
        let url = url.trim_end_matches('/');
        Self {
            login:      url.to_string(),
            management: url.to_string(),
            graph:      url.to_string(),
        }
    }
}

// ── Response ──────────────────────────────────────────────────────────────────

/// Decoded response of a directory or management call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body; `{}` when the service returned nothing.
    pub body:   Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when the body carries an ARM or Graph error object.
    pub fn has_error(&self) -> bool {
        self.body.get("error").is_some() || self.body.get("odata.error").is_some()
    }
}

// ── DirectoryClient ───────────────────────────────────────────────────────────

/// Authenticated JSON caller for the login, graph and management endpoints.
///
/// Does not retry and does not interpret status codes; callers decide what a
/// given status or body means.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base: BaseUrls,
}

impl DirectoryClient {
    pub fn new() -> Result<Self, DirectoryError> {
        Self::with_base_urls(BaseUrls::default())
    }

    pub fn with_base_urls(base: BaseUrls) -> Result<Self, DirectoryError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DirectoryError::RemoteCall(format!("building HTTP client: {}", e)))?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &BaseUrls {
        &self.base
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Send one bearer-authenticated JSON request and decode the reply.
    pub async fn call(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        token: &AccessToken,
    ) -> Result<ApiResponse, DirectoryError> {
        debug!(%method, url, "directory request");
        if let Some(b) = body {
            trace!(%method, url, payload = %b, "directory request payload");
        }

        let mut req = self
            .http
            .request(method.clone(), url)
            .bearer_auth(token.as_str())
            .header(CONTENT_TYPE, "application/json");
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| DirectoryError::RemoteCall(format!("{} {}: {}", method, url, e)))?;

        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .map_err(|e| DirectoryError::RemoteCall(format!("{} {}: reading body: {}", method, url, e)))?;
        debug!(%method, url, status, body = %text, "directory response");

        let body = decode_body(url, &text)?;
        Ok(ApiResponse { status, body })
    }
}

/// Parse a response body. Empty bodies decode to an empty object.
pub(crate) fn decode_body(url: &str, text: &str) -> Result<Value, DirectoryError> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(text).map_err(|e| DirectoryError::Decode {
        url:     url.to_string(),
        message: e.to_string(),
    })
}

// ── Error parsing ─────────────────────────────────────────────────────────────

/// Summarise an ARM (`error.code`/`error.message`) or AAD Graph
/// (`odata.error.code`/`odata.error.message.value`) error body.
pub fn arm_error_message(body: &Value) -> String {
    if let Some(err) = body.get("odata.error") {
        let code    = err["code"].as_str().unwrap_or("Unknown");
        let message = err["message"]["value"]
            .as_str()
            .or_else(|| err["message"].as_str())
            .unwrap_or("unknown error");
        return format!("{}: {}", code, message);
    }
    let err = body
        .get("error")
        .or_else(|| body.get("Error"))
        .unwrap_or(body);
    let code    = err["code"].as_str().unwrap_or("Unknown");
    let message = err["message"].as_str().unwrap_or("unknown error");
    format!("{}: {}", code, message)
}
