// # Lighthouse Firewall Provider
//
// This crate provides a Tencent Lighthouse firewall provider implementation
// for the fwsync system.
//
// - Makes one signed HTTP request per trait call
// - Full error propagation to the engine (the engine decides what happens
//   next; there is NO retry, backoff or caching in here)
// - HTTP timeout configured (30 seconds)
// - Deleting rules that are already gone is treated as success
//
// ## Security
//
// - The token key NEVER appears in logs or Debug output
// - The provider fails fast if either credential is empty
//
// ## API Reference
//
// - Lighthouse API version 2020-03-24
// - DescribeFirewallRules / DeleteFirewallRules / CreateFirewallRules,
//   all POSTs to the service host signed with TC3-HMAC-SHA256

pub mod sign;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use fwsync_core::rules::FirewallRule;
use fwsync_core::traits::FirewallProvider;
use fwsync_core::{Error, Result};
use reqwest::header::{CONTENT_TYPE, HOST};
use serde::{Deserialize, Serialize};

/// Lighthouse API host
const API_HOST: &str = "lighthouse.tencentcloudapi.com";

/// Lighthouse API version header value
const API_VERSION: &str = "2020-03-24";

/// Service name used in the credential scope
const SERVICE: &str = "lighthouse";

/// Default region for API calls
const DEFAULT_REGION: &str = "ap-shanghai";

/// Content type of every request
const CONTENT_TYPE_JSON: &str = "application/json";

/// Default HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Error code the delete action returns when the rules are already gone
const RULES_NOT_FOUND: &str = "ResourceNotFound.FirewallRulesNotFound";

/// Tencent Lighthouse firewall provider
///
/// Stateless and single-shot: each trait call performs exactly one signed
/// API exchange. All coordination (idempotency, sequencing) is owned by
/// the engine.
pub struct LighthouseProvider {
    /// Credential token id
    secret_id: String,

    /// Credential token key
    /// ⚠️ NEVER log this value
    secret_key: String,

    /// Region the API calls are scoped to
    region: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for LighthouseProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LighthouseProvider")
            .field("secret_id", &"<REDACTED>")
            .field("secret_key", &"<REDACTED>")
            .field("region", &self.region)
            .finish()
    }
}

impl LighthouseProvider {
    /// Create a new Lighthouse provider in the default region
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        Self::with_region(secret_id, secret_key, DEFAULT_REGION)
    }

    /// Create a new Lighthouse provider scoped to `region`
    pub fn with_region(
        secret_id: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Result<Self> {
        let secret_id = secret_id.into();
        let secret_key = secret_key.into();
        if secret_id.is_empty() || secret_key.is_empty() {
            return Err(Error::config("Lighthouse credentials cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            secret_id,
            secret_key,
            region: region.into(),
            client,
        })
    }

    /// Perform one signed API action and return the raw response body
    async fn post_action(&self, action: &str, payload: String) -> Result<String> {
        let now = Utc::now();
        let timestamp = now.timestamp();
        let date = now.format("%Y-%m-%d").to_string();
        let authorization = sign::authorization_header(
            API_HOST,
            CONTENT_TYPE_JSON,
            &payload,
            timestamp,
            &date,
            &self.secret_id,
            &self.secret_key,
            SERVICE,
        );

        tracing::debug!("Calling {} on {}", action, API_HOST);

        let response = self
            .client
            .post(format!("https://{API_HOST}"))
            .header("Authorization", authorization)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header(HOST, API_HOST)
            .header("X-TC-Action", action)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("X-TC-Version", API_VERSION)
            .header("X-TC-Region", &self.region)
            .body(payload)
            .send()
            .await
            .map_err(|e| Error::http(format!("{} request failed: {}", action, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read {} response: {}", action, e)))?;

        if !status.is_success() {
            return Err(Error::provider(
                SERVICE,
                format!("{} returned HTTP {}: {}", action, status, body),
            ));
        }

        Ok(body)
    }

    /// Map a provider error envelope to our error type
    ///
    /// Credential and signature problems surface as authentication errors
    /// so callers can tell them apart from rule validation failures.
    fn map_api_error(error: ApiError) -> Error {
        if error.code.starts_with("AuthFailure") || error.code.contains("SecretId") {
            Error::auth(error.message)
        } else {
            Error::provider(SERVICE, error.message)
        }
    }

    /// Decode a DescribeFirewallRules response body into rules
    fn decode_describe(body: &str) -> Result<Vec<FirewallRule>> {
        let root: DescribeResponseRoot = serde_json::from_str(body)?;
        let Some(response) = root.response else {
            return Ok(Vec::new());
        };
        if let Some(error) = response.error {
            return Err(Self::map_api_error(error));
        }
        let rules = response
            .firewall_rule_set
            .unwrap_or_default()
            .into_iter()
            .map(RuleSetEntry::into_rule)
            .collect();
        Ok(rules)
    }

    /// Decode a Create/DeleteFirewallRules response body
    ///
    /// `tolerate_missing` makes the rules-not-found code a success, which
    /// delete wants: the desired state already holds.
    fn decode_mutation(body: &str, tolerate_missing: bool) -> Result<()> {
        let root: MutationResponseRoot = serde_json::from_str(body)?;
        if let Some(error) = root.response.error {
            if tolerate_missing && error.code == RULES_NOT_FOUND {
                return Ok(());
            }
            return Err(Self::map_api_error(error));
        }
        Ok(())
    }
}

#[async_trait]
impl FirewallProvider for LighthouseProvider {
    async fn list_rules(&self, instance_id: &str) -> Result<Vec<FirewallRule>> {
        let payload = serde_json::to_string(&DescribeRequest {
            instance_id,
            offset: 0,
            limit: 100,
        })?;
        let body = self.post_action("DescribeFirewallRules", payload).await?;
        Self::decode_describe(&body)
    }

    async fn delete_rules(&self, instance_id: &str, rules: &[FirewallRule]) -> Result<()> {
        let payload = serde_json::to_string(&MutationRequest {
            instance_id,
            firewall_rules: rules,
        })?;
        let body = self.post_action("DeleteFirewallRules", payload).await?;
        Self::decode_mutation(&body, true)
    }

    async fn create_rules(&self, instance_id: &str, rules: &[FirewallRule]) -> Result<()> {
        let payload = serde_json::to_string(&MutationRequest {
            instance_id,
            firewall_rules: rules,
        })?;
        let body = self.post_action("CreateFirewallRules", payload).await?;
        Self::decode_mutation(&body, false)
    }

    fn provider_name(&self) -> &'static str {
        "lighthouse"
    }
}

/// DescribeFirewallRules request body
#[derive(Serialize)]
struct DescribeRequest<'a> {
    #[serde(rename = "InstanceId")]
    instance_id: &'a str,
    #[serde(rename = "Offset")]
    offset: u32,
    #[serde(rename = "Limit")]
    limit: u32,
}

/// Create/DeleteFirewallRules request body
#[derive(Serialize)]
struct MutationRequest<'a> {
    #[serde(rename = "InstanceId")]
    instance_id: &'a str,
    #[serde(rename = "FirewallRules")]
    firewall_rules: &'a [FirewallRule],
}

/// Error envelope shared by all actions
#[derive(Debug, Clone, Deserialize)]
struct ApiError {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message")]
    message: String,
}

#[derive(Deserialize)]
struct DescribeResponseRoot {
    #[serde(rename = "Response")]
    response: Option<DescribeResponse>,
}

#[derive(Deserialize)]
struct DescribeResponse {
    #[serde(rename = "FirewallRuleSet")]
    firewall_rule_set: Option<Vec<RuleSetEntry>>,
    #[serde(rename = "Error")]
    error: Option<ApiError>,
}

/// A rule as reported by DescribeFirewallRules
///
/// Carries an `AppType` field the mutation actions reject, so it is
/// dropped in the conversion to [`FirewallRule`].
#[derive(Deserialize)]
struct RuleSetEntry {
    #[serde(rename = "Protocol")]
    protocol: String,
    #[serde(rename = "Port")]
    port: Option<String>,
    #[serde(rename = "CidrBlock")]
    cidr_block: String,
    #[serde(rename = "Action")]
    action: Option<String>,
    #[serde(rename = "FirewallRuleDescription")]
    description: Option<String>,
}

impl RuleSetEntry {
    fn into_rule(self) -> FirewallRule {
        FirewallRule {
            protocol: Some(self.protocol),
            port: self.port,
            cidr_block: Some(self.cidr_block),
            action: self.action,
            description: self.description,
        }
    }
}

#[derive(Deserialize)]
struct MutationResponseRoot {
    #[serde(rename = "Response")]
    response: MutationResponse,
}

#[derive(Deserialize)]
struct MutationResponse {
    #[serde(rename = "Error")]
    error: Option<ApiError>,
}
