//! Firewall rule wire types
//!
//! These structs use the PascalCase field names of the provider API so a
//! caller-supplied payload round-trips unmodified. `ReplacePolicyRequest`
//! also accepts the shorter `rules` alias for the rule list.

use serde::{Deserialize, Serialize};

/// A single firewall rule as understood by the provider API
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirewallRule {
    #[serde(rename = "Protocol")]
    pub protocol: Option<String>,
    #[serde(rename = "Port")]
    pub port: Option<String>,
    #[serde(rename = "CidrBlock", skip_serializing_if = "Option::is_none")]
    pub cidr_block: Option<String>,
    #[serde(rename = "Action")]
    pub action: Option<String>,
    #[serde(rename = "FirewallRuleDescription")]
    pub description: Option<String>,
}

/// Caller-supplied description of the desired firewall state
///
/// The `InstanceId` field is accepted for wire compatibility but ignored:
/// the instance a policy applies to is always the one the client was
/// configured with.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplacePolicyRequest {
    #[serde(rename = "InstanceId", default, skip_serializing_if = "String::is_empty")]
    pub instance_id: String,
    #[serde(rename = "FirewallRules", alias = "rules", default)]
    pub firewall_rules: Vec<FirewallRule>,
}

impl ReplacePolicyRequest {
    /// Parse a request from a JSON payload
    pub fn from_json(payload: &str) -> Result<Self, crate::Error> {
        let request = serde_json::from_str(payload)?;
        Ok(request)
    }

    /// Descriptions of the rules this request manages
    ///
    /// Rules without a description cannot be matched against existing
    /// provider state and are skipped here.
    pub fn descriptions(&self) -> Vec<String> {
        self.firewall_rules
            .iter()
            .filter_map(|rule| rule.description.clone())
            .collect()
    }

    /// The desired rule set with every CIDR block pinned to `ip`
    pub fn rules_for_ip(&self, ip: &str) -> Vec<FirewallRule> {
        self.firewall_rules
            .iter()
            .map(|rule| {
                let mut rule = rule.clone();
                rule.cidr_block = Some(ip.to_owned());
                rule
            })
            .collect()
    }
}
