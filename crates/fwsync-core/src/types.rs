//! Public IP snapshot types
//!
//! `IpConfig` mirrors the JSON document served by ifconfig.co-style
//! geolocation endpoints. Deserialization is lenient: absent fields fall
//! back to defaults so a partial provider response still yields a usable
//! snapshot, while a body that is not JSON at all is a hard error.

use serde::{Deserialize, Serialize};

/// A read-only snapshot describing a resolved public IP
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpConfig {
    /// Public IP address in text form
    pub ip: String,
    /// Numeric IPv4 representation
    pub ip_decimal: u32,
    /// Country name
    pub country: String,
    /// ISO 3166-1 alpha-2 country code
    pub country_iso: String,
    /// Whether the country is an EU member
    pub country_eu: bool,
    pub latitude: f32,
    pub longitude: f32,
    /// IANA time zone name
    pub time_zone: String,
    /// Autonomous system number, e.g. "AS714"
    pub asn: String,
    /// Autonomous system organization
    pub asn_org: String,
    /// Description of the requesting user agent, when the endpoint echoes it
    pub user_agent: Option<UserAgent>,
}

/// Parsed user-agent description nested inside [`IpConfig`]
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAgent {
    pub product: Option<String>,
    pub comment: String,
    pub version: String,
    pub raw_value: String,
}
