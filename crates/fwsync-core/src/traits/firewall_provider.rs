// # Firewall Provider Trait
//
// Defines the interface for manipulating instance firewall rules via a
// cloud provider API.
//
// ## Implementations
//
// - Tencent Lighthouse: `fwsync-provider-lighthouse` crate
//
// ## Trust Level
//
// Providers are untrusted, stateless, single-shot integrations:
//
// - Allowed: HTTPS API calls to their own endpoints, response parsing
// - Forbidden: retry/backoff logic (owned by the caller), access to the
//   IP cache (owned by `PolicyEngine`), spawning tasks, caching state
//   beyond a single request
//
// A provider that fails simply returns an error; the engine decides what
// happens next.

use async_trait::async_trait;

use crate::rules::FirewallRule;

/// Trait for firewall provider implementations
///
/// All methods operate on the firewall of a single named instance and
/// perform exactly one API exchange each.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait FirewallProvider: Send + Sync {
    /// List all firewall rules currently installed on the instance
    async fn list_rules(&self, instance_id: &str) -> Result<Vec<FirewallRule>, crate::Error>;

    /// Delete the given rules from the instance firewall
    ///
    /// Deleting rules that no longer exist must be treated as success:
    /// the desired state (rules absent) already holds.
    async fn delete_rules(
        &self,
        instance_id: &str,
        rules: &[FirewallRule],
    ) -> Result<(), crate::Error>;

    /// Create the given rules on the instance firewall
    async fn create_rules(
        &self,
        instance_id: &str,
        rules: &[FirewallRule],
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
