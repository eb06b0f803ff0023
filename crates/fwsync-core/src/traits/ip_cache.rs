// # IP Cache Trait
//
// Defines the interface for remembering the last public IP a firewall
// policy was successfully applied for.
//
// ## Purpose
//
// The cache ensures idempotency: when the public IP has not changed since
// the last successful policy replacement, the engine short-circuits and
// issues no provider calls at all.
//
// ## Implementations
//
// - File-based: a plain text file holding the bare IP
// - In-memory: for tests and throwaway deployments

use async_trait::async_trait;

/// Trait for last-applied-IP storage
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
#[async_trait]
pub trait IpCache: Send + Sync {
    /// Get the last IP a policy was applied for
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ip))`: The recorded IP
    /// - `Ok(None)`: Nothing recorded yet
    /// - `Err(Error)`: Storage error
    async fn last_ip(&self) -> Result<Option<String>, crate::Error>;

    /// Record `ip` as the last applied IP
    ///
    /// Called by the engine only after a successful policy replacement.
    async fn store_ip(&self, ip: &str) -> Result<(), crate::Error>;
}
