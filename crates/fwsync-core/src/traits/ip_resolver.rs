// # IP Resolver Trait
//
// Defines the interface for resolving the caller's public IP address and
// its geolocation metadata.
//
// ## Implementations
//
// - HTTP-based (ifconfig.co-style JSON endpoint): `fwsync-ip-http` crate

use async_trait::async_trait;

use crate::types::IpConfig;

/// Trait for public IP resolver implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Constraints
///
/// Resolvers are single-shot observers. They must not retry internally
/// (retry policy belongs to the caller), must not cache results beyond a
/// single request, and must not spawn background tasks.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Resolve the current public IP configuration
    ///
    /// # Returns
    ///
    /// - `Ok(IpConfig)`: A fully populated snapshot
    /// - `Err(Error)`: If the lookup failed (network, status, decode)
    async fn resolve(&self) -> Result<IpConfig, crate::Error>;
}
