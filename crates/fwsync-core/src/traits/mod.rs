//! Core traits for the fwsync system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpResolver`]: Resolve the current public IP and its metadata
//! - [`FirewallProvider`]: Manipulate firewall rules via provider APIs
//! - [`IpCache`]: Persistent last-applied-IP storage for idempotency

pub mod firewall_provider;
pub mod ip_cache;
pub mod ip_resolver;

pub use firewall_provider::FirewallProvider;
pub use ip_cache::IpCache;
pub use ip_resolver::IpResolver;
