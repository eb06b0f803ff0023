// # fwsync-core
//
// Core library for the fwsync firewall policy client.
//
// ## Architecture Overview
//
// This library provides the provider-independent half of the system:
// - **IpResolver**: Trait for resolving the caller's public IP and its
//   geolocation metadata
// - **FirewallProvider**: Trait for listing/deleting/creating firewall rules
//   on a compute instance via a cloud provider API
// - **IpCache**: Trait for remembering the last IP a policy was applied for
// - **PolicyEngine**: Orchestrates the resolve → compare → replace → persist
//   flow and owns all sequencing decisions
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Providers are isolated, stateless and
//    single-shot; all coordination lives in the engine
// 2. **Idempotency**: The IP cache prevents redundant policy replacements
// 3. **Library-First**: Everything here is usable without the FFI surface

pub mod config;
pub mod engine;
pub mod error;
pub mod rules;
pub mod state;
pub mod traits;
pub mod types;

// Re-export core types for convenience
pub use config::ClientConfig;
pub use engine::{PolicyEngine, ReplaceOutcome};
pub use error::{Error, Result};
pub use rules::{FirewallRule, ReplacePolicyRequest};
pub use state::{FileIpCache, MemoryIpCache};
pub use traits::{FirewallProvider, IpCache, IpResolver};
pub use types::{IpConfig, UserAgent};
