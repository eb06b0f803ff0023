//! Core policy engine
//!
//! The PolicyEngine is responsible for:
//! - Resolving the current public IP via an IpResolver
//! - Checking the IP cache for idempotency
//! - Replacing firewall rules via a FirewallProvider
//! - Persisting the applied IP after a successful replacement
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐
//! │ IpResolver  │──── IpConfig ───────┐
//! └─────────────┘                     │
//!                                     ▼
//!                            ┌──────────────────┐
//!                            │  PolicyEngine    │
//!                            └──────────────────┘
//!                                     │
//!                   ┌─────────────────┴─────────────────┐
//!                   ▼                                   ▼
//!          ┌─────────────┐                  ┌──────────────────┐
//!          │  IpCache    │                  │ FirewallProvider │
//!          │  (compare)  │                  │ (replace rules)  │
//!          └─────────────┘                  └──────────────────┘
//! ```
//!
//! ## Replace Flow
//!
//! 1. Resolve the current public IP
//! 2. Compare against the cached last-applied IP; unchanged → done
//! 3. Delete the previously managed rules (matched by description)
//! 4. Create the requested rules with every CIDR pinned to the new IP
//! 5. Persist the IP only after the create succeeded
//!
//! The engine owns all sequencing; resolvers, providers and caches are
//! single-purpose collaborators that never call each other.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::rules::ReplacePolicyRequest;
use crate::traits::{FirewallProvider, IpCache, IpResolver};
use crate::types::IpConfig;

/// Terminal outcome of a policy replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// The rule set was replaced and pinned to a new IP
    Replaced {
        /// The IP the rules are now pinned to
        new_ip: String,
        /// The previously recorded IP, if any
        previous_ip: Option<String>,
        /// Number of rules installed
        rule_count: usize,
    },
    /// The public IP matches the last applied one; nothing to do
    Unchanged {
        /// The current (and already applied) IP
        current_ip: String,
    },
}

impl ReplaceOutcome {
    /// Human-readable confirmation line for this outcome
    pub fn confirmation(&self, instance_id: &str) -> String {
        match self {
            ReplaceOutcome::Replaced {
                new_ip, rule_count, ..
            } => format!(
                "Replaced firewall policy on {}: {} rule(s) pinned to {}",
                instance_id, rule_count, new_ip
            ),
            ReplaceOutcome::Unchanged { current_ip } => format!(
                "Firewall policy on {} unchanged: public IP {} already applied",
                instance_id, current_ip
            ),
        }
    }
}

/// Orchestrates the resolve → compare → replace → persist flow
///
/// ## Threading
///
/// The engine holds only `Arc`s and an immutable configuration, so it can
/// be cloned and shared freely across tasks. Concurrent operations against
/// the same engine are not serialized; callers needing ordering must
/// sequence their own calls.
#[derive(Clone)]
pub struct PolicyEngine {
    /// Resolver for the current public IP
    resolver: Arc<dyn IpResolver>,

    /// Firewall provider for rule manipulation
    provider: Arc<dyn FirewallProvider>,

    /// Last-applied-IP cache for idempotency
    cache: Arc<dyn IpCache>,

    /// Immutable per-client configuration
    config: ClientConfig,
}

impl PolicyEngine {
    /// Create a new policy engine
    ///
    /// Validates the configuration; performs no network I/O.
    pub fn new(
        resolver: Arc<dyn IpResolver>,
        provider: Arc<dyn FirewallProvider>,
        cache: Arc<dyn IpCache>,
        config: ClientConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            resolver,
            provider,
            cache,
            config,
        })
    }

    /// The configuration this engine was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve the current public IP configuration
    ///
    /// A plain pass-through to the resolver; the cache is not consulted.
    pub async fn resolve_ip_config(&self) -> Result<IpConfig> {
        let ip_config = self.resolver.resolve().await?;
        debug!("Resolved public IP {}", ip_config.ip);
        Ok(ip_config)
    }

    /// Replace the instance firewall policy with the requested rule set
    ///
    /// This is a full replacement, not an incremental patch: previously
    /// managed rules (matched by description) are removed and exactly the
    /// requested rules are installed, each pinned to the freshly resolved
    /// public IP.
    ///
    /// When the public IP matches the cached last-applied IP the provider
    /// is not contacted at all and [`ReplaceOutcome::Unchanged`] is
    /// returned.
    pub async fn replace_policy(&self, request: &ReplacePolicyRequest) -> Result<ReplaceOutcome> {
        let instance_id = &self.config.instance_id;
        if !request.instance_id.is_empty() && request.instance_id != *instance_id {
            warn!(
                "Payload names instance {}, using configured instance {}",
                request.instance_id, instance_id
            );
        }

        let ip = self.resolver.resolve().await?.ip;
        let previous_ip = self.cache.last_ip().await?;

        if previous_ip.as_deref() == Some(ip.as_str()) {
            info!("Public IP {} unchanged since last apply, skipping", ip);
            return Ok(ReplaceOutcome::Unchanged { current_ip: ip });
        }

        // Remove the rules we manage (matched by description) before
        // installing the new set, so descriptions stay unique.
        let descriptions = request.descriptions();
        let existing: Vec<_> = self
            .provider
            .list_rules(instance_id)
            .await?
            .into_iter()
            .filter(|rule| {
                rule.description
                    .as_ref()
                    .is_some_and(|desc| descriptions.contains(desc))
            })
            .collect();

        if existing.is_empty() {
            debug!("No previously managed rules found on {}", instance_id);
        } else {
            debug!(
                "Deleting {} previously managed rule(s) on {}",
                existing.len(),
                instance_id
            );
            self.provider.delete_rules(instance_id, &existing).await?;
        }

        let rules = request.rules_for_ip(&ip);
        self.provider.create_rules(instance_id, &rules).await?;
        info!(
            "Installed {} rule(s) on {} for IP {}",
            rules.len(),
            instance_id,
            ip
        );

        // Persist only after the provider accepted the new rule set, so a
        // failed replacement is retried on the next call.
        self.cache.store_ip(&ip).await?;

        Ok(ReplaceOutcome::Replaced {
            new_ip: ip,
            previous_ip,
            rule_count: rules.len(),
        })
    }
}
