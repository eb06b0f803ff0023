//! Test doubles and common utilities for engine contract tests
//!
//! These doubles verify the engine's sequencing and idempotency contracts
//! without any real network I/O.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use fwsync_core::error::Result;
use fwsync_core::rules::FirewallRule;
use fwsync_core::traits::{FirewallProvider, IpResolver};
use fwsync_core::types::IpConfig;
use fwsync_core::{ClientConfig, Error};

/// A resolver that always returns the same IP (or always fails)
pub struct StaticIpResolver {
    ip: String,
    fail: bool,
    resolve_call_count: Arc<AtomicUsize>,
}

impl StaticIpResolver {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            fail: false,
            resolve_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A resolver whose every call fails with an IP lookup error
    pub fn failing() -> Self {
        Self {
            ip: String::new(),
            fail: true,
            resolve_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn resolve_call_count(&self) -> usize {
        self.resolve_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpResolver for StaticIpResolver {
    async fn resolve(&self) -> Result<IpConfig> {
        self.resolve_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::ip_lookup("connection reset by peer"));
        }
        Ok(IpConfig {
            ip: self.ip.clone(),
            country: "United States".to_string(),
            country_iso: "US".to_string(),
            ..IpConfig::default()
        })
    }
}

/// Which provider call should fail, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    None,
    /// Every call fails with an authentication error
    Authentication,
    /// Only create_rules fails
    Create,
}

/// A mock FirewallProvider that tracks calls and can inject failures
pub struct MockFirewallProvider {
    /// Rules reported by list_rules
    existing_rules: Vec<FirewallRule>,
    failure: FailureMode,
    list_call_count: Arc<AtomicUsize>,
    delete_call_count: Arc<AtomicUsize>,
    create_call_count: Arc<AtomicUsize>,
    created_rules: Arc<std::sync::Mutex<Vec<FirewallRule>>>,
    deleted_rules: Arc<std::sync::Mutex<Vec<FirewallRule>>>,
}

impl MockFirewallProvider {
    pub fn new() -> Self {
        Self {
            existing_rules: Vec::new(),
            failure: FailureMode::None,
            list_call_count: Arc::new(AtomicUsize::new(0)),
            delete_call_count: Arc::new(AtomicUsize::new(0)),
            create_call_count: Arc::new(AtomicUsize::new(0)),
            created_rules: Arc::new(std::sync::Mutex::new(Vec::new())),
            deleted_rules: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn with_existing_rules(mut self, rules: Vec<FirewallRule>) -> Self {
        self.existing_rules = rules;
        self
    }

    pub fn with_failure(mut self, failure: FailureMode) -> Self {
        self.failure = failure;
        self
    }

    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    pub fn delete_call_count(&self) -> usize {
        self.delete_call_count.load(Ordering::SeqCst)
    }

    pub fn create_call_count(&self) -> usize {
        self.create_call_count.load(Ordering::SeqCst)
    }

    pub fn created_rules(&self) -> Vec<FirewallRule> {
        self.created_rules.lock().unwrap().clone()
    }

    pub fn deleted_rules(&self) -> Vec<FirewallRule> {
        self.deleted_rules.lock().unwrap().clone()
    }

    fn check_auth(&self) -> Result<()> {
        if self.failure == FailureMode::Authentication {
            return Err(Error::auth(
                "The SecretId is not found, please ensure that your SecretId is correct.",
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl FirewallProvider for MockFirewallProvider {
    async fn list_rules(&self, _instance_id: &str) -> Result<Vec<FirewallRule>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        self.check_auth()?;
        Ok(self.existing_rules.clone())
    }

    async fn delete_rules(&self, _instance_id: &str, rules: &[FirewallRule]) -> Result<()> {
        self.delete_call_count.fetch_add(1, Ordering::SeqCst);
        self.check_auth()?;
        self.deleted_rules.lock().unwrap().extend_from_slice(rules);
        Ok(())
    }

    async fn create_rules(&self, _instance_id: &str, rules: &[FirewallRule]) -> Result<()> {
        self.create_call_count.fetch_add(1, Ordering::SeqCst);
        self.check_auth()?;
        if self.failure == FailureMode::Create {
            return Err(Error::provider("mock", "rule validation rejected by provider"));
        }
        self.created_rules.lock().unwrap().extend_from_slice(rules);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A rule carrying only a description, as managed rule sets use
pub fn rule(description: &str) -> FirewallRule {
    FirewallRule {
        protocol: Some("TCP".to_string()),
        port: Some("443".to_string()),
        cidr_block: Some("192.0.2.1".to_string()),
        action: Some("ACCEPT".to_string()),
        description: Some(description.to_string()),
    }
}

/// Minimal valid client configuration for tests
pub fn test_config() -> ClientConfig {
    ClientConfig::new("/tmp/fwsync-test.txt", "instance-1", "tok-id", "tok-key")
}
