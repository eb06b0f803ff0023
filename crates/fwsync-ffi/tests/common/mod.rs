//! Shared doubles and callback plumbing for C surface tests
//!
//! The callbacks funnel every terminal invocation into an mpsc channel, so
//! a test can assert both that a callback fired and that nothing fired
//! after it.

#![allow(dead_code)]

use std::ffi::{CStr, c_char, c_void};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

use async_trait::async_trait;
use fwsync_core::rules::FirewallRule;
use fwsync_core::traits::{FirewallProvider, IpCache, IpResolver};
use fwsync_core::types::IpConfig;
use fwsync_core::{ClientConfig, Error, PolicyEngine, Result};
use fwsync_ffi::{FwClient, IpConfigCallback, IpConfigNative, PolicyCallback};

pub const TEST_IP: &str = "203.0.113.7";
pub const TEST_INSTANCE: &str = "lhins-3jq1gki4";

/// Resolver double whose failure mode can be flipped between calls
pub struct SwitchableIpResolver {
    ip: String,
    fail: Arc<AtomicBool>,
}

impl SwitchableIpResolver {
    pub fn returning(ip: &str) -> (Arc<Self>, Arc<AtomicBool>) {
        let fail = Arc::new(AtomicBool::new(false));
        let resolver = Arc::new(Self {
            ip: ip.to_string(),
            fail: fail.clone(),
        });
        (resolver, fail)
    }
}

#[async_trait]
impl IpResolver for SwitchableIpResolver {
    async fn resolve(&self) -> Result<IpConfig> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::ip_lookup("connection reset by peer"));
        }
        Ok(IpConfig {
            ip: self.ip.clone(),
            ..IpConfig::default()
        })
    }
}

/// Provider double counting every call, with a switchable auth rejection
pub struct CountingProvider {
    existing_rules: Vec<FirewallRule>,
    pub list_calls: Arc<AtomicUsize>,
    pub delete_calls: Arc<AtomicUsize>,
    pub create_calls: Arc<AtomicUsize>,
    pub reject_auth: Arc<AtomicBool>,
}

impl CountingProvider {
    pub fn with_existing(existing_rules: Vec<FirewallRule>) -> Arc<Self> {
        Arc::new(Self {
            existing_rules,
            list_calls: Arc::new(AtomicUsize::new(0)),
            delete_calls: Arc::new(AtomicUsize::new(0)),
            create_calls: Arc::new(AtomicUsize::new(0)),
            reject_auth: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::with_existing(Vec::new())
    }

    pub fn call_total(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
            + self.delete_calls.load(Ordering::SeqCst)
            + self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FirewallProvider for CountingProvider {
    async fn list_rules(&self, _instance_id: &str) -> Result<Vec<FirewallRule>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_auth.load(Ordering::SeqCst) {
            return Err(Error::auth(
                "The SecretId is not found, please ensure that your SecretId is correct.",
            ));
        }
        Ok(self.existing_rules.clone())
    }

    async fn delete_rules(&self, _instance_id: &str, _rules: &[FirewallRule]) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn create_rules(&self, _instance_id: &str, _rules: &[FirewallRule]) -> Result<()> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "counting-mock"
    }
}

pub fn rule(description: &str) -> FirewallRule {
    FirewallRule {
        protocol: Some("TCP".to_string()),
        port: Some("443".to_string()),
        cidr_block: None,
        action: Some("ACCEPT".to_string()),
        description: Some(description.to_string()),
    }
}

/// Build a C handle around mock collaborators
///
/// The pointer must be released with `fwsync_client_free`.
pub fn client_with(
    resolver: Arc<dyn IpResolver>,
    provider: Arc<dyn FirewallProvider>,
    cache: Arc<dyn IpCache>,
) -> *mut FwClient {
    let config = ClientConfig::new("/tmp/fwsync-unused.txt", TEST_INSTANCE, "tok-id", "tok-key");
    let engine = PolicyEngine::new(resolver, provider, cache, config).unwrap();
    Box::into_raw(Box::new(FwClient::with_engine(engine)))
}

/// Terminal callback observations, one per invocation
pub enum Event {
    IpResult { ip: String, has_agent: bool },
    PolicyResult(String),
    /// Confirmation pointer kept alive past the callback, as a usize so it
    /// can cross the channel
    RetainedPolicy(usize),
    Error(String),
}

/// Owner context handed to the C callbacks
pub struct Probe {
    tx: Sender<Event>,
}

pub fn probe() -> (Box<Probe>, Receiver<Event>) {
    let (tx, rx) = channel();
    (Box::new(Probe { tx }), rx)
}

extern "C" fn on_ip_result(owner: *mut c_void, arg: *const IpConfigNative) {
    let probe = unsafe { &*(owner as *const Probe) };
    let native = unsafe { &*arg };
    let ip = unsafe { CStr::from_ptr(native.ip) }
        .to_string_lossy()
        .into_owned();
    probe
        .tx
        .send(Event::IpResult {
            ip,
            has_agent: !native.user_agent.is_null(),
        })
        .unwrap();
}

extern "C" fn on_policy_result(owner: *mut c_void, arg: *mut c_char) {
    let probe = unsafe { &*(owner as *const Probe) };
    let text = unsafe { CStr::from_ptr(arg) }.to_string_lossy().into_owned();
    unsafe { fwsync_ffi::fwsync_string_free(arg) };
    probe.tx.send(Event::PolicyResult(text)).unwrap();
}

extern "C" fn on_policy_result_retained(owner: *mut c_void, arg: *mut c_char) {
    let probe = unsafe { &*(owner as *const Probe) };
    probe.tx.send(Event::RetainedPolicy(arg as usize)).unwrap();
}

extern "C" fn on_error(owner: *mut c_void, arg: *const c_char) {
    let probe = unsafe { &*(owner as *const Probe) };
    let text = unsafe { CStr::from_ptr(arg) }.to_string_lossy().into_owned();
    probe.tx.send(Event::Error(text)).unwrap();
}

pub fn ip_callback(probe: &Probe) -> IpConfigCallback {
    IpConfigCallback {
        owner: probe as *const Probe as *mut c_void,
        on_result: on_ip_result,
        on_error,
    }
}

pub fn policy_callback(probe: &Probe) -> PolicyCallback {
    PolicyCallback {
        owner: probe as *const Probe as *mut c_void,
        on_result: on_policy_result,
        on_error,
    }
}

pub fn retaining_policy_callback(probe: &Probe) -> PolicyCallback {
    PolicyCallback {
        owner: probe as *const Probe as *mut c_void,
        on_result: on_policy_result_retained,
        on_error,
    }
}

/// Wait for the terminal callback and assert no second one follows
pub fn expect_single_event(rx: &Receiver<Event>) -> Event {
    let event = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("terminal callback never fired");
    assert!(
        rx.recv_timeout(Duration::from_millis(200)).is_err(),
        "a second terminal callback fired"
    );
    event
}
