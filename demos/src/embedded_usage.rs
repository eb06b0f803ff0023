//! Driving the C surface from an embedded host
//!
//! This demo plays the role of a C caller: it builds a client handle
//! around in-process stand-ins for the network collaborators, then walks
//! the two drivers and both sides of the string ownership contract. No
//! network traffic is involved.

use std::ffi::{CStr, CString, c_char, c_void};
use std::sync::Arc;
use std::sync::mpsc::{Sender, channel};
use std::time::Duration;

use fwsync_core::rules::FirewallRule;
use fwsync_core::traits::{FirewallProvider, IpResolver};
use fwsync_core::types::IpConfig;
use fwsync_core::{ClientConfig, MemoryIpCache, PolicyEngine, Result};
use fwsync_ffi::{
    FwClient, IpConfigCallback, IpConfigNative, PolicyCallback, fwsync_client_free,
    fwsync_get_ip_config, fwsync_recreate_firewall_policy, fwsync_string_free, fwsync_version,
};

/// Fixed-answer resolver standing in for the geolocation endpoint
struct DemoIpResolver;

#[async_trait::async_trait]
impl IpResolver for DemoIpResolver {
    async fn resolve(&self) -> Result<IpConfig> {
        Ok(IpConfig {
            ip: "203.0.113.7".to_string(),
            country: "United States".to_string(),
            country_iso: "US".to_string(),
            time_zone: "America/Chicago".to_string(),
            ..IpConfig::default()
        })
    }
}

/// Provider standing in for the cloud firewall API
struct DemoProvider;

#[async_trait::async_trait]
impl FirewallProvider for DemoProvider {
    async fn list_rules(&self, instance_id: &str) -> Result<Vec<FirewallRule>> {
        println!("[provider] listing rules on {instance_id}");
        Ok(Vec::new())
    }

    async fn delete_rules(&self, instance_id: &str, rules: &[FirewallRule]) -> Result<()> {
        println!("[provider] deleting {} rule(s) on {instance_id}", rules.len());
        Ok(())
    }

    async fn create_rules(&self, instance_id: &str, rules: &[FirewallRule]) -> Result<()> {
        println!("[provider] creating {} rule(s) on {instance_id}", rules.len());
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "demo"
    }
}

/// Owner context: a channel end the callbacks report through
struct Host {
    done: Sender<()>,
}

extern "C" fn on_ip_result(owner: *mut c_void, arg: *const IpConfigNative) {
    let host = unsafe { &*(owner as *const Host) };
    let native = unsafe { &*arg };
    let ip = unsafe { CStr::from_ptr(native.ip) }.to_string_lossy();
    let country = unsafe { CStr::from_ptr(native.country) }.to_string_lossy();
    println!("[callback] public IP {ip} ({country})");
    host.done.send(()).unwrap();
}

extern "C" fn on_policy_result(owner: *mut c_void, arg: *mut c_char) {
    let host = unsafe { &*(owner as *const Host) };
    // We own this string now; read it, then hand it back.
    let confirmation = unsafe { CStr::from_ptr(arg) }.to_string_lossy().into_owned();
    unsafe { fwsync_string_free(arg) };
    println!("[callback] {confirmation}");
    host.done.send(()).unwrap();
}

extern "C" fn on_error(owner: *mut c_void, arg: *const c_char) {
    let host = unsafe { &*(owner as *const Host) };
    let message = unsafe { CStr::from_ptr(arg) }.to_string_lossy();
    println!("[callback] error: {message}");
    host.done.send(()).unwrap();
}

fn main() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let version = unsafe { CStr::from_ptr(fwsync_version()) };
    println!("fwsync {}", version.to_string_lossy());

    let config = ClientConfig::new(
        "/tmp/fwsync-demo-ip.txt",
        "lhins-3jq1gki4",
        "demo-token-id",
        "demo-token-key",
    );
    let engine = PolicyEngine::new(
        Arc::new(DemoIpResolver),
        Arc::new(DemoProvider),
        Arc::new(MemoryIpCache::new()),
        config,
    )
    .expect("demo configuration is valid");
    let client: *mut FwClient = Box::into_raw(Box::new(FwClient::with_engine(engine)));

    let (done, wait) = channel();
    let host = Host { done };
    let owner = &host as *const Host as *mut c_void;

    println!("\n1. Looking up the public IP...");
    unsafe {
        fwsync_get_ip_config(
            client,
            IpConfigCallback {
                owner,
                on_result: on_ip_result,
                on_error,
            },
        );
    }
    wait.recv_timeout(Duration::from_secs(5)).unwrap();

    let payload = CString::new(
        r#"{
            "FirewallRules": [
                { "Protocol": "TCP", "Port": "443", "Action": "ACCEPT",
                  "FirewallRuleDescription": "vpn-access" }
            ]
        }"#,
    )
    .unwrap();

    println!("\n2. Replacing the firewall policy...");
    unsafe {
        fwsync_recreate_firewall_policy(
            client,
            payload.as_ptr(),
            PolicyCallback {
                owner,
                on_result: on_policy_result,
                on_error,
            },
        );
    }
    wait.recv_timeout(Duration::from_secs(5)).unwrap();

    println!("\n3. Replaying with an unchanged IP...");
    unsafe {
        fwsync_recreate_firewall_policy(
            client,
            payload.as_ptr(),
            PolicyCallback {
                owner,
                on_result: on_policy_result,
                on_error,
            },
        );
    }
    wait.recv_timeout(Duration::from_secs(5)).unwrap();

    unsafe { fwsync_client_free(client) };
    println!("\nDone.");
}
