// # fwsync-ffi
//
// C ABI surface of the fwsync firewall policy client.
//
// ## Contract
//
// - A client handle is created with `fwsync_client_new` and retired with
//   `fwsync_client_free`, exactly once each. Null or freed handles are
//   caller contract violations, not recoverable errors.
// - Each driver (`fwsync_get_ip_config`, `fwsync_recreate_firewall_policy`)
//   returns immediately; the work runs on a shared worker runtime and ends
//   in exactly one terminal callback: `on_result` or `on_error`, never
//   both, never neither, never twice.
// - String ownership is explicit per field: the IP snapshot and all error
//   messages are transient (valid only during the callback); the policy
//   confirmation is owned by the receiver and released only through
//   `fwsync_string_free`.
//
// Callbacks are invoked from worker threads, never from the calling
// thread.

mod callback;
mod client;
mod native;
mod runtime;

pub use callback::{IpConfigCallback, PolicyCallback};
pub use client::FwClient;
pub use native::{IpConfigNative, UserAgentNative};

use std::ffi::{CStr, CString, c_char};

use fwsync_core::{ClientConfig, ReplacePolicyRequest};

use crate::native::{OwnedIpConfig, c_string};

/// Copy a required C string argument into owned Rust text
///
/// # Safety
///
/// `ptr` must be a valid NUL-terminated string.
unsafe fn required_str(ptr: *const c_char, what: &str) -> String {
    assert!(!ptr.is_null(), "{what} must not be null");
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

/// Create a client handle.
///
/// Copies the four configuration strings, validates them and wires the
/// engine; no network I/O happens here. Returns null when any field is
/// empty or the provider rejects the credentials.
///
/// # Panics
///
/// Panics if any argument is null.
///
/// # Safety
///
/// All four arguments must be valid NUL-terminated strings. The returned
/// handle must be released with [`fwsync_client_free`] exactly once.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fwsync_client_new(
    cache_path: *const c_char,
    instance_id: *const c_char,
    token_id: *const c_char,
    token_key: *const c_char,
) -> *mut FwClient {
    let config = ClientConfig::new(
        unsafe { required_str(cache_path, "cache_path") },
        unsafe { required_str(instance_id, "instance_id") },
        unsafe { required_str(token_id, "token_id") },
        unsafe { required_str(token_key, "token_key") },
    );

    match FwClient::new(config) {
        Ok(client) => Box::into_raw(Box::new(client)),
        Err(e) => {
            tracing::debug!("Rejected client configuration: {}", e);
            std::ptr::null_mut()
        }
    }
}

/// Release a client handle.
///
/// # Panics
///
/// Panics if `client` is null.
///
/// # Safety
///
/// `client` must come from [`fwsync_client_new`] and must not be used
/// again afterwards. Callbacks still in flight keep their own engine
/// clone, so freeing the handle does not tear work out from under them.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fwsync_client_free(client: *mut FwClient) {
    assert!(!client.is_null(), "client must not be null");
    drop(unsafe { Box::from_raw(client) });
}

/// Resolve the current public IP configuration.
///
/// Returns immediately; on completion exactly one of the callbacks fires
/// from a worker thread. The snapshot passed to `on_result` and the
/// message passed to `on_error` are reclaimed when the callback returns.
///
/// # Panics
///
/// Panics if `client` is null.
///
/// # Safety
///
/// `client` must be a live handle. `callback.owner` must stay valid until
/// the terminal callback has returned.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fwsync_get_ip_config(client: *mut FwClient, callback: IpConfigCallback) {
    assert!(!client.is_null(), "client must not be null");
    let engine = unsafe { &*client }.engine().clone();

    runtime::shared().spawn(async move {
        // Capture the whole descriptor (which is Send), not its raw
        // pointer fields individually.
        let callback = callback;
        match engine.resolve_ip_config().await {
            Ok(ip_config) => {
                let owned = OwnedIpConfig::from_config(&ip_config);
                owned.with_native(|native| (callback.on_result)(callback.owner, native));
            }
            Err(e) => {
                let message = c_string(&format!("failed to get ip config: {e}"));
                (callback.on_error)(callback.owner, message.as_ptr());
            }
        }
    });
}

/// Replace the instance firewall policy with the rule set in `payload`.
///
/// `payload` is a JSON document naming the desired rules; every rule's
/// CIDR block is pinned to the freshly resolved public IP. When the IP has
/// not changed since the last successful replacement the provider is not
/// contacted and `on_result` confirms the unchanged state.
///
/// Returns immediately; exactly one callback fires from a worker thread.
/// A malformed payload is reported through `on_error` like any other
/// failure. The confirmation string passed to `on_result` is owned by the
/// receiver: release it with [`fwsync_string_free`].
///
/// # Panics
///
/// Panics if `client` or `payload` is null.
///
/// # Safety
///
/// `client` must be a live handle and `payload` a valid NUL-terminated
/// string. `callback.owner` must stay valid until the terminal callback
/// has returned.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fwsync_recreate_firewall_policy(
    client: *mut FwClient,
    payload: *const c_char,
    callback: PolicyCallback,
) {
    assert!(!client.is_null(), "client must not be null");
    let payload = unsafe { required_str(payload, "payload") };
    let engine = unsafe { &*client }.engine().clone();

    runtime::shared().spawn(async move {
        // Capture the whole descriptor (which is Send), not its raw
        // pointer fields individually.
        let callback = callback;
        let outcome = match ReplacePolicyRequest::from_json(&payload) {
            Ok(request) => engine.replace_policy(&request).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(outcome) => {
                let confirmation = outcome.confirmation(&engine.config().instance_id);
                // Ownership transfers to the receiver here; the matching
                // release is fwsync_string_free.
                (callback.on_result)(callback.owner, c_string(&confirmation).into_raw());
            }
            Err(e) => {
                let message = c_string(&format!("failed to recreate firewall policy: {e}"));
                (callback.on_error)(callback.owner, message.as_ptr());
            }
        }
    });
}

/// Release a string this library handed over as owned.
///
/// # Panics
///
/// Panics if `s` is null.
///
/// # Safety
///
/// `s` must be a string received through `PolicyCallback::on_result` and
/// must not be used again afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fwsync_string_free(s: *mut c_char) {
    assert!(!s.is_null(), "string must not be null");
    drop(unsafe { CString::from_raw(s) });
}

/// Library version as a static string; the caller never frees it.
#[unsafe(no_mangle)]
pub extern "C" fn fwsync_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}
