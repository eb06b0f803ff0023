//! Callback descriptors crossing the C boundary
//!
//! Each descriptor packs an opaque `owner` context pointer together with a
//! result and an error function pointer. The function pointers are plain
//! `extern "C" fn` (not `Option<...>`), so a descriptor with a null
//! callback cannot be constructed from safe code and is a caller contract
//! violation from C.
//!
//! Descriptors are passed by value into a driver and moved onto a worker
//! task, so they are `Copy` and declared `Send`; the caller guarantees the
//! `owner` context stays valid and usable from another thread until the
//! terminal callback has returned.

use std::ffi::{c_char, c_void};

use crate::native::IpConfigNative;

/// Receiver of one IP configuration lookup
///
/// Exactly one of the two functions is invoked, exactly once. The
/// `IpConfigNative` tree handed to `on_result` and the message handed to
/// `on_error` are transient: valid only until the callback returns.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct IpConfigCallback {
    /// Opaque caller context, passed back verbatim
    pub owner: *mut c_void,
    pub on_result: extern "C" fn(owner: *mut c_void, arg: *const IpConfigNative),
    pub on_error: extern "C" fn(owner: *mut c_void, arg: *const c_char),
}

// The descriptor itself carries no state beyond pointers the caller has
// promised to keep valid across threads.
unsafe impl Send for IpConfigCallback {}

/// Receiver of one firewall policy replacement
///
/// Exactly one of the two functions is invoked, exactly once. The
/// confirmation string handed to `on_result` is OWNED by the receiver and
/// must be released with [`fwsync_string_free`](crate::fwsync_string_free);
/// the `on_error` message is transient.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct PolicyCallback {
    /// Opaque caller context, passed back verbatim
    pub owner: *mut c_void,
    pub on_result: extern "C" fn(owner: *mut c_void, arg: *mut c_char),
    pub on_error: extern "C" fn(owner: *mut c_void, arg: *const c_char),
}

unsafe impl Send for PolicyCallback {}
