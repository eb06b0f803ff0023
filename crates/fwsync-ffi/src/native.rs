//! C views of the IP configuration snapshot
//!
//! `IpConfigNative` and `UserAgentNative` are the `#[repr(C)]` shapes a C
//! receiver reads. [`OwnedIpConfig`] owns the backing `CString`s; a view is
//! only ever materialized through [`OwnedIpConfig::with_native`], which
//! borrows the owner for the duration of the closure, so every pointer a
//! callback sees is valid exactly as long as the contract says: until the
//! callback returns.

use std::ffi::{CString, c_char, c_float};
use std::ptr;

use fwsync_core::types::{IpConfig, UserAgent};

/// IP configuration snapshot as seen from C
///
/// All string fields are NUL-terminated and transient. `user_agent` is null
/// when the endpoint did not echo one.
#[repr(C)]
pub struct IpConfigNative {
    pub ip: *const c_char,
    pub ip_decimal: u32,
    pub country: *const c_char,
    pub country_iso: *const c_char,
    pub country_eu: u8,
    pub latitude: c_float,
    pub longitude: c_float,
    pub time_zone: *const c_char,
    pub asn: *const c_char,
    pub asn_org: *const c_char,
    pub user_agent: *const UserAgentNative,
}

/// User agent description as seen from C
///
/// `product` may be null; the other fields are always present.
#[repr(C)]
pub struct UserAgentNative {
    pub product: *const c_char,
    pub comment: *const c_char,
    pub version: *const c_char,
    pub raw_value: *const c_char,
}

/// Interior NUL bytes cannot come from a JSON string, but a hostile
/// endpoint is cheap to tolerate: the field degrades to empty.
pub(crate) fn c_string(value: &str) -> CString {
    CString::new(value).unwrap_or_default()
}

/// Rust-owned backing storage for one [`IpConfigNative`] view
pub(crate) struct OwnedIpConfig {
    ip: CString,
    ip_decimal: u32,
    country: CString,
    country_iso: CString,
    country_eu: bool,
    latitude: f32,
    longitude: f32,
    time_zone: CString,
    asn: CString,
    asn_org: CString,
    user_agent: Option<OwnedUserAgent>,
}

struct OwnedUserAgent {
    product: Option<CString>,
    comment: CString,
    version: CString,
    raw_value: CString,
}

impl OwnedUserAgent {
    fn from_agent(agent: &UserAgent) -> Self {
        Self {
            product: agent.product.as_deref().map(c_string),
            comment: c_string(&agent.comment),
            version: c_string(&agent.version),
            raw_value: c_string(&agent.raw_value),
        }
    }

    fn view(&self) -> UserAgentNative {
        UserAgentNative {
            product: self
                .product
                .as_ref()
                .map_or(ptr::null(), |product| product.as_ptr()),
            comment: self.comment.as_ptr(),
            version: self.version.as_ptr(),
            raw_value: self.raw_value.as_ptr(),
        }
    }
}

impl OwnedIpConfig {
    pub(crate) fn from_config(config: &IpConfig) -> Self {
        Self {
            ip: c_string(&config.ip),
            ip_decimal: config.ip_decimal,
            country: c_string(&config.country),
            country_iso: c_string(&config.country_iso),
            country_eu: config.country_eu,
            latitude: config.latitude,
            longitude: config.longitude,
            time_zone: c_string(&config.time_zone),
            asn: c_string(&config.asn),
            asn_org: c_string(&config.asn_org),
            user_agent: config.user_agent.as_ref().map(OwnedUserAgent::from_agent),
        }
    }

    /// Run `f` with a C view of this snapshot
    ///
    /// The view and everything it points into live on this stack frame, so
    /// the pointers die when `f` returns.
    pub(crate) fn with_native<R>(&self, f: impl FnOnce(*const IpConfigNative) -> R) -> R {
        let agent_view = self.user_agent.as_ref().map(OwnedUserAgent::view);
        let view = IpConfigNative {
            ip: self.ip.as_ptr(),
            ip_decimal: self.ip_decimal,
            country: self.country.as_ptr(),
            country_iso: self.country_iso.as_ptr(),
            country_eu: u8::from(self.country_eu),
            latitude: self.latitude,
            longitude: self.longitude,
            time_zone: self.time_zone.as_ptr(),
            asn: self.asn.as_ptr(),
            asn_org: self.asn_org.as_ptr(),
            user_agent: agent_view
                .as_ref()
                .map_or(ptr::null(), |agent| agent as *const UserAgentNative),
        };
        f(&view)
    }
}
