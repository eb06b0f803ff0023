//! Shared async runtime for the C surface
//!
//! C callers have no executor to offer, so all drivers spawn onto one
//! process-wide multi-threaded runtime, created lazily on first use and
//! kept alive for the life of the process.

use std::sync::OnceLock;

use tokio::runtime::Runtime;

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

pub(crate) fn shared() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("fwsync-worker")
            .build()
            .expect("async runtime construction cannot fail with these settings")
    })
}
