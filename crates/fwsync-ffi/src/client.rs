//! Opaque client handle behind the C surface

use std::sync::Arc;

use fwsync_core::{ClientConfig, FileIpCache, PolicyEngine, Result};
use fwsync_ip_http::HttpIpResolver;
use fwsync_provider_lighthouse::LighthouseProvider;

/// The handle C callers hold between `fwsync_client_new` and
/// `fwsync_client_free`
///
/// Wraps a [`PolicyEngine`] wired to the production collaborators: HTTP IP
/// resolver, Lighthouse firewall provider, file-backed IP cache.
/// Construction validates configuration but performs no network I/O.
pub struct FwClient {
    engine: PolicyEngine,
}

impl FwClient {
    pub(crate) fn new(config: ClientConfig) -> Result<Self> {
        let resolver = Arc::new(HttpIpResolver::default());
        let provider = Arc::new(LighthouseProvider::new(
            config.token_id.clone(),
            config.token_key.clone(),
        )?);
        let cache = Arc::new(FileIpCache::new(&config.cache_path));
        let engine = PolicyEngine::new(resolver, provider, cache, config)?;
        Ok(Self { engine })
    }

    /// Wrap an already-wired engine
    ///
    /// This is the seam for exercising the C surface against substitute
    /// collaborators; production callers go through `fwsync_client_new`.
    pub fn with_engine(engine: PolicyEngine) -> Self {
        Self { engine }
    }

    pub(crate) fn engine(&self) -> &PolicyEngine {
        &self.engine
    }
}
