// # Memory IP Cache
//
// In-memory implementation of IpCache.
//
// All state is lost on restart, so the first replacement after a restart
// always goes through to the provider. Useful for tests and containerized
// deployments where that is acceptable.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::IpCache;

/// In-memory IP cache implementation
#[derive(Debug, Clone, Default)]
pub struct MemoryIpCache {
    inner: Arc<RwLock<Option<String>>>,
}

impl MemoryIpCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache pre-seeded with an IP
    pub fn with_ip(ip: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(ip.into()))),
        }
    }
}

#[async_trait]
impl IpCache for MemoryIpCache {
    async fn last_ip(&self) -> Result<Option<String>, Error> {
        Ok(self.inner.read().await.clone())
    }

    async fn store_ip(&self, ip: &str) -> Result<(), Error> {
        *self.inner.write().await = Some(ip.trim().to_string());
        Ok(())
    }
}
