//! Configuration types for the fwsync system

use serde::{Deserialize, Serialize};

/// Per-client configuration captured at handle creation time
///
/// All fields are immutable for the lifetime of the client. Construction
/// performs no network I/O; it only validates and captures configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Path of the local file remembering the last applied public IP
    pub cache_path: String,

    /// Compute instance identifier (provider-defined format, e.g.
    /// "lhins-3jq1gki4"; treated as an opaque token here)
    pub instance_id: String,

    /// Credential token id
    pub token_id: String,

    /// Credential token key
    /// ⚠️ NEVER log this value
    pub token_key: String,
}

// Custom Debug implementation that hides the credential pair
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("cache_path", &self.cache_path)
            .field("instance_id", &self.instance_id)
            .field("token_id", &"<REDACTED>")
            .field("token_key", &"<REDACTED>")
            .finish()
    }
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(
        cache_path: impl Into<String>,
        instance_id: impl Into<String>,
        token_id: impl Into<String>,
        token_key: impl Into<String>,
    ) -> Self {
        Self {
            cache_path: cache_path.into(),
            instance_id: instance_id.into(),
            token_id: token_id.into(),
            token_key: token_key.into(),
        }
    }

    /// Validate the configuration
    ///
    /// Every field must be a non-empty textual identifier.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.cache_path.is_empty() {
            return Err(crate::Error::config("Cache file path cannot be empty"));
        }
        if self.instance_id.is_empty() {
            return Err(crate::Error::config("Instance id cannot be empty"));
        }
        if self.token_id.is_empty() {
            return Err(crate::Error::config("Token id cannot be empty"));
        }
        if self.token_key.is_empty() {
            return Err(crate::Error::config("Token key cannot be empty"));
        }
        Ok(())
    }
}
