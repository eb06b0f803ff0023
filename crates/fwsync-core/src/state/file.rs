// # File IP Cache
//
// File-based implementation of IpCache.
//
// ## File Format
//
// The file holds the bare IP in text form, nothing else. A missing file
// means "no IP recorded yet" and is not an error; an unreadable file is.
// Writes go through a temporary file followed by a rename so a crash
// mid-write never leaves a torn cache behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::IpCache;

/// File-based IP cache
///
/// # Example
///
/// ```rust,no_run
/// use fwsync_core::state::FileIpCache;
/// use fwsync_core::traits::IpCache;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let cache = FileIpCache::new("/var/lib/fwsync/last_ip.txt");
///
///     cache.store_ip("203.0.113.7").await?;
///     assert_eq!(cache.last_ip().await?.as_deref(), Some("203.0.113.7"));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileIpCache {
    path: PathBuf,
}

impl FileIpCache {
    /// Create a cache backed by `path`
    ///
    /// The file itself is created lazily on the first `store_ip` call.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl IpCache for FileIpCache {
    async fn last_ip(&self) -> Result<Option<String>, Error> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let ip = contents.trim().to_string();
                if ip.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(ip))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::cache(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn store_ip(&self, ip: &str) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    Error::cache(format!(
                        "Failed to create cache directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        // Atomic write: temp file then rename
        let tmp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&tmp_path).await.map_err(|e| {
            Error::cache(format!("Failed to create {}: {}", tmp_path.display(), e))
        })?;
        file.write_all(ip.trim().as_bytes())
            .await
            .map_err(|e| Error::cache(format!("Failed to write cache: {}", e)))?;
        file.flush()
            .await
            .map_err(|e| Error::cache(format!("Failed to flush cache: {}", e)))?;
        drop(file);

        fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            Error::cache(format!(
                "Failed to move cache into place at {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!("Recorded last applied IP {} in {}", ip.trim(), self.path.display());
        Ok(())
    }
}
