//! IP cache implementations
//!
//! - [`FileIpCache`]: persistent, survives restarts
//! - [`MemoryIpCache`]: volatile, for tests and throwaway deployments

pub mod file;
pub mod memory;

pub use file::FileIpCache;
pub use memory::MemoryIpCache;
