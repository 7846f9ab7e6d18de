//! Adapters Layer - concrete implementations of the ports
//!
//! - `memory_cache`: RwLock map implementing the behavioral cache
//! - `offline_port`: behavioral port for provider-less environments
//! - `cli`: command-line surface

pub mod memory_cache;
pub mod offline_port;
pub mod cli;

pub use memory_cache::{CacheStats, InMemoryBehavioralCache};
pub use offline_port::OfflineBehavioralPort;
