//! Ports Layer - Trait definitions for external dependencies
//!
//! Following hexagonal architecture, these traits abstract:
//! - Behavioral data lookups (holder/liquidity history, wallet age,
//!   chain authority checks)
//! - The TTL cache backend in front of them

pub mod behavioral;
pub mod cache;
pub mod mocks;

pub use behavioral::{
    AuthorityInfo, BehavioralDataPort, BehavioralError, BehavioralValue, HolderSnapshot,
    LiquiditySnapshot, WalletAgeInfo,
};
pub use cache::{BehavioralStore, CacheError, CacheKey, CacheTtls, DataClass};
