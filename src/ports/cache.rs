//! Behavioral Cache Port
//!
//! Storage contract for the short-lived behavioral data cache. Each
//! data class has its own TTL and its own entry per token; there is no
//! cross-class invalidation. An in-memory map satisfies this contract;
//! a distributed cache with identical get/set semantics is a valid
//! substitute.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Chain;
use crate::ports::behavioral::BehavioralValue;

#[derive(Error, Debug, Clone)]
pub enum CacheError {
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),
}

/// Class of behavioral data, each with an independent TTL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataClass {
    HolderHistory,
    LiquidityHistory,
    WalletAge,
    ChainAuthority,
}

impl DataClass {
    pub const ALL: [DataClass; 4] = [
        DataClass::HolderHistory,
        DataClass::LiquidityHistory,
        DataClass::WalletAge,
        DataClass::ChainAuthority,
    ];
}

/// Per-class TTL configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheTtls {
    pub holder_history_secs: u64,
    pub liquidity_history_secs: u64,
    pub wallet_age_secs: u64,
    pub chain_authority_secs: u64,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            holder_history_secs: 600,
            liquidity_history_secs: 300,
            wallet_age_secs: 900,
            chain_authority_secs: 900,
        }
    }
}

impl CacheTtls {
    pub fn ttl_for(&self, class: DataClass) -> Duration {
        let secs = match class {
            DataClass::HolderHistory => self.holder_history_secs,
            DataClass::LiquidityHistory => self.liquidity_history_secs,
            DataClass::WalletAge => self.wallet_age_secs,
            DataClass::ChainAuthority => self.chain_authority_secs,
        };
        Duration::from_secs(secs)
    }
}

/// Cache key: (chain, case-normalized address, data class)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub chain: Chain,
    pub address: String,
    pub class: DataClass,
}

impl CacheKey {
    /// Addresses are lowercased so provider casing differences cannot
    /// split one token across multiple entries.
    pub fn new(chain: Chain, address: &str, class: DataClass) -> Self {
        Self {
            chain,
            address: address.trim().to_lowercase(),
            class,
        }
    }
}

/// Storage backend contract. Concurrent gets/sets on the same key must
/// not corrupt state; last-writer-wins on a concurrent set is accepted
/// behavior (idempotent recomputation, not corruption).
pub trait BehavioralStore: Send + Sync {
    /// Look up a value; an expired entry behaves exactly like a miss.
    fn get(&self, key: &CacheKey) -> Result<Option<BehavioralValue>, CacheError>;

    /// Store a value under the key with the given TTL.
    fn set(&self, key: CacheKey, value: BehavioralValue, ttl: Duration) -> Result<(), CacheError>;
}
