//! Hand-rolled test doubles for the ports layer
//!
//! Always compiled (not `#[cfg(test)]`) so integration tests under
//! `tests/` can use them too. `StaticBehavioralPort` serves fixed
//! snapshots; `FailingStore` simulates an unreachable cache backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::Chain;
use crate::ports::behavioral::{
    AuthorityInfo, BehavioralDataPort, BehavioralError, BehavioralValue, HolderSnapshot,
    LiquiditySnapshot, WalletAgeInfo,
};
use crate::ports::cache::{BehavioralStore, CacheError, CacheKey};

/// Behavioral port that returns pre-configured snapshots and counts
/// calls, for asserting read-through cache behavior.
#[derive(Debug, Default)]
pub struct StaticBehavioralPort {
    pub holder: Option<HolderSnapshot>,
    pub liquidity: Option<LiquiditySnapshot>,
    pub wallet_age: Option<WalletAgeInfo>,
    pub authority: Option<AuthorityInfo>,
    calls: AtomicUsize,
}

impl StaticBehavioralPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_holder(mut self, snapshot: HolderSnapshot) -> Self {
        self.holder = Some(snapshot);
        self
    }

    pub fn with_liquidity(mut self, snapshot: LiquiditySnapshot) -> Self {
        self.liquidity = Some(snapshot);
        self
    }

    pub fn with_wallet_age(mut self, info: WalletAgeInfo) -> Self {
        self.wallet_age = Some(info);
        self
    }

    pub fn with_authority(mut self, info: AuthorityInfo) -> Self {
        self.authority = Some(info);
        self
    }

    /// Total upstream calls made across all data classes
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn serve<T: Clone>(&self, value: &Option<T>) -> Result<T, BehavioralError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        value
            .clone()
            .ok_or_else(|| BehavioralError::Unavailable("no fixture configured".to_string()))
    }
}

#[async_trait]
impl BehavioralDataPort for StaticBehavioralPort {
    async fn holder_snapshot(
        &self,
        _chain: &Chain,
        _address: &str,
    ) -> Result<HolderSnapshot, BehavioralError> {
        self.serve(&self.holder)
    }

    async fn liquidity_snapshot(
        &self,
        _chain: &Chain,
        _address: &str,
    ) -> Result<LiquiditySnapshot, BehavioralError> {
        self.serve(&self.liquidity)
    }

    async fn wallet_age(
        &self,
        _chain: &Chain,
        _address: &str,
    ) -> Result<WalletAgeInfo, BehavioralError> {
        self.serve(&self.wallet_age)
    }

    async fn authority_info(
        &self,
        _chain: &Chain,
        _address: &str,
    ) -> Result<AuthorityInfo, BehavioralError> {
        self.serve(&self.authority)
    }
}

/// Cache store whose every operation fails, simulating an unreachable
/// backend. The analyzer must degrade to all-miss, never error out.
#[derive(Debug, Default)]
pub struct FailingStore;

impl BehavioralStore for FailingStore {
    fn get(&self, _key: &CacheKey) -> Result<Option<BehavioralValue>, CacheError> {
        Err(CacheError::Unavailable("simulated outage".to_string()))
    }

    fn set(
        &self,
        _key: CacheKey,
        _value: BehavioralValue,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("simulated outage".to_string()))
    }
}
