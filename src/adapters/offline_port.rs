//! Offline Behavioral Port
//!
//! Behavioral port for environments with no upstream providers wired
//! in (CLI one-shot analysis, demos). Every lookup reports the backend
//! as unavailable, so the scoring core degrades the behavioral factor
//! to neutral and lowers confidence accordingly.

use async_trait::async_trait;

use crate::domain::Chain;
use crate::ports::behavioral::{
    AuthorityInfo, BehavioralDataPort, BehavioralError, HolderSnapshot, LiquiditySnapshot,
    WalletAgeInfo,
};

#[derive(Debug, Default)]
pub struct OfflineBehavioralPort;

impl OfflineBehavioralPort {
    pub fn new() -> Self {
        Self
    }

    fn offline(chain: &Chain) -> BehavioralError {
        BehavioralError::Unavailable(format!("no behavioral provider configured for {}", chain))
    }
}

#[async_trait]
impl BehavioralDataPort for OfflineBehavioralPort {
    async fn holder_snapshot(
        &self,
        chain: &Chain,
        _address: &str,
    ) -> Result<HolderSnapshot, BehavioralError> {
        Err(Self::offline(chain))
    }

    async fn liquidity_snapshot(
        &self,
        chain: &Chain,
        _address: &str,
    ) -> Result<LiquiditySnapshot, BehavioralError> {
        Err(Self::offline(chain))
    }

    async fn wallet_age(
        &self,
        chain: &Chain,
        _address: &str,
    ) -> Result<WalletAgeInfo, BehavioralError> {
        Err(Self::offline(chain))
    }

    async fn authority_info(
        &self,
        chain: &Chain,
        _address: &str,
    ) -> Result<AuthorityInfo, BehavioralError> {
        Err(Self::offline(chain))
    }
}
