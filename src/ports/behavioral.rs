//! Behavioral Data Port
//!
//! Trait boundary for the expensive upstream behavioral lookups (holder
//! history, liquidity history, wallet age, chain authority checks). The
//! concrete providers live outside this crate; any failure here is
//! treated as missing data by the scoring core, never as a fatal error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Chain;

#[derive(Error, Debug, Clone)]
pub enum BehavioralError {
    #[error("Upstream provider unavailable: {0}")]
    Unavailable(String),

    #[error("Upstream lookup timed out")]
    Timeout,

    #[error("Lookup not supported on chain '{0}'")]
    UnsupportedChain(String),
}

/// 24h holder dynamics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolderSnapshot {
    pub holder_change_24h_pct: f64,
    pub smart_money_holders: u64,
}

/// 24h liquidity dynamics and volume quality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquiditySnapshot {
    pub liquidity_change_24h_pct: f64,
    pub wash_trading_ratio: f64,
}

/// Deployer wallet provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletAgeInfo {
    pub creator_wallet_age_days: f64,
}

/// Live chain authority status; fields stay `None` on chains where the
/// concept does not apply
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuthorityInfo {
    pub mint_authority_active: Option<bool>,
    pub freeze_authority_active: Option<bool>,
    pub policy_locked: Option<bool>,
}

/// A cached behavioral value; one variant per data class so classes
/// never share entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BehavioralValue {
    Holder(HolderSnapshot),
    Liquidity(LiquiditySnapshot),
    WalletAge(WalletAgeInfo),
    Authority(AuthorityInfo),
}

/// Upstream behavioral lookups, one method per data class
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BehavioralDataPort: Send + Sync {
    async fn holder_snapshot(
        &self,
        chain: &Chain,
        address: &str,
    ) -> Result<HolderSnapshot, BehavioralError>;

    async fn liquidity_snapshot(
        &self,
        chain: &Chain,
        address: &str,
    ) -> Result<LiquiditySnapshot, BehavioralError>;

    async fn wallet_age(
        &self,
        chain: &Chain,
        address: &str,
    ) -> Result<WalletAgeInfo, BehavioralError>;

    async fn authority_info(
        &self,
        chain: &Chain,
        address: &str,
    ) -> Result<AuthorityInfo, BehavioralError>;
}
