//! Token Data Model
//!
//! Normalized input snapshot for one risk analysis. Provider adapters
//! (Mobula, CoinGecko, GoPlus, Helius, Blockfrost) construct this shape
//! upstream; the scoring core never sees raw provider JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural validation errors for token input.
///
/// Missing fields are NOT errors (partial data is the common case and
/// degrades to neutral sub-scores); only structurally invalid values
/// fail fast here so NaN never propagates through the math.
#[derive(Error, Debug, Clone)]
pub enum TokenDataError {
    #[error("Field '{0}' is not a finite number")]
    NonFiniteField(&'static str),

    #[error("Field '{0}' must not be negative, got {1}")]
    NegativeField(&'static str, f64),

    #[error("Field '{0}' must be within 0-100, got {1}")]
    PercentOutOfRange(&'static str, f64),

    #[error("Token address is empty")]
    EmptyAddress,
}

/// Chain the token lives on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Bsc,
    Base,
    Solana,
    Cardano,
    Other(String),
}

impl Chain {
    /// Whether this chain uses EVM-style contract security flags
    pub fn is_evm(&self) -> bool {
        matches!(self, Chain::Ethereum | Chain::Bsc | Chain::Base)
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Chain::Ethereum => write!(f, "ethereum"),
            Chain::Bsc => write!(f, "bsc"),
            Chain::Base => write!(f, "base"),
            Chain::Solana => write!(f, "solana"),
            Chain::Cardano => write!(f, "cardano"),
            Chain::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Immutable market/on-chain snapshot of one token.
///
/// Owned exclusively by the calling request; constructed once per
/// analysis and never mutated afterwards. `Option` fields are ones the
/// free-tier upstream providers routinely omit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenData {
    pub chain: Chain,
    pub address: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,

    // Market metrics (USD)
    pub market_cap: Option<f64>,
    pub fdv: Option<f64>,
    pub liquidity_usd: Option<f64>,
    pub volume_24h_usd: Option<f64>,

    // Supply metrics (token units)
    pub total_supply: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub burned_supply: Option<f64>,

    // Holder / activity metrics
    pub holder_count: Option<u64>,
    pub top10_holder_pct: Option<f64>,
    pub tx_count_24h: Option<u64>,
    pub age_days: Option<f64>,

    // Critical condition indicators (normalized booleans)
    #[serde(default)]
    pub is_honeypot: bool,
    #[serde(default)]
    pub is_mintable: bool,
    #[serde(default)]
    pub owner_renounced: bool,
    #[serde(default)]
    pub freeze_authority_exists: bool,
    #[serde(default)]
    pub lp_in_owner_wallet: bool,

    // Trading taxes (percent)
    pub buy_tax_pct: Option<f64>,
    pub sell_tax_pct: Option<f64>,

    // Chain-specific security flags (None when not applicable / not fetched)
    pub has_proxy: Option<bool>,
    pub is_pausable: Option<bool>,
    pub policy_locked: Option<bool>,
}

impl TokenData {
    /// Validate structural integrity before any scoring math runs.
    pub fn validate(&self) -> Result<(), TokenDataError> {
        if self.address.trim().is_empty() {
            return Err(TokenDataError::EmptyAddress);
        }

        let non_negative: [(&'static str, Option<f64>); 9] = [
            ("market_cap", self.market_cap),
            ("fdv", self.fdv),
            ("liquidity_usd", self.liquidity_usd),
            ("volume_24h_usd", self.volume_24h_usd),
            ("total_supply", self.total_supply),
            ("circulating_supply", self.circulating_supply),
            ("max_supply", self.max_supply),
            ("burned_supply", self.burned_supply),
            ("age_days", self.age_days),
        ];
        for (field, value) in non_negative {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(TokenDataError::NonFiniteField(field));
                }
                if v < 0.0 {
                    return Err(TokenDataError::NegativeField(field, v));
                }
            }
        }

        let percents: [(&'static str, Option<f64>); 3] = [
            ("top10_holder_pct", self.top10_holder_pct),
            ("buy_tax_pct", self.buy_tax_pct),
            ("sell_tax_pct", self.sell_tax_pct),
        ];
        for (field, value) in percents {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(TokenDataError::NonFiniteField(field));
                }
                if !(0.0..=100.0).contains(&v) {
                    return Err(TokenDataError::PercentOutOfRange(field, v));
                }
            }
        }

        Ok(())
    }

    /// Combined round-trip tax, when both sides are known
    pub fn total_tax_pct(&self) -> Option<f64> {
        match (self.buy_tax_pct, self.sell_tax_pct) {
            (Some(b), Some(s)) => Some(b + s),
            _ => None,
        }
    }
}

/// Behavioral signals resolved through the cache/port layer.
///
/// All fields optional: any upstream lookup that failed or timed out is
/// simply absent and the corresponding factor degrades to neutral.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BehavioralData {
    /// 24h change in holder count, percent (negative = holders leaving)
    pub holder_change_24h_pct: Option<f64>,
    /// 24h change in pool liquidity, percent
    pub liquidity_change_24h_pct: Option<f64>,
    /// Age of the creator/deployer wallet in days
    pub creator_wallet_age_days: Option<f64>,
    /// Count of known smart-money wallets among holders
    pub smart_money_holders: Option<u64>,
    /// Estimated fraction of 24h volume that is wash trading (0-1)
    pub wash_trading_ratio: Option<f64>,
    /// Live mint authority status (Solana) resolved on-chain
    pub mint_authority_active: Option<bool>,
    /// Live freeze authority status (Solana) resolved on-chain
    pub freeze_authority_active: Option<bool>,
    /// Minting policy time-lock status (Cardano)
    pub policy_locked: Option<bool>,
}

/// Bookkeeping of which inputs were present, missing or estimated
/// during one analysis. Never mutated after scoring completes; drives
/// the confidence score and data tier only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DataQuality {
    pub missing: Vec<&'static str>,
    pub estimated: Vec<&'static str>,
}

impl DataQuality {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_missing(&mut self, field: &'static str) {
        if !self.missing.contains(&field) {
            self.missing.push(field);
        }
    }

    pub fn mark_estimated(&mut self, field: &'static str) {
        if !self.estimated.contains(&field) {
            self.estimated.push(field);
        }
    }

    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }

    pub fn estimated_count(&self) -> usize {
        self.estimated.len()
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.estimated.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_token() -> TokenData {
        TokenData {
            chain: Chain::Ethereum,
            address: "0xAbC123".to_string(),
            symbol: "TEST".to_string(),
            name: "Test Token".to_string(),
            market_cap: Some(1_000_000.0),
            fdv: Some(1_500_000.0),
            liquidity_usd: Some(50_000.0),
            volume_24h_usd: Some(20_000.0),
            total_supply: Some(1_000_000_000.0),
            circulating_supply: Some(700_000_000.0),
            max_supply: Some(1_000_000_000.0),
            burned_supply: Some(0.0),
            holder_count: Some(5_000),
            top10_holder_pct: Some(35.0),
            tx_count_24h: Some(400),
            age_days: Some(90.0),
            is_honeypot: false,
            is_mintable: false,
            owner_renounced: true,
            freeze_authority_exists: false,
            lp_in_owner_wallet: false,
            buy_tax_pct: Some(0.0),
            sell_tax_pct: Some(0.0),
            has_proxy: Some(false),
            is_pausable: Some(false),
            policy_locked: None,
        }
    }

    #[test]
    fn test_valid_token_passes() {
        assert!(valid_token().validate().is_ok());
    }

    #[test]
    fn test_nan_field_rejected() {
        let mut token = valid_token();
        token.market_cap = Some(f64::NAN);
        assert!(matches!(
            token.validate(),
            Err(TokenDataError::NonFiniteField("market_cap"))
        ));
    }

    #[test]
    fn test_negative_supply_rejected() {
        let mut token = valid_token();
        token.total_supply = Some(-1.0);
        assert!(matches!(
            token.validate(),
            Err(TokenDataError::NegativeField("total_supply", _))
        ));
    }

    #[test]
    fn test_percent_out_of_range_rejected() {
        let mut token = valid_token();
        token.top10_holder_pct = Some(150.0);
        assert!(token.validate().is_err());
    }

    #[test]
    fn test_empty_address_rejected() {
        let mut token = valid_token();
        token.address = "  ".to_string();
        assert!(matches!(token.validate(), Err(TokenDataError::EmptyAddress)));
    }

    #[test]
    fn test_missing_fields_are_not_errors() {
        let mut token = valid_token();
        token.market_cap = None;
        token.holder_count = None;
        token.age_days = None;
        assert!(token.validate().is_ok());
    }

    #[test]
    fn test_data_quality_dedupes_fields() {
        let mut dq = DataQuality::new();
        dq.mark_missing("market_cap");
        dq.mark_missing("market_cap");
        dq.mark_estimated("liquidity_usd");
        assert_eq!(dq.missing_count(), 1);
        assert_eq!(dq.estimated_count(), 1);
        assert!(!dq.is_complete());
    }

    #[test]
    fn test_total_tax_requires_both_sides() {
        let mut token = valid_token();
        token.buy_tax_pct = Some(5.0);
        token.sell_tax_pct = None;
        assert_eq!(token.total_tax_pct(), None);
        token.sell_tax_pct = Some(10.0);
        assert_eq!(token.total_tax_pct(), Some(15.0));
    }
}
