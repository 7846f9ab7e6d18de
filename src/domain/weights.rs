//! Weight Profiles
//!
//! Archetype-aware weighting of the risk factors. Each profile assigns
//! every factor a weight and weights always sum to 100, so the weighted
//! baseline stays on the same 0-100 scale as the sub-scores.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::factors::FactorName;

/// Tolerance for the weight-sum invariant (floating point rounding)
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

#[derive(Error, Debug, Clone)]
pub enum WeightProfileError {
    #[error("Profile '{0}' weights sum to {1}, expected 100")]
    WeightSumMismatch(&'static str, f64),

    #[error("Profile '{0}' has a negative weight for {1}")]
    NegativeWeight(&'static str, &'static str),
}

/// Token archetype selecting which weight profile applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenArchetype {
    Standard,
    Meme,
    Stablecoin,
    Defi,
}

impl std::fmt::Display for TokenArchetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenArchetype::Standard => "standard",
            TokenArchetype::Meme => "meme",
            TokenArchetype::Stablecoin => "stablecoin",
            TokenArchetype::Defi => "defi",
        };
        f.write_str(name)
    }
}

/// Symbols that are always classified as stablecoins
const STABLECOIN_SYMBOLS: &[&str] = &[
    "USDT", "USDC", "DAI", "BUSD", "TUSD", "USDP", "FRAX", "LUSD", "GUSD", "USDD", "PYUSD", "FDUSD",
];

/// Name/symbol fragments typical of meme tokens
const MEME_KEYWORDS: &[&str] = &[
    "doge", "shib", "inu", "pepe", "floki", "elon", "moon", "baby", "wojak", "bonk", "wif", "cat",
];

/// Name fragments typical of DeFi protocol tokens
const DEFI_KEYWORDS: &[&str] = &[
    "swap", "dex", "defi", "finance", "vault", "stake", "yield", "lend", "farm", "protocol",
];

/// Classify a token into an archetype.
///
/// An explicit hint always wins. The heuristic fallback checks
/// stablecoin symbols first, then meme keywords, then DeFi keywords,
/// in that fixed order so classification is deterministic.
pub fn classify_archetype(
    symbol: &str,
    name: &str,
    hint: Option<TokenArchetype>,
) -> TokenArchetype {
    if let Some(archetype) = hint {
        return archetype;
    }

    let symbol_upper = symbol.trim().to_uppercase();
    let haystack = format!("{} {}", symbol, name).to_lowercase();

    if STABLECOIN_SYMBOLS.contains(&symbol_upper.as_str())
        || haystack.contains("usd")
        || haystack.contains("stable")
    {
        return TokenArchetype::Stablecoin;
    }
    if MEME_KEYWORDS.iter().any(|kw| haystack.contains(kw)) {
        return TokenArchetype::Meme;
    }
    if DEFI_KEYWORDS.iter().any(|kw| haystack.contains(kw)) {
        return TokenArchetype::Defi;
    }
    TokenArchetype::Standard
}

/// A fixed mapping of factor -> weight, summing to 100
#[derive(Debug, Clone, Serialize)]
pub struct WeightProfile {
    pub name: &'static str,
    pub contract_control: f64,
    pub holder_concentration: f64,
    pub liquidity_depth: f64,
    pub market_activity: f64,
    pub supply_dilution: f64,
    pub burn_deflation: f64,
    pub token_age: f64,
    pub behavioral_signals: f64,
    pub chain_security: f64,
}

impl WeightProfile {
    /// Balanced default weighting
    pub fn standard() -> Self {
        Self {
            name: "STANDARD",
            contract_control: 20.0,
            holder_concentration: 16.0,
            liquidity_depth: 14.0,
            market_activity: 10.0,
            supply_dilution: 10.0,
            burn_deflation: 5.0,
            token_age: 10.0,
            behavioral_signals: 10.0,
            chain_security: 5.0,
        }
    }

    /// Meme coins: fundamentals matter less, crowd dynamics more
    pub fn meme() -> Self {
        Self {
            name: "MEME",
            contract_control: 18.0,
            holder_concentration: 18.0,
            liquidity_depth: 16.0,
            market_activity: 14.0,
            supply_dilution: 4.0,
            burn_deflation: 4.0,
            token_age: 8.0,
            behavioral_signals: 13.0,
            chain_security: 5.0,
        }
    }

    /// Stablecoins: contract control dominates, trading activity is
    /// nearly irrelevant
    pub fn stablecoin() -> Self {
        Self {
            name: "STABLECOIN",
            contract_control: 28.0,
            holder_concentration: 12.0,
            liquidity_depth: 18.0,
            market_activity: 4.0,
            supply_dilution: 8.0,
            burn_deflation: 2.0,
            token_age: 10.0,
            behavioral_signals: 8.0,
            chain_security: 10.0,
        }
    }

    /// DeFi protocol tokens: dilution/emission schedules weigh more
    pub fn defi() -> Self {
        Self {
            name: "DEFI",
            contract_control: 22.0,
            holder_concentration: 14.0,
            liquidity_depth: 16.0,
            market_activity: 8.0,
            supply_dilution: 12.0,
            burn_deflation: 4.0,
            token_age: 10.0,
            behavioral_signals: 9.0,
            chain_security: 5.0,
        }
    }

    /// Select the profile for an archetype (pure, deterministic)
    pub fn for_archetype(archetype: TokenArchetype) -> Self {
        match archetype {
            TokenArchetype::Standard => Self::standard(),
            TokenArchetype::Meme => Self::meme(),
            TokenArchetype::Stablecoin => Self::stablecoin(),
            TokenArchetype::Defi => Self::defi(),
        }
    }

    /// Weight for a single factor
    pub fn weight(&self, factor: FactorName) -> f64 {
        match factor {
            FactorName::ContractControl => self.contract_control,
            FactorName::HolderConcentration => self.holder_concentration,
            FactorName::LiquidityDepth => self.liquidity_depth,
            FactorName::MarketActivity => self.market_activity,
            FactorName::SupplyDilution => self.supply_dilution,
            FactorName::BurnDeflation => self.burn_deflation,
            FactorName::TokenAge => self.token_age,
            FactorName::BehavioralSignals => self.behavioral_signals,
            FactorName::ChainSecurity => self.chain_security,
        }
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> f64 {
        FactorName::ALL.iter().map(|&f| self.weight(f)).sum()
    }

    /// Enforce the weight-sum and non-negativity invariants
    pub fn validate(&self) -> Result<(), WeightProfileError> {
        for factor in FactorName::ALL {
            if self.weight(factor) < 0.0 {
                return Err(WeightProfileError::NegativeWeight(
                    self.name,
                    factor.as_str(),
                ));
            }
        }
        let total = self.total_weight();
        if (total - 100.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightProfileError::WeightSumMismatch(self.name, total));
        }
        Ok(())
    }
}
