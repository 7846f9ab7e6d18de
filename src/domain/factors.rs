//! Factor Calculators
//!
//! Each calculator maps normalization primitives plus raw indicators to
//! one weighted risk factor. A missing required input never errors: the
//! factor degrades to a neutral mid-range score and the degradation is
//! recorded in `DataQuality` so the confidence score reflects it.

use serde::{Deserialize, Serialize};

use crate::domain::normalize;
use crate::domain::token_data::{BehavioralData, Chain, DataQuality, TokenData};
use crate::domain::weights::WeightProfile;

/// Sub-score used when a factor's required input is unavailable
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Identity of each factor in the weighted sum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorName {
    ContractControl,
    HolderConcentration,
    LiquidityDepth,
    MarketActivity,
    SupplyDilution,
    BurnDeflation,
    TokenAge,
    BehavioralSignals,
    ChainSecurity,
}

impl FactorName {
    pub const ALL: [FactorName; 9] = [
        FactorName::ContractControl,
        FactorName::HolderConcentration,
        FactorName::LiquidityDepth,
        FactorName::MarketActivity,
        FactorName::SupplyDilution,
        FactorName::BurnDeflation,
        FactorName::TokenAge,
        FactorName::BehavioralSignals,
        FactorName::ChainSecurity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FactorName::ContractControl => "contract_control",
            FactorName::HolderConcentration => "holder_concentration",
            FactorName::LiquidityDepth => "liquidity_depth",
            FactorName::MarketActivity => "market_activity",
            FactorName::SupplyDilution => "supply_dilution",
            FactorName::BurnDeflation => "burn_deflation",
            FactorName::TokenAge => "token_age",
            FactorName::BehavioralSignals => "behavioral_signals",
            FactorName::ChainSecurity => "chain_security",
        }
    }
}

impl std::fmt::Display for FactorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored factor, alive only for the duration of a single analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: FactorName,
    /// Sub-score in [0, 100]
    pub score: f64,
    /// Weight applied from the selected profile
    pub weight: f64,
    /// score * weight / 100
    pub weighted_score: f64,
}

impl RiskFactor {
    fn new(name: FactorName, score: f64, weight: f64) -> Self {
        let score = normalize::clamp_score(score);
        Self {
            name,
            score,
            weight,
            weighted_score: score * weight / 100.0,
        }
    }
}

/// Calibration thresholds shared by the factor calculators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorCalibration {
    /// Absolute liquidity floor in USD
    pub min_liquidity_usd: f64,
    /// Tokens younger than this get the steep age penalty
    pub young_token_days: f64,
    /// Age past which the age factor keeps diminishing
    pub mature_token_days: f64,
}

impl Default for FactorCalibration {
    fn default() -> Self {
        Self {
            min_liquidity_usd: 10_000.0,
            young_token_days: 7.0,
            mature_token_days: 365.0,
        }
    }
}

/// Compute all weighted factors for one token snapshot.
///
/// The market-cap discount is looked up once and applied to the
/// scale-sensitive factors (concentration, dilution), never compounded.
pub fn compute_factors(
    token: &TokenData,
    behavioral: &BehavioralData,
    profile: &WeightProfile,
    calib: &FactorCalibration,
    quality: &mut DataQuality,
) -> Vec<RiskFactor> {
    let discount = token
        .market_cap
        .or(token.fdv)
        .map(normalize::market_cap_discount)
        .unwrap_or(1.0);

    FactorName::ALL
        .iter()
        .map(|&name| {
            let score = match name {
                FactorName::ContractControl => contract_control_score(token),
                FactorName::HolderConcentration => {
                    holder_concentration_score(token, discount, quality)
                }
                FactorName::LiquidityDepth => liquidity_depth_score(token, calib, quality),
                FactorName::MarketActivity => market_activity_score(token, quality),
                FactorName::SupplyDilution => supply_dilution_score(token, discount, quality),
                FactorName::BurnDeflation => burn_deflation_score(token, quality),
                FactorName::TokenAge => token_age_score(token, calib, quality),
                FactorName::BehavioralSignals => behavioral_score(behavioral, quality),
                FactorName::ChainSecurity => chain_security_score(token, behavioral, quality),
            };
            RiskFactor::new(name, score, profile.weight(name))
        })
        .collect()
}

/// Contract control: authority and tax indicators. Always computable
/// since the indicators are normalized booleans.
pub fn contract_control_score(token: &TokenData) -> f64 {
    let mut score = 0.0;
    if token.is_honeypot {
        score += 95.0;
    }
    if token.is_mintable {
        score += 30.0;
    }
    if !token.owner_renounced {
        score += 25.0;
    }
    if token.freeze_authority_exists {
        score += 20.0;
    }
    if token.lp_in_owner_wallet {
        score += 25.0;
    }
    if let Some(tax) = token.total_tax_pct() {
        if tax > 20.0 {
            score += 25.0;
        } else if tax > 10.0 {
            score += 10.0;
        }
    }
    normalize::clamp_score(score)
}

pub fn holder_concentration_score(
    token: &TokenData,
    discount: f64,
    quality: &mut DataQuality,
) -> f64 {
    let Some(top10) = token.top10_holder_pct else {
        quality.mark_missing("top10_holder_pct");
        return NEUTRAL_SCORE;
    };
    let mut score = normalize::concentration_risk(top10) * discount;
    match token.holder_count {
        Some(count) if count < 50 => score = score.max(80.0),
        Some(count) if count < 200 => score = score.max(60.0),
        Some(_) => {}
        None => quality.mark_estimated("holder_count"),
    }
    normalize::clamp_score(score)
}

pub fn liquidity_depth_score(
    token: &TokenData,
    calib: &FactorCalibration,
    quality: &mut DataQuality,
) -> f64 {
    let Some(liquidity) = token.liquidity_usd else {
        quality.mark_missing("liquidity_usd");
        return NEUTRAL_SCORE;
    };
    let market_cap = match token.market_cap {
        Some(cap) => cap,
        None => match token.fdv {
            Some(fdv) => {
                quality.mark_estimated("market_cap");
                fdv
            }
            None => {
                quality.mark_missing("market_cap");
                return NEUTRAL_SCORE;
            }
        },
    };
    normalize::liquidity_risk(liquidity, market_cap, calib.min_liquidity_usd)
}

pub fn market_activity_score(token: &TokenData, quality: &mut DataQuality) -> f64 {
    let (Some(tx_count), Some(volume)) = (token.tx_count_24h, token.volume_24h_usd) else {
        if token.tx_count_24h.is_none() {
            quality.mark_missing("tx_count_24h");
        }
        if token.volume_24h_usd.is_none() {
            quality.mark_missing("volume_24h_usd");
        }
        return NEUTRAL_SCORE;
    };
    let market_cap = token.market_cap.or(token.fdv).unwrap_or(0.0);
    normalize::activity_risk(tx_count, volume, market_cap)
}

pub fn supply_dilution_score(token: &TokenData, discount: f64, quality: &mut DataQuality) -> f64 {
    match normalize::supply_dilution_risk(
        token.fdv,
        token.market_cap,
        token.max_supply,
        token.circulating_supply,
    ) {
        Some(score) => normalize::clamp_score(score * discount),
        None => {
            quality.mark_missing("supply_metrics");
            NEUTRAL_SCORE
        }
    }
}

pub fn burn_deflation_score(token: &TokenData, quality: &mut DataQuality) -> f64 {
    match (token.burned_supply, token.total_supply) {
        (Some(burned), Some(total)) => normalize::burn_deflation_risk(burned, total),
        _ => {
            quality.mark_missing("burned_supply");
            NEUTRAL_SCORE
        }
    }
}

pub fn token_age_score(
    token: &TokenData,
    calib: &FactorCalibration,
    quality: &mut DataQuality,
) -> f64 {
    let Some(age) = token.age_days else {
        quality.mark_missing("age_days");
        return NEUTRAL_SCORE;
    };
    normalize::age_risk(age, calib.young_token_days, calib.mature_token_days)
}

/// Behavioral factor: holder velocity, wash-trading heuristic,
/// smart-money presence and creator wallet provenance, averaged over
/// whichever signals resolved.
pub fn behavioral_score(behavioral: &BehavioralData, quality: &mut DataQuality) -> f64 {
    let mut components: Vec<f64> = Vec::with_capacity(4);

    if let Some(change) = behavioral.holder_change_24h_pct {
        components.push(if change < -30.0 {
            90.0
        } else if change < -10.0 {
            70.0
        } else if change < 0.0 {
            55.0
        } else if change < 10.0 {
            45.0
        } else {
            30.0
        });
    }

    if let Some(ratio) = behavioral.wash_trading_ratio {
        components.push(if ratio > 0.6 {
            90.0
        } else if ratio > 0.3 {
            70.0
        } else if ratio > 0.1 {
            55.0
        } else {
            35.0
        });
    }

    if let Some(count) = behavioral.smart_money_holders {
        components.push(if count >= 10 {
            20.0
        } else if count >= 3 {
            35.0
        } else if count >= 1 {
            45.0
        } else {
            55.0
        });
    }

    if let Some(age) = behavioral.creator_wallet_age_days {
        components.push(if age < 7.0 {
            85.0
        } else if age < 30.0 {
            65.0
        } else if age < 180.0 {
            45.0
        } else {
            30.0
        });
    }

    if components.is_empty() {
        quality.mark_missing("behavioral_signals");
        return NEUTRAL_SCORE;
    }
    if components.len() < 4 {
        quality.mark_estimated("behavioral_signals");
    }
    normalize::clamp_score(components.iter().sum::<f64>() / components.len() as f64)
}

/// Chain-specific security factor. Live on-chain authority data from
/// the behavioral layer takes precedence over the static snapshot.
pub fn chain_security_score(
    token: &TokenData,
    behavioral: &BehavioralData,
    quality: &mut DataQuality,
) -> f64 {
    match &token.chain {
        Chain::Solana => {
            let mint_active = behavioral.mint_authority_active.unwrap_or(token.is_mintable);
            let freeze_active = behavioral
                .freeze_authority_active
                .unwrap_or(token.freeze_authority_exists);
            if behavioral.mint_authority_active.is_none()
                && behavioral.freeze_authority_active.is_none()
            {
                quality.mark_estimated("solana_authorities");
            }
            let mut score = 10.0;
            if mint_active {
                score += 45.0;
            }
            if freeze_active {
                score += 35.0;
            }
            normalize::clamp_score(score)
        }
        Chain::Cardano => match behavioral.policy_locked.or(token.policy_locked) {
            Some(true) => 10.0,
            Some(false) => 70.0,
            None => {
                quality.mark_missing("policy_locked");
                NEUTRAL_SCORE
            }
        },
        Chain::Ethereum | Chain::Bsc | Chain::Base => {
            let mut score = 10.0;
            let mut known = false;
            if let Some(true) = token.has_proxy {
                score += 30.0;
            }
            if let Some(true) = token.is_pausable {
                score += 25.0;
            }
            known |= token.has_proxy.is_some();
            known |= token.is_pausable.is_some();
            if token.is_mintable {
                score += 25.0;
            }
            if !known {
                quality.mark_estimated("evm_contract_flags");
            }
            normalize::clamp_score(score)
        }
        Chain::Other(_) => {
            quality.mark_estimated("chain_security");
            NEUTRAL_SCORE
        }
    }
}
