//! Flag Validator
//!
//! Converts raw boolean/text security signals into context-validated
//! risk flags. Context (token age, market cap tier, chain) can only
//! DOWNGRADE a flag below its baseline hint, never escalate it: a noisy
//! single signal can be relaxed to a warning, but nothing in this layer
//! can invent a critical out of a warning.

use serde::{Deserialize, Serialize};

use crate::domain::token_data::{BehavioralData, Chain, TokenData};

/// Validated severity of a risk flag, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Stable identity of each raw signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagCode {
    Honeypot,
    MintAuthority,
    FreezeAuthority,
    OwnerNotRenounced,
    LpInOwnerWallet,
    HighConcentration,
    LowHolderCount,
    LowLiquidity,
    HighSellTax,
    ProxyContract,
    PausableContract,
    PolicyUnlocked,
    WashTrading,
}

/// One validated flag, scoped to a single analysis
#[derive(Debug, Clone, Serialize)]
pub struct RiskFlag {
    pub code: FlagCode,
    /// Baseline severity before context was applied
    pub raw_hint: Severity,
    /// Severity after context validation; never above `raw_hint`
    pub severity: Severity,
    pub message: String,
    /// Why context changed (or upheld) the severity, when it did
    pub context: Option<String>,
}

impl RiskFlag {
    /// Build a flag, clamping severity to the raw hint so escalation
    /// beyond the baseline is impossible by construction.
    fn new(code: FlagCode, raw_hint: Severity, severity: Severity, message: String) -> Self {
        Self {
            code,
            raw_hint,
            severity: severity.min(raw_hint),
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// Thresholds controlling flag emission and context downgrades
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagValidatorConfig {
    /// Tokens younger than this get new-token allowances
    pub young_token_days: f64,
    /// Market cap above which concentration/authority flags relax
    pub large_cap_usd: f64,
    /// Top-10 percentage that triggers the concentration flag
    pub concentration_threshold_pct: f64,
    /// Holder count below which the low-holder flag fires
    pub min_holder_count: u64,
    /// Liquidity below which the low-liquidity flag fires
    pub min_liquidity_usd: f64,
    /// Sell tax that is merely suspicious
    pub sell_tax_warning_pct: f64,
    /// Sell tax that is effectively an exit scam
    pub sell_tax_critical_pct: f64,
    /// Wash-trading ratio that fires the wash flag
    pub wash_trading_threshold: f64,
}

impl Default for FlagValidatorConfig {
    fn default() -> Self {
        Self {
            young_token_days: 7.0,
            large_cap_usd: 1_000_000_000.0,
            concentration_threshold_pct: 70.0,
            min_holder_count: 100,
            min_liquidity_usd: 10_000.0,
            sell_tax_warning_pct: 10.0,
            sell_tax_critical_pct: 30.0,
            wash_trading_threshold: 0.4,
        }
    }
}

/// Context-aware validator turning raw signals into ordered flags
#[derive(Debug, Clone, Default)]
pub struct FlagValidator {
    config: FlagValidatorConfig,
}

impl FlagValidator {
    pub fn new(config: FlagValidatorConfig) -> Self {
        Self { config }
    }

    /// Run every rule and return flags sorted by descending severity.
    /// The sort is stable, so same-severity flags keep rule order.
    pub fn validate(&self, token: &TokenData, behavioral: &BehavioralData) -> Vec<RiskFlag> {
        let mut flags: Vec<RiskFlag> = [
            self.check_honeypot(token),
            self.check_mint_authority(token),
            self.check_freeze_authority(token),
            self.check_owner_renounced(token),
            self.check_lp_location(token),
            self.check_concentration(token),
            self.check_holder_count(token),
            self.check_liquidity(token),
            self.check_sell_tax(token),
            self.check_proxy(token),
            self.check_pausable(token),
            self.check_policy_lock(token, behavioral),
            self.check_wash_trading(behavioral),
        ]
        .into_iter()
        .flatten()
        .collect();

        flags.sort_by_key(|f| std::cmp::Reverse(f.severity));
        flags
    }

    fn is_young(&self, token: &TokenData) -> bool {
        token
            .age_days
            .map(|age| age < self.config.young_token_days)
            .unwrap_or(false)
    }

    fn is_large_cap(&self, token: &TokenData) -> bool {
        token
            .market_cap
            .map(|cap| cap >= self.config.large_cap_usd)
            .unwrap_or(false)
    }

    /// Honeypot is never relaxed by context
    pub fn check_honeypot(&self, token: &TokenData) -> Option<RiskFlag> {
        token.is_honeypot.then(|| {
            RiskFlag::new(
                FlagCode::Honeypot,
                Severity::Critical,
                Severity::Critical,
                "Honeypot detected: selling is blocked or heavily restricted".to_string(),
            )
        })
    }

    pub fn check_mint_authority(&self, token: &TokenData) -> Option<RiskFlag> {
        if !token.is_mintable {
            return None;
        }
        let hint = Severity::Critical;
        if self.is_large_cap(token) {
            // Centralized large-cap issuers mint by design
            return Some(
                RiskFlag::new(
                    FlagCode::MintAuthority,
                    hint,
                    Severity::Warning,
                    "Supply can be expanded by the issuer".to_string(),
                )
                .with_context("large-cap issuer; minting is expected"),
            );
        }
        Some(RiskFlag::new(
            FlagCode::MintAuthority,
            hint,
            Severity::Critical,
            "Mint authority active: supply can be inflated at will".to_string(),
        ))
    }

    pub fn check_freeze_authority(&self, token: &TokenData) -> Option<RiskFlag> {
        if !token.freeze_authority_exists {
            return None;
        }
        let hint = Severity::Warning;
        if self.is_large_cap(token) {
            return Some(
                RiskFlag::new(
                    FlagCode::FreezeAuthority,
                    hint,
                    Severity::Info,
                    "Freeze authority retained by issuer".to_string(),
                )
                .with_context("large-cap compliance freeze is common"),
            );
        }
        Some(RiskFlag::new(
            FlagCode::FreezeAuthority,
            hint,
            Severity::Warning,
            "Freeze authority active: holder accounts can be frozen".to_string(),
        ))
    }

    pub fn check_owner_renounced(&self, token: &TokenData) -> Option<RiskFlag> {
        (!token.owner_renounced).then(|| {
            RiskFlag::new(
                FlagCode::OwnerNotRenounced,
                Severity::Warning,
                Severity::Warning,
                "Contract ownership has not been renounced".to_string(),
            )
        })
    }

    pub fn check_lp_location(&self, token: &TokenData) -> Option<RiskFlag> {
        if !token.lp_in_owner_wallet {
            return None;
        }
        let hint = Severity::Critical;
        if self.is_large_cap(token) {
            return Some(
                RiskFlag::new(
                    FlagCode::LpInOwnerWallet,
                    hint,
                    Severity::Warning,
                    "Liquidity held in a deployer-controlled wallet".to_string(),
                )
                .with_context("large-cap treasury custody"),
            );
        }
        Some(RiskFlag::new(
            FlagCode::LpInOwnerWallet,
            hint,
            Severity::Critical,
            "LP tokens sit in the owner wallet: liquidity can be pulled".to_string(),
        ))
    }

    pub fn check_concentration(&self, token: &TokenData) -> Option<RiskFlag> {
        let top10 = token.top10_holder_pct?;
        if top10 <= self.config.concentration_threshold_pct {
            return None;
        }
        let hint = Severity::Critical;
        let message = format!("Top 10 holders control {:.1}% of supply", top10);
        if self.is_young(token) {
            // Fresh launches are concentrated before distribution happens
            return Some(
                RiskFlag::new(FlagCode::HighConcentration, hint, Severity::Warning, message)
                    .with_context("token younger than a week; distribution still in progress"),
            );
        }
        if self.is_large_cap(token) {
            // Exchange and custody wallets dominate large-cap top-10 lists
            return Some(
                RiskFlag::new(FlagCode::HighConcentration, hint, Severity::Warning, message)
                    .with_context("large-cap top holders are typically custodial"),
            );
        }
        Some(RiskFlag::new(
            FlagCode::HighConcentration,
            hint,
            Severity::Critical,
            message,
        ))
    }

    pub fn check_holder_count(&self, token: &TokenData) -> Option<RiskFlag> {
        let count = token.holder_count?;
        if count >= self.config.min_holder_count {
            return None;
        }
        let hint = Severity::Critical;
        let message = format!("Only {} holders", count);
        if self.is_young(token) {
            // New tokens naturally have few holders
            return Some(
                RiskFlag::new(FlagCode::LowHolderCount, hint, Severity::Warning, message)
                    .with_context("new token; holder base still forming"),
            );
        }
        Some(RiskFlag::new(
            FlagCode::LowHolderCount,
            hint,
            Severity::Critical,
            message,
        ))
    }

    pub fn check_liquidity(&self, token: &TokenData) -> Option<RiskFlag> {
        let liquidity = token.liquidity_usd?;
        if liquidity >= self.config.min_liquidity_usd {
            return None;
        }
        let hint = Severity::Critical;
        let message = format!("Liquidity is only ${:.0}", liquidity);
        if self.is_large_cap(token) {
            // A large cap with near-zero reported liquidity is a data
            // gap from the aggregator, not a thin market
            return Some(
                RiskFlag::new(FlagCode::LowLiquidity, hint, Severity::Warning, message)
                    .with_context("liquidity figure inconsistent with market cap; likely partial data"),
            );
        }
        Some(RiskFlag::new(
            FlagCode::LowLiquidity,
            hint,
            Severity::Critical,
            message,
        ))
    }

    pub fn check_sell_tax(&self, token: &TokenData) -> Option<RiskFlag> {
        let tax = token.sell_tax_pct?;
        if tax >= self.config.sell_tax_critical_pct {
            return Some(RiskFlag::new(
                FlagCode::HighSellTax,
                Severity::Critical,
                Severity::Critical,
                format!("Sell tax of {:.1}% makes exits punitive", tax),
            ));
        }
        if tax >= self.config.sell_tax_warning_pct {
            return Some(RiskFlag::new(
                FlagCode::HighSellTax,
                Severity::Warning,
                Severity::Warning,
                format!("Elevated sell tax of {:.1}%", tax),
            ));
        }
        None
    }

    pub fn check_proxy(&self, token: &TokenData) -> Option<RiskFlag> {
        if !token.chain.is_evm() {
            return None;
        }
        matches!(token.has_proxy, Some(true)).then(|| {
            RiskFlag::new(
                FlagCode::ProxyContract,
                Severity::Warning,
                Severity::Warning,
                "Upgradeable proxy: contract logic can change after audit".to_string(),
            )
        })
    }

    pub fn check_pausable(&self, token: &TokenData) -> Option<RiskFlag> {
        if !token.chain.is_evm() {
            return None;
        }
        matches!(token.is_pausable, Some(true)).then(|| {
            RiskFlag::new(
                FlagCode::PausableContract,
                Severity::Warning,
                Severity::Warning,
                "Transfers can be paused by the contract owner".to_string(),
            )
        })
    }

    pub fn check_policy_lock(
        &self,
        token: &TokenData,
        behavioral: &BehavioralData,
    ) -> Option<RiskFlag> {
        if token.chain != Chain::Cardano {
            return None;
        }
        let locked = behavioral.policy_locked.or(token.policy_locked)?;
        (!locked).then(|| {
            RiskFlag::new(
                FlagCode::PolicyUnlocked,
                Severity::Critical,
                Severity::Critical,
                "Minting policy is not time-locked: supply can still grow".to_string(),
            )
        })
    }

    pub fn check_wash_trading(&self, behavioral: &BehavioralData) -> Option<RiskFlag> {
        let ratio = behavioral.wash_trading_ratio?;
        if ratio < self.config.wash_trading_threshold {
            return None;
        }
        Some(RiskFlag::new(
            FlagCode::WashTrading,
            Severity::Warning,
            Severity::Warning,
            format!("An estimated {:.0}% of volume looks wash-traded", ratio * 100.0),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_token(chain: Chain) -> TokenData {
        TokenData {
            chain,
            address: "addr".to_string(),
            symbol: "TKN".to_string(),
            name: "Token".to_string(),
            market_cap: Some(500_000.0),
            fdv: None,
            liquidity_usd: Some(50_000.0),
            volume_24h_usd: Some(10_000.0),
            total_supply: None,
            circulating_supply: None,
            max_supply: None,
            burned_supply: None,
            holder_count: Some(5_000),
            top10_holder_pct: Some(30.0),
            tx_count_24h: Some(100),
            age_days: Some(400.0),
            is_honeypot: false,
            is_mintable: false,
            owner_renounced: true,
            freeze_authority_exists: false,
            lp_in_owner_wallet: false,
            buy_tax_pct: None,
            sell_tax_pct: None,
            has_proxy: None,
            is_pausable: None,
            policy_locked: None,
        }
    }

    #[test]
    fn test_clean_token_yields_no_flags() {
        let validator = FlagValidator::default();
        let flags = validator.validate(&bare_token(Chain::Ethereum), &BehavioralData::default());
        assert!(flags.is_empty());
    }

    #[test]
    fn test_honeypot_is_always_critical() {
        let validator = FlagValidator::default();
        let mut token = bare_token(Chain::Ethereum);
        token.is_honeypot = true;
        token.age_days = Some(1.0);
        token.market_cap = Some(5_000_000_000.0);

        let flag = validator.check_honeypot(&token).unwrap();
        assert_eq!(flag.severity, Severity::Critical);
    }

    #[test]
    fn test_young_token_concentration_downgraded() {
        let validator = FlagValidator::default();
        let mut young = bare_token(Chain::Ethereum);
        young.top10_holder_pct = Some(85.0);
        young.age_days = Some(2.0);

        let mut old = young.clone();
        old.age_days = Some(400.0);

        let young_flag = validator.check_concentration(&young).unwrap();
        let old_flag = validator.check_concentration(&old).unwrap();

        assert_eq!(young_flag.severity, Severity::Warning);
        assert_eq!(old_flag.severity, Severity::Critical);
        assert!(young_flag.severity <= old_flag.severity);
    }

    #[test]
    fn test_context_never_escalates_above_hint() {
        let validator = FlagValidator::default();
        let mut token = bare_token(Chain::Ethereum);
        token.is_honeypot = true;
        token.is_mintable = true;
        token.owner_renounced = false;
        token.freeze_authority_exists = true;
        token.lp_in_owner_wallet = true;
        token.top10_holder_pct = Some(95.0);
        token.holder_count = Some(10);
        token.liquidity_usd = Some(100.0);
        token.sell_tax_pct = Some(50.0);
        token.has_proxy = Some(true);
        token.is_pausable = Some(true);

        for flag in validator.validate(&token, &BehavioralData::default()) {
            assert!(
                flag.severity <= flag.raw_hint,
                "{:?} escalated above its hint",
                flag.code
            );
        }
    }

    #[test]
    fn test_low_holder_count_relaxed_for_new_token() {
        let validator = FlagValidator::default();
        let mut token = bare_token(Chain::Solana);
        token.holder_count = Some(40);
        token.age_days = Some(3.0);
        let flag = validator.check_holder_count(&token).unwrap();
        assert_eq!(flag.severity, Severity::Warning);
        assert!(flag.context.is_some());
    }

    #[test]
    fn test_large_cap_mint_authority_relaxed() {
        let validator = FlagValidator::default();
        let mut token = bare_token(Chain::Ethereum);
        token.is_mintable = true;
        token.market_cap = Some(50_000_000_000.0);
        let flag = validator.check_mint_authority(&token).unwrap();
        assert_eq!(flag.severity, Severity::Warning);
    }

    #[test]
    fn test_flags_sorted_by_descending_severity() {
        let validator = FlagValidator::default();
        let mut token = bare_token(Chain::Ethereum);
        token.is_honeypot = true;
        token.owner_renounced = false;
        token.has_proxy = Some(true);
        token.liquidity_usd = Some(500.0);

        let flags = validator.validate(&token, &BehavioralData::default());
        assert!(flags.len() >= 3);
        for pair in flags.windows(2) {
            assert!(pair[0].severity >= pair[1].severity);
        }
        assert_eq!(flags[0].code, FlagCode::Honeypot);
    }

    #[test]
    fn test_stable_order_for_equal_severity() {
        let validator = FlagValidator::default();
        let mut token = bare_token(Chain::Ethereum);
        token.owner_renounced = false;
        token.has_proxy = Some(true);
        token.is_pausable = Some(true);

        let flags = validator.validate(&token, &BehavioralData::default());
        let codes: Vec<FlagCode> = flags.iter().map(|f| f.code).collect();
        // All warnings, so rule order is preserved by the stable sort
        assert_eq!(
            codes,
            vec![
                FlagCode::OwnerNotRenounced,
                FlagCode::ProxyContract,
                FlagCode::PausableContract
            ]
        );
    }

    #[test]
    fn test_cardano_unlocked_policy_flagged() {
        let validator = FlagValidator::default();
        let mut token = bare_token(Chain::Cardano);
        token.policy_locked = Some(false);
        let flag = validator
            .check_policy_lock(&token, &BehavioralData::default())
            .unwrap();
        assert_eq!(flag.severity, Severity::Critical);
    }

    #[test]
    fn test_wash_trading_flag_from_behavioral() {
        let validator = FlagValidator::default();
        let behavioral = BehavioralData {
            wash_trading_ratio: Some(0.65),
            ..Default::default()
        };
        let flag = validator.check_wash_trading(&behavioral).unwrap();
        assert_eq!(flag.severity, Severity::Warning);
    }
}
