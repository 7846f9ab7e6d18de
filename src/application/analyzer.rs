//! Risk Analyzer
//!
//! Application entry point: resolves behavioral data through the
//! read-through cache, then runs the pure scoring pipeline. The cache
//! and behavioral port are injected so tests (and parallel analyses)
//! each get an isolated instance instead of hidden global state.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ScoringConfig;
use crate::domain::{
    aggregate, classify_archetype, evaluate_overrides, factors, BehavioralData, DataQuality,
    FlagValidator, RiskAnalysisResult, TokenArchetype, TokenData, TokenDataError, WeightProfile,
};
use crate::ports::behavioral::{BehavioralDataPort, BehavioralValue};
use crate::ports::cache::{BehavioralStore, CacheKey, DataClass};

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Invalid token data: {0}")]
    InvalidInput(#[from] TokenDataError),
}

/// Behavioral resolution outcome: the assembled data plus the fraction
/// of data classes that resolved (cache hit or fresh fetch)
#[derive(Debug, Default)]
struct ResolvedBehavioral {
    data: BehavioralData,
    resolved_classes: usize,
}

/// Token risk analyzer with injected cache and behavioral port
pub struct RiskAnalyzer {
    config: ScoringConfig,
    cache: Arc<dyn BehavioralStore>,
    port: Arc<dyn BehavioralDataPort>,
}

impl RiskAnalyzer {
    pub fn new(
        config: ScoringConfig,
        cache: Arc<dyn BehavioralStore>,
        port: Arc<dyn BehavioralDataPort>,
    ) -> Self {
        Self {
            config,
            cache,
            port,
        }
    }

    /// Analyze one token: resolve behavioral data, then score.
    ///
    /// Only structurally invalid input errors out; every upstream or
    /// cache failure degrades to missing data and a lower confidence.
    pub async fn analyze(
        &self,
        token: &TokenData,
        hint: Option<TokenArchetype>,
    ) -> Result<RiskAnalysisResult, AnalyzeError> {
        token.validate()?;

        let resolved = self.resolve_behavioral(token).await;
        let freshness = resolved.resolved_classes as f64 / DataClass::ALL.len() as f64;

        let result = score_snapshot(&self.config, token, &resolved.data, freshness, hint)?;
        debug!(
            token = %token.symbol,
            chain = %token.chain,
            score = result.overall_risk_score,
            level = %result.risk_level,
            confidence = result.confidence_score,
            "risk analysis complete"
        );
        Ok(result)
    }

    /// Read-through resolution of all behavioral data classes.
    async fn resolve_behavioral(&self, token: &TokenData) -> ResolvedBehavioral {
        let mut resolved = ResolvedBehavioral::default();

        for class in DataClass::ALL {
            let key = CacheKey::new(token.chain.clone(), &token.address, class);
            match self.lookup(&key) {
                Some(value) => {
                    resolved.resolved_classes += 1;
                    apply_value(&mut resolved.data, value);
                }
                None => match self.fetch(token, class).await {
                    Some(value) => {
                        resolved.resolved_classes += 1;
                        apply_value(&mut resolved.data, value.clone());
                        let ttl = self.config.ttls.ttl_for(class);
                        if let Err(e) = self.cache.set(key, value, ttl) {
                            warn!(error = %e, ?class, "failed to cache behavioral data");
                        }
                    }
                    None => {
                        debug!(?class, token = %token.symbol, "behavioral data unresolved");
                    }
                },
            }
        }

        resolved
    }

    /// Cache lookup; an unreachable backend degrades to a miss.
    fn lookup(&self, key: &CacheKey) -> Option<BehavioralValue> {
        match self.cache.get(key) {
            Ok(hit) => hit,
            Err(e) => {
                warn!(error = %e, "cache backend unavailable, treating as miss");
                None
            }
        }
    }

    /// Fetch one data class from the upstream port; failures become
    /// missing data.
    async fn fetch(&self, token: &TokenData, class: DataClass) -> Option<BehavioralValue> {
        let chain = &token.chain;
        let address = token.address.as_str();
        let result = match class {
            DataClass::HolderHistory => self
                .port
                .holder_snapshot(chain, address)
                .await
                .map(BehavioralValue::Holder),
            DataClass::LiquidityHistory => self
                .port
                .liquidity_snapshot(chain, address)
                .await
                .map(BehavioralValue::Liquidity),
            DataClass::WalletAge => self
                .port
                .wallet_age(chain, address)
                .await
                .map(BehavioralValue::WalletAge),
            DataClass::ChainAuthority => self
                .port
                .authority_info(chain, address)
                .await
                .map(BehavioralValue::Authority),
        };
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(error = %e, ?class, "behavioral lookup failed");
                None
            }
        }
    }
}

/// Merge one cached/fetched value into the assembled behavioral data
fn apply_value(data: &mut BehavioralData, value: BehavioralValue) {
    match value {
        BehavioralValue::Holder(snapshot) => {
            data.holder_change_24h_pct = Some(snapshot.holder_change_24h_pct);
            data.smart_money_holders = Some(snapshot.smart_money_holders);
        }
        BehavioralValue::Liquidity(snapshot) => {
            data.liquidity_change_24h_pct = Some(snapshot.liquidity_change_24h_pct);
            data.wash_trading_ratio = Some(snapshot.wash_trading_ratio);
        }
        BehavioralValue::WalletAge(info) => {
            data.creator_wallet_age_days = Some(info.creator_wallet_age_days);
        }
        BehavioralValue::Authority(info) => {
            data.mint_authority_active = info.mint_authority_active;
            data.freeze_authority_active = info.freeze_authority_active;
            data.policy_locked = info.policy_locked;
        }
    }
}

/// Pure, synchronous scoring over already-resolved inputs.
///
/// Identical inputs always produce an identical result apart from the
/// `analyzed_at` timestamp; this is what the determinism tests call.
pub fn score_snapshot(
    config: &ScoringConfig,
    token: &TokenData,
    behavioral: &BehavioralData,
    data_freshness: f64,
    hint: Option<TokenArchetype>,
) -> Result<RiskAnalysisResult, AnalyzeError> {
    token.validate()?;

    let archetype = classify_archetype(&token.symbol, &token.name, hint);
    let profile = WeightProfile::for_archetype(archetype);

    let mut quality = DataQuality::new();
    let risk_factors = factors::compute_factors(
        token,
        behavioral,
        &profile,
        &config.calibration,
        &mut quality,
    );

    let validator = FlagValidator::new(config.flags.clone());
    let flags = validator.validate(token, behavioral);
    let outcome = evaluate_overrides(&flags, &config.overrides);

    Ok(aggregate(
        token,
        archetype,
        &risk_factors,
        &flags,
        &outcome,
        &quality,
        data_freshness,
        &config.cutoffs,
        &config.confidence,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_cache::InMemoryBehavioralCache;
    use crate::domain::Chain;
    use crate::ports::behavioral::{
        AuthorityInfo, HolderSnapshot, LiquiditySnapshot, MockBehavioralDataPort, WalletAgeInfo,
    };
    use crate::ports::mocks::FailingStore;

    fn token() -> TokenData {
        TokenData {
            chain: Chain::Ethereum,
            address: "0xToken".to_string(),
            symbol: "TKN".to_string(),
            name: "Token".to_string(),
            market_cap: Some(2_000_000.0),
            fdv: Some(2_500_000.0),
            liquidity_usd: Some(300_000.0),
            volume_24h_usd: Some(150_000.0),
            total_supply: Some(1e9),
            circulating_supply: Some(8e8),
            max_supply: Some(1e9),
            burned_supply: Some(0.0),
            holder_count: Some(8_000),
            top10_holder_pct: Some(25.0),
            tx_count_24h: Some(1_200),
            age_days: Some(300.0),
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

    fn full_mock_port() -> MockBehavioralDataPort {
        let mut port = MockBehavioralDataPort::new();
        port.expect_holder_snapshot().times(1).returning(|_, _| {
            Ok(HolderSnapshot {
                holder_change_24h_pct: 5.0,
                smart_money_holders: 4,
            })
        });
        port.expect_liquidity_snapshot().times(1).returning(|_, _| {
            Ok(LiquiditySnapshot {
                liquidity_change_24h_pct: 1.0,
                wash_trading_ratio: 0.05,
            })
        });
        port.expect_wallet_age().times(1).returning(|_, _| {
            Ok(WalletAgeInfo {
                creator_wallet_age_days: 900.0,
            })
        });
        port.expect_authority_info()
            .times(1)
            .returning(|_, _| Ok(AuthorityInfo::default()));
        port
    }

    #[tokio::test]
    async fn test_second_analysis_is_served_from_cache() {
        // Mock expectations of times(1) fail the test if the second
        // analysis hits the upstream port again.
        let analyzer = RiskAnalyzer::new(
            ScoringConfig::default(),
            Arc::new(InMemoryBehavioralCache::new()),
            Arc::new(full_mock_port()),
        );

        let token = token();
        let first = analyzer.analyze(&token, None).await.expect("first");
        let second = analyzer.analyze(&token, None).await.expect("second");

        assert_eq!(first.overall_risk_score, second.overall_risk_score);
        assert_eq!(first.data_freshness, 1.0);
        assert_eq!(second.data_freshness, 1.0);
    }

    #[tokio::test]
    async fn test_cache_outage_degrades_not_fails() {
        let mut port = MockBehavioralDataPort::new();
        // Every analysis refetches because nothing can be cached
        port.expect_holder_snapshot().times(2).returning(|_, _| {
            Ok(HolderSnapshot {
                holder_change_24h_pct: 0.0,
                smart_money_holders: 1,
            })
        });
        port.expect_liquidity_snapshot().times(2).returning(|_, _| {
            Ok(LiquiditySnapshot {
                liquidity_change_24h_pct: 0.0,
                wash_trading_ratio: 0.0,
            })
        });
        port.expect_wallet_age().times(2).returning(|_, _| {
            Ok(WalletAgeInfo {
                creator_wallet_age_days: 400.0,
            })
        });
        port.expect_authority_info()
            .times(2)
            .returning(|_, _| Ok(AuthorityInfo::default()));

        let analyzer = RiskAnalyzer::new(
            ScoringConfig::default(),
            Arc::new(FailingStore),
            Arc::new(port),
        );

        let token = token();
        assert!(analyzer.analyze(&token, None).await.is_ok());
        assert!(analyzer.analyze(&token, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_upstream_failures_lower_freshness_and_confidence() {
        let mut port = MockBehavioralDataPort::new();
        port.expect_holder_snapshot()
            .returning(|_, _| Err(crate::ports::BehavioralError::Timeout));
        port.expect_liquidity_snapshot()
            .returning(|_, _| Err(crate::ports::BehavioralError::Timeout));
        port.expect_wallet_age()
            .returning(|_, _| Err(crate::ports::BehavioralError::Timeout));
        port.expect_authority_info()
            .returning(|_, _| Err(crate::ports::BehavioralError::Timeout));

        let analyzer = RiskAnalyzer::new(
            ScoringConfig::default(),
            Arc::new(InMemoryBehavioralCache::new()),
            Arc::new(port),
        );

        let result = analyzer.analyze(&token(), None).await.expect("analyze");
        assert_eq!(result.data_freshness, 0.0);
        assert!(result.confidence_score < 100);
    }

    #[tokio::test]
    async fn test_invalid_input_is_typed_failure() {
        let mut bad = token();
        bad.market_cap = Some(f64::NAN);

        let analyzer = RiskAnalyzer::new(
            ScoringConfig::default(),
            Arc::new(InMemoryBehavioralCache::new()),
            Arc::new(MockBehavioralDataPort::new()),
        );

        assert!(matches!(
            analyzer.analyze(&bad, None).await,
            Err(AnalyzeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_score_snapshot_is_deterministic() {
        let config = ScoringConfig::default();
        let token = token();
        let behavioral = BehavioralData::default();

        let a = score_snapshot(&config, &token, &behavioral, 0.0, None).expect("a");
        let b = score_snapshot(&config, &token, &behavioral, 0.0, None).expect("b");

        assert_eq!(a.overall_risk_score, b.overall_risk_score);
        assert_eq!(a.risk_level, b.risk_level);
        assert_eq!(a.confidence_score, b.confidence_score);
        assert_eq!(a.breakdown, b.breakdown);
        assert_eq!(a.critical_flags, b.critical_flags);
    }

    #[test]
    fn test_archetype_hint_selects_profile() {
        let config = ScoringConfig::default();
        let token = token();
        let behavioral = BehavioralData::default();

        let standard =
            score_snapshot(&config, &token, &behavioral, 0.0, Some(TokenArchetype::Standard))
                .expect("standard");
        assert_eq!(standard.archetype, TokenArchetype::Standard);

        let meme = score_snapshot(&config, &token, &behavioral, 0.0, Some(TokenArchetype::Meme))
            .expect("meme");
        assert_eq!(meme.archetype, TokenArchetype::Meme);
    }
}
