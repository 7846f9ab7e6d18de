//! Risk Aggregator
//!
//! Combines weighted factors, validated flags and the override outcome
//! into the final analysis result: a rounded 0-100 score, a monotonic
//! risk level, a confidence score from data completeness and the
//! human-readable flag lists.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::factors::RiskFactor;
use crate::domain::flags::{RiskFlag, Severity};
use crate::domain::normalize::clamp_score;
use crate::domain::overrides::OverrideOutcome;
use crate::domain::token_data::{DataQuality, TokenData};
use crate::domain::weights::TokenArchetype;

/// Categorical risk level derived from the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        };
        f.write_str(name)
    }
}

/// Monotonic, non-overlapping score cutoffs for the risk levels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelCutoffs {
    /// Scores below this are LOW
    pub medium: u8,
    /// Scores below this (and >= medium) are MEDIUM
    pub high: u8,
    /// Scores >= this are CRITICAL; [high, critical) is HIGH
    pub critical: u8,
}

impl Default for LevelCutoffs {
    fn default() -> Self {
        Self {
            medium: 30,
            high: 60,
            critical: 80,
        }
    }
}

impl LevelCutoffs {
    pub fn validate(&self) -> Result<(), AggregatorError> {
        if self.medium < self.high && self.high < self.critical {
            Ok(())
        } else {
            Err(AggregatorError::NonMonotonicCutoffs {
                medium: self.medium,
                high: self.high,
                critical: self.critical,
            })
        }
    }

    /// Deterministic, monotonic score -> level mapping
    pub fn level_for(&self, score: u8) -> RiskLevel {
        if score >= self.critical {
            RiskLevel::Critical
        } else if score >= self.high {
            RiskLevel::High
        } else if score >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum AggregatorError {
    #[error("Level cutoffs must be strictly increasing: {medium} < {high} < {critical}")]
    NonMonotonicCutoffs { medium: u8, high: u8, critical: u8 },
}

/// Confidence scoring calibration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    /// Deduction per missing required field
    pub missing_penalty: u8,
    /// Deduction per estimated field
    pub estimated_penalty: u8,
    /// Confidence never drops below this (never zero: partial data is
    /// degraded, not worthless)
    pub floor: u8,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            missing_penalty: 8,
            estimated_penalty: 4,
            floor: 20,
        }
    }
}

/// How complete the inputs to this analysis were
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataTier {
    Full,
    Partial,
    Minimal,
}

/// Final analysis output, created and consumed within one request
#[derive(Debug, Clone, Serialize)]
pub struct RiskAnalysisResult {
    pub overall_risk_score: u8,
    pub risk_level: RiskLevel,
    pub confidence_score: u8,
    pub archetype: TokenArchetype,
    /// Factor name -> sub-score, ordered for stable serialization
    pub breakdown: BTreeMap<&'static str, u8>,
    pub critical_flags: Vec<String>,
    pub warning_flags: Vec<String>,
    pub positive_signals: Vec<String>,
    pub data_tier: DataTier,
    /// Fraction of behavioral data classes served fresh (0-1)
    pub data_freshness: f64,
    pub analyzed_at: DateTime<Utc>,
}

/// Confidence strictly decreases with each missing/estimated field
/// until it hits the floor.
pub fn confidence_score(quality: &DataQuality, config: &ConfidenceConfig) -> u8 {
    let deduction = quality.missing_count() as u32 * config.missing_penalty as u32
        + quality.estimated_count() as u32 * config.estimated_penalty as u32;
    (100u32.saturating_sub(deduction)).max(config.floor as u32) as u8
}

fn data_tier(quality: &DataQuality) -> DataTier {
    match quality.missing_count() {
        0 => DataTier::Full,
        1..=3 => DataTier::Partial,
        _ => DataTier::Minimal,
    }
}

/// Positive signals surfaced alongside the risk flags
fn positive_signals(token: &TokenData) -> Vec<String> {
    let mut signals = Vec::new();
    if token.owner_renounced {
        signals.push("Contract ownership renounced".to_string());
    }
    if !token.is_mintable && !token.is_honeypot {
        signals.push("Fixed supply: no active mint authority".to_string());
    }
    if let (Some(burned), Some(total)) = (token.burned_supply, token.total_supply) {
        if total > 0.0 && burned / total >= 0.2 {
            signals.push(format!(
                "{:.0}% of supply burned",
                burned / total * 100.0
            ));
        }
    }
    if matches!(token.age_days, Some(age) if age >= 365.0) {
        signals.push("Token has traded for over a year".to_string());
    }
    if matches!(token.top10_holder_pct, Some(pct) if pct <= 25.0) {
        signals.push("Well-distributed holder base".to_string());
    }
    if let (Some(liq), Some(cap)) = (token.liquidity_usd, token.market_cap) {
        if cap > 0.0 && liq / cap >= 0.1 && liq >= 100_000.0 {
            signals.push("Deep liquidity relative to market cap".to_string());
        }
    }
    signals
}

/// Combine factors, flags and the override outcome into the final result.
pub fn aggregate(
    token: &TokenData,
    archetype: TokenArchetype,
    factors: &[RiskFactor],
    flags: &[RiskFlag],
    outcome: &OverrideOutcome,
    quality: &DataQuality,
    data_freshness: f64,
    cutoffs: &LevelCutoffs,
    confidence: &ConfidenceConfig,
) -> RiskAnalysisResult {
    let baseline: f64 = factors.iter().map(|f| f.weighted_score).sum();
    let final_score = clamp_score(outcome.apply(baseline)).round() as u8;

    let breakdown = factors
        .iter()
        .map(|f| (f.name.as_str(), f.score.round() as u8))
        .collect();

    let critical_flags = flags
        .iter()
        .filter(|f| f.severity == Severity::Critical)
        .map(|f| f.message.clone())
        .collect();
    let warning_flags = flags
        .iter()
        .filter(|f| f.severity == Severity::Warning)
        .map(|f| f.message.clone())
        .collect();

    RiskAnalysisResult {
        overall_risk_score: final_score,
        risk_level: cutoffs.level_for(final_score),
        confidence_score: confidence_score(quality, confidence),
        archetype,
        breakdown,
        critical_flags,
        warning_flags,
        positive_signals: positive_signals(token),
        data_tier: data_tier(quality),
        data_freshness: data_freshness.clamp(0.0, 1.0),
        analyzed_at: Utc::now(),
    }
}
