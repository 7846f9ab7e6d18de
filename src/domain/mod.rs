//! Domain Layer - Core scoring logic for the TokenSentry risk engine
//!
//! Pure domain types and math with no I/O. All external interactions
//! (behavioral lookups, caching) happen through the ports layer.
//!
//! Scoring pipeline:
//! - `normalize`: calibrated 0-100 risk curves per raw metric
//! - `factors`: weighted factor calculators with graceful degradation
//! - `weights`: archetype weight profiles (STANDARD/MEME/STABLECOIN/DEFI)
//! - `flags`: context-validated security flags
//! - `overrides`: graduated penalty / floor override engine
//! - `aggregator`: final score, level, confidence and result assembly

pub mod token_data;
pub mod normalize;
pub mod factors;
pub mod weights;
pub mod flags;
pub mod overrides;
pub mod aggregator;

pub use token_data::{BehavioralData, Chain, DataQuality, TokenData, TokenDataError};
pub use factors::{FactorCalibration, FactorName, RiskFactor, NEUTRAL_SCORE};
pub use weights::{classify_archetype, TokenArchetype, WeightProfile, WeightProfileError};
pub use flags::{FlagCode, FlagValidator, FlagValidatorConfig, RiskFlag, Severity};
pub use overrides::{evaluate as evaluate_overrides, OverrideConfig, OverrideOutcome};
pub use aggregator::{
    aggregate, confidence_score, AggregatorError, ConfidenceConfig, DataTier, LevelCutoffs,
    RiskAnalysisResult, RiskLevel,
};
