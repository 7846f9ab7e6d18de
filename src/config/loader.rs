//! Calibration Loader
//!
//! Loads and validates scoring calibration from TOML files matching
//! config/default.toml structure. Every section is optional: omitted
//! sections fall back to the built-in defaults, so an empty file is a
//! valid configuration.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::aggregator::{ConfidenceConfig, LevelCutoffs};
use crate::domain::factors::FactorCalibration;
use crate::domain::flags::FlagValidatorConfig;
use crate::domain::overrides::OverrideConfig;
use crate::domain::weights::{TokenArchetype, WeightProfile};
use crate::ports::cache::CacheTtls;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// On-disk configuration structure matching config/default.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub levels: LevelsSection,
    #[serde(default)]
    pub overrides: OverridesSection,
    #[serde(default)]
    pub confidence: ConfidenceSection,
    #[serde(default)]
    pub calibration: CalibrationSection,
    #[serde(default)]
    pub flags: FlagsSection,
    #[serde(default)]
    pub cache: CacheSection,
}

/// Risk level cutoffs section
#[derive(Debug, Clone, Deserialize)]
pub struct LevelsSection {
    /// Scores below this are LOW
    pub medium: u8,
    /// Scores below this are MEDIUM
    pub high: u8,
    /// Scores at or above this are CRITICAL
    pub critical: u8,
}

impl Default for LevelsSection {
    fn default() -> Self {
        let cutoffs = LevelCutoffs::default();
        Self {
            medium: cutoffs.medium,
            high: cutoffs.high,
            critical: cutoffs.critical,
        }
    }
}

/// Override engine section
#[derive(Debug, Clone, Deserialize)]
pub struct OverridesSection {
    /// Additive penalty per distinct critical flag
    pub per_flag_penalty: f64,
    /// Cap on the graduated penalty
    pub max_penalty: f64,
    /// Distinct criticals required to trigger the floor
    pub floor_trigger: usize,
    /// Floor score once triggered
    pub floor_score: f64,
}

impl Default for OverridesSection {
    fn default() -> Self {
        let config = OverrideConfig::default();
        Self {
            per_flag_penalty: config.per_flag_penalty,
            max_penalty: config.max_penalty,
            floor_trigger: config.floor_trigger,
            floor_score: config.floor_score,
        }
    }
}

/// Confidence scoring section
#[derive(Debug, Clone, Deserialize)]
pub struct ConfidenceSection {
    pub missing_penalty: u8,
    pub estimated_penalty: u8,
    pub floor: u8,
}

impl Default for ConfidenceSection {
    fn default() -> Self {
        let config = ConfidenceConfig::default();
        Self {
            missing_penalty: config.missing_penalty,
            estimated_penalty: config.estimated_penalty,
            floor: config.floor,
        }
    }
}

/// Normalization calibration section
#[derive(Debug, Clone, Deserialize)]
pub struct CalibrationSection {
    /// Absolute liquidity floor in USD
    pub min_liquidity_usd: f64,
    /// Young-token window in days
    pub young_token_days: f64,
    /// Maturity threshold in days
    pub mature_token_days: f64,
}

impl Default for CalibrationSection {
    fn default() -> Self {
        let calib = FactorCalibration::default();
        Self {
            min_liquidity_usd: calib.min_liquidity_usd,
            young_token_days: calib.young_token_days,
            mature_token_days: calib.mature_token_days,
        }
    }
}

/// Flag validator section
#[derive(Debug, Clone, Deserialize)]
pub struct FlagsSection {
    pub large_cap_usd: f64,
    pub concentration_threshold_pct: f64,
    pub min_holder_count: u64,
    pub min_liquidity_usd: f64,
    pub sell_tax_warning_pct: f64,
    pub sell_tax_critical_pct: f64,
    pub wash_trading_threshold: f64,
}

impl Default for FlagsSection {
    fn default() -> Self {
        let config = FlagValidatorConfig::default();
        Self {
            large_cap_usd: config.large_cap_usd,
            concentration_threshold_pct: config.concentration_threshold_pct,
            min_holder_count: config.min_holder_count,
            min_liquidity_usd: config.min_liquidity_usd,
            sell_tax_warning_pct: config.sell_tax_warning_pct,
            sell_tax_critical_pct: config.sell_tax_critical_pct,
            wash_trading_threshold: config.wash_trading_threshold,
        }
    }
}

/// Behavioral cache TTL section (seconds)
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    pub holder_history_secs: u64,
    pub liquidity_history_secs: u64,
    pub wallet_age_secs: u64,
    pub chain_authority_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        let ttls = CacheTtls::default();
        Self {
            holder_history_secs: ttls.holder_history_secs,
            liquidity_history_secs: ttls.liquidity_history_secs,
            wallet_age_secs: ttls.wallet_age_secs,
            chain_authority_secs: ttls.chain_authority_secs,
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ScoringConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(ScoringConfig::from(&config))
}

impl Config {
    /// Validate the rule shapes each component relies on, independent
    /// of the concrete values loaded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.levels.medium < self.levels.high && self.levels.high < self.levels.critical) {
            return Err(ConfigError::ValidationError(format!(
                "level cutoffs must be strictly increasing, got {} / {} / {}",
                self.levels.medium, self.levels.high, self.levels.critical
            )));
        }

        if self.overrides.per_flag_penalty < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "per_flag_penalty must be >= 0, got {}",
                self.overrides.per_flag_penalty
            )));
        }
        if self.overrides.max_penalty < self.overrides.per_flag_penalty {
            return Err(ConfigError::ValidationError(format!(
                "max_penalty {} must be >= per_flag_penalty {}",
                self.overrides.max_penalty, self.overrides.per_flag_penalty
            )));
        }
        if self.overrides.floor_trigger == 0 {
            return Err(ConfigError::ValidationError(
                "floor_trigger must be > 0".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.overrides.floor_score) {
            return Err(ConfigError::ValidationError(format!(
                "floor_score must be 0-100, got {}",
                self.overrides.floor_score
            )));
        }

        if self.confidence.floor == 0 || self.confidence.floor > 100 {
            return Err(ConfigError::ValidationError(format!(
                "confidence floor must be 1-100, got {}",
                self.confidence.floor
            )));
        }

        if self.calibration.min_liquidity_usd < 0.0 {
            return Err(ConfigError::ValidationError(
                "min_liquidity_usd must be >= 0".to_string(),
            ));
        }
        if self.calibration.young_token_days >= self.calibration.mature_token_days {
            return Err(ConfigError::ValidationError(format!(
                "young_token_days {} must be below mature_token_days {}",
                self.calibration.young_token_days, self.calibration.mature_token_days
            )));
        }

        if !(0.0..=100.0).contains(&self.flags.concentration_threshold_pct) {
            return Err(ConfigError::ValidationError(format!(
                "concentration_threshold_pct must be 0-100, got {}",
                self.flags.concentration_threshold_pct
            )));
        }
        if self.flags.sell_tax_warning_pct > self.flags.sell_tax_critical_pct {
            return Err(ConfigError::ValidationError(format!(
                "sell_tax_warning_pct {} must not exceed sell_tax_critical_pct {}",
                self.flags.sell_tax_warning_pct, self.flags.sell_tax_critical_pct
            )));
        }

        for (name, secs) in [
            ("holder_history_secs", self.cache.holder_history_secs),
            ("liquidity_history_secs", self.cache.liquidity_history_secs),
            ("wallet_age_secs", self.cache.wallet_age_secs),
            ("chain_authority_secs", self.cache.chain_authority_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be > 0",
                    name
                )));
            }
        }

        // The built-in weight profiles carry their own construction-time
        // invariant; enumerate them here so a broken edit fails loading.
        for archetype in [
            TokenArchetype::Standard,
            TokenArchetype::Meme,
            TokenArchetype::Stablecoin,
            TokenArchetype::Defi,
        ] {
            WeightProfile::for_archetype(archetype)
                .validate()
                .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        }

        Ok(())
    }
}

/// Fully-resolved calibration handed to the analyzer
#[derive(Debug, Clone, Default)]
pub struct ScoringConfig {
    pub cutoffs: LevelCutoffs,
    pub overrides: OverrideConfig,
    pub confidence: ConfidenceConfig,
    pub calibration: FactorCalibration,
    pub flags: FlagValidatorConfig,
    pub ttls: CacheTtls,
}

impl From<&Config> for ScoringConfig {
    fn from(config: &Config) -> Self {
        Self {
            cutoffs: LevelCutoffs {
                medium: config.levels.medium,
                high: config.levels.high,
                critical: config.levels.critical,
            },
            overrides: OverrideConfig {
                per_flag_penalty: config.overrides.per_flag_penalty,
                max_penalty: config.overrides.max_penalty,
                floor_trigger: config.overrides.floor_trigger,
                floor_score: config.overrides.floor_score,
            },
            confidence: ConfidenceConfig {
                missing_penalty: config.confidence.missing_penalty,
                estimated_penalty: config.confidence.estimated_penalty,
                floor: config.confidence.floor,
            },
            calibration: FactorCalibration {
                min_liquidity_usd: config.calibration.min_liquidity_usd,
                young_token_days: config.calibration.young_token_days,
                mature_token_days: config.calibration.mature_token_days,
            },
            flags: FlagValidatorConfig {
                young_token_days: config.calibration.young_token_days,
                large_cap_usd: config.flags.large_cap_usd,
                concentration_threshold_pct: config.flags.concentration_threshold_pct,
                min_holder_count: config.flags.min_holder_count,
                min_liquidity_usd: config.flags.min_liquidity_usd,
                sell_tax_warning_pct: config.flags.sell_tax_warning_pct,
                sell_tax_critical_pct: config.flags.sell_tax_critical_pct,
                wash_trading_threshold: config.flags.wash_trading_threshold,
            },
            ttls: CacheTtls {
                holder_history_secs: config.cache.holder_history_secs,
                liquidity_history_secs: config.cache.liquidity_history_secs,
                wallet_age_secs: config.cache.wallet_age_secs,
                chain_authority_secs: config.cache.chain_authority_secs,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");
        let config = load_config(file.path()).expect("load");
        assert_eq!(config.cutoffs.medium, 30);
        assert_eq!(config.overrides.floor_score, 75.0);
        assert_eq!(config.ttls.holder_history_secs, 600);
    }

    #[test]
    fn test_partial_override() {
        let file = write_config(
            r#"
[levels]
medium = 25
high = 55
critical = 85

[cache]
holder_history_secs = 120
liquidity_history_secs = 60
wallet_age_secs = 300
chain_authority_secs = 300
"#,
        );
        let config = load_config(file.path()).expect("load");
        assert_eq!(config.cutoffs.critical, 85);
        assert_eq!(config.ttls.liquidity_history_secs, 60);
        // Untouched sections keep defaults
        assert_eq!(config.overrides.per_flag_penalty, 15.0);
    }

    #[test]
    fn test_non_monotonic_cutoffs_rejected() {
        let file = write_config(
            r#"
[levels]
medium = 60
high = 30
critical = 80
"#,
        );
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let file = write_config(
            r#"
[cache]
holder_history_secs = 0
liquidity_history_secs = 300
wallet_age_secs = 900
chain_authority_secs = 900
"#,
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_negative_penalty_rejected() {
        let file = write_config(
            r#"
[overrides]
per_flag_penalty = -5.0
max_penalty = 30.0
floor_trigger = 3
floor_score = 75.0
"#,
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let file = write_config("[levels\nmedium = ");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }
}
