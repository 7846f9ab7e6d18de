//! Override Engine
//!
//! Converts validated flags into a score adjustment. One or two critical
//! flags add a graduated penalty on top of the weighted baseline; three
//! or more independent criticals force a floor. A floor raises the score
//! when the baseline is below it and leaves a worse score untouched.
//!
//! Warnings never move the score; they are surfaced as output only.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::flags::RiskFlag;
use crate::domain::normalize::clamp_score;

/// Penalty and floor calibration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideConfig {
    /// Additive penalty per critical flag
    pub per_flag_penalty: f64,
    /// Cap on the total graduated penalty
    pub max_penalty: f64,
    /// Number of distinct criticals that triggers the floor
    pub floor_trigger: usize,
    /// Minimum final score once the floor triggers
    pub floor_score: f64,
}

impl Default for OverrideConfig {
    fn default() -> Self {
        Self {
            per_flag_penalty: 15.0,
            max_penalty: 30.0,
            floor_trigger: 3,
            floor_score: 75.0,
        }
    }
}

/// Result of evaluating the override rules against validated flags
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverrideOutcome {
    /// Count of distinct critical flag codes
    pub critical_count: usize,
    /// Additive penalty, always >= 0
    pub penalty: f64,
    /// Floor applied when enough independent criticals co-occur
    pub floor: Option<f64>,
}

impl OverrideOutcome {
    /// No criticals: the weighted baseline stands as-is
    pub fn none() -> Self {
        Self {
            critical_count: 0,
            penalty: 0.0,
            floor: None,
        }
    }

    /// Apply penalty and floor to a weighted baseline, clamped to [0, 100]
    pub fn apply(&self, baseline: f64) -> f64 {
        let mut score = baseline + self.penalty;
        if let Some(floor) = self.floor {
            score = score.max(floor);
        }
        clamp_score(score)
    }
}

/// Evaluate validated flags into an override outcome.
///
/// Criticals are counted by distinct code: the same signal surfacing
/// twice is one piece of evidence, not two.
pub fn evaluate(flags: &[RiskFlag], config: &OverrideConfig) -> OverrideOutcome {
    let critical_codes: BTreeSet<_> = flags
        .iter()
        .filter(|f| f.is_critical())
        .map(|f| f.code)
        .collect();
    let critical_count = critical_codes.len();

    if critical_count == 0 {
        return OverrideOutcome::none();
    }

    let penalty = (critical_count as f64 * config.per_flag_penalty).min(config.max_penalty);
    let floor = (critical_count >= config.floor_trigger).then_some(config.floor_score);

    OverrideOutcome {
        critical_count,
        penalty,
        floor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flags::{FlagCode, Severity};

    fn flag(code: FlagCode, severity: Severity) -> RiskFlag {
        RiskFlag {
            code,
            raw_hint: severity,
            severity,
            message: format!("{:?}", code),
            context: None,
        }
    }

    #[test]
    fn test_no_criticals_no_override() {
        let flags = vec![
            flag(FlagCode::OwnerNotRenounced, Severity::Warning),
            flag(FlagCode::ProxyContract, Severity::Warning),
        ];
        let outcome = evaluate(&flags, &OverrideConfig::default());
        assert_eq!(outcome, OverrideOutcome::none());
        assert_eq!(outcome.apply(42.0), 42.0);
    }

    #[test]
    fn test_single_critical_adds_single_penalty() {
        let flags = vec![flag(FlagCode::Honeypot, Severity::Critical)];
        let outcome = evaluate(&flags, &OverrideConfig::default());
        assert_eq!(outcome.critical_count, 1);
        assert_eq!(outcome.penalty, 15.0);
        assert_eq!(outcome.floor, None);
        // A single flag no longer forces a fixed score: the baseline
        // still matters.
        assert_eq!(outcome.apply(20.0), 35.0);
        assert_eq!(outcome.apply(70.0), 85.0);
    }

    #[test]
    fn test_two_criticals_capped_penalty_no_floor() {
        let flags = vec![
            flag(FlagCode::Honeypot, Severity::Critical),
            flag(FlagCode::MintAuthority, Severity::Critical),
        ];
        let outcome = evaluate(&flags, &OverrideConfig::default());
        assert_eq!(outcome.penalty, 30.0);
        assert_eq!(outcome.floor, None);
    }

    #[test]
    fn test_three_criticals_force_floor() {
        let flags = vec![
            flag(FlagCode::Honeypot, Severity::Critical),
            flag(FlagCode::MintAuthority, Severity::Critical),
            flag(FlagCode::LpInOwnerWallet, Severity::Critical),
        ];
        let outcome = evaluate(&flags, &OverrideConfig::default());
        assert_eq!(outcome.floor, Some(75.0));
        // Floor lifts a low baseline
        assert_eq!(outcome.apply(10.0), 75.0);
        // ...but never lowers an already-worse score
        assert_eq!(outcome.apply(80.0), 100.0);
    }

    #[test]
    fn test_duplicate_codes_count_once() {
        let flags = vec![
            flag(FlagCode::Honeypot, Severity::Critical),
            flag(FlagCode::Honeypot, Severity::Critical),
        ];
        let outcome = evaluate(&flags, &OverrideConfig::default());
        assert_eq!(outcome.critical_count, 1);
        assert_eq!(outcome.penalty, 15.0);
    }

    #[test]
    fn test_penalty_is_never_negative() {
        let outcome = evaluate(&[], &OverrideConfig::default());
        assert!(outcome.penalty >= 0.0);
        assert!(outcome.apply(50.0) >= 50.0);
    }

    #[test]
    fn test_result_clamped_to_100() {
        let flags = vec![
            flag(FlagCode::Honeypot, Severity::Critical),
            flag(FlagCode::MintAuthority, Severity::Critical),
        ];
        let outcome = evaluate(&flags, &OverrideConfig::default());
        assert_eq!(outcome.apply(95.0), 100.0);
    }
}
