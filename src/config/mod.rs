//! Configuration - calibration loading and validation
//!
//! All numeric constants in the scoring rules (penalties, cutoffs, TTL
//! durations, thresholds) are calibration parameters, not hard-wired
//! requirements. The shapes of the rules (monotonicity, clamping,
//! graduated-vs-floor) are enforced by `validate()` regardless of the
//! values loaded.

mod loader;

pub use loader::{load_config, Config, ConfigError, ScoringConfig};
