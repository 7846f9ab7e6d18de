//! Application Layer - analysis orchestration
//!
//! Wires the injected cache and behavioral port to the pure scoring
//! pipeline in `domain`.

pub mod analyzer;

pub use analyzer::{score_snapshot, AnalyzeError, RiskAnalyzer};
