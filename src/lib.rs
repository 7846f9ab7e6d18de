#![allow(dead_code)]
//! TokenSentry - Token Risk Scoring Engine Library
//!
//! A multi-factor risk scoring engine for blockchain tokens. Combines
//! calibrated normalization curves, archetype-aware weight profiles,
//! context-validated security flags and a graduated override engine into
//! a single 0-100 risk score with confidence rating.
//!
//! # Modules
//!
//! - `domain`: Core scoring logic (normalization, factors, weights, flags, aggregation)
//! - `ports`: Trait abstractions (BehavioralStore, BehavioralDataPort)
//! - `adapters`: External implementations (in-memory cache, CLI)
//! - `config`: Calibration loading and validation
//! - `application`: RiskAnalyzer entry point

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
