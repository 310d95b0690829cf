//! covenant-ratchet: credit-risk scoring and sustainability-linked rate ratchet
//!
//! This library provides the core components for:
//! - EBITDA volatility and default-risk scoring
//! - Rule-based interest rate ratchet (ESG discount/penalty, cov-lite breach)
//! - SHA-256 hashed, append-only audit chain (in memory or on disk)
//! - Covenant compliance checks for a configured loan
//! - TOML configuration, structured logging and metrics

pub mod agreement;
pub mod cli;
pub mod config;
pub mod engine;
pub mod risk;
pub mod telemetry;
