//! Engine types

use super::compliance::ComplianceReport;
use crate::agreement::{AuditError, RatchetError};
use crate::risk::RiskError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced to callers of the engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Risk(#[from] RiskError),
    #[error(transparent)]
    Ratchet(#[from] RatchetError),
    #[error(transparent)]
    Audit(#[from] AuditError),
}

/// Inputs and intermediate values behind a rate decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBreakdown {
    pub base_rate: Decimal,
    pub margin: Decimal,
    pub risk_score: Decimal,
    pub volatility: Decimal,
    pub probability_of_default: Decimal,
    pub leverage_ratio: Decimal,
}

/// Result of the full score-then-ratchet flow for one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateCalculation {
    pub new_interest_rate: Decimal,
    pub risk_score: Decimal,
    pub is_compliant: bool,
    pub audit_hash: String,
    pub message: String,
    /// Ratchet reasons, "; "-joined
    pub reason: String,
    pub compliance: ComplianceReport,
    pub breakdown: RateBreakdown,
}
