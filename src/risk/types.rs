//! Risk scoring types

use crate::config::RiskModelConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Risk scoring errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RiskError {
    /// Not enough observations for a meaningful volatility
    #[error("Need at least {required} historical EBITDA values, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },
}

/// Risk band selected from the final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Moderate,
    LowModerate,
    Low,
}

impl RiskLevel {
    /// Classify a score against the configured message thresholds
    pub fn from_score(score: Decimal, config: &RiskModelConfig) -> Self {
        if score >= config.high_risk_threshold {
            RiskLevel::High
        } else if score >= config.moderate_risk_threshold {
            RiskLevel::Moderate
        } else if score >= config.low_risk_threshold {
            RiskLevel::LowModerate
        } else {
            RiskLevel::Low
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RiskLevel::High => "HIGH RISK: Elevated default probability detected",
            RiskLevel::Moderate => "MODERATE RISK: Monitor closely",
            RiskLevel::LowModerate => "LOW-MODERATE RISK: Stable operations",
            RiskLevel::Low => "LOW RISK: Strong financial position",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Output of a default-risk prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Risk score on the 0-100 scale
    pub risk_score: Decimal,
    /// Coefficient of variation of the history, in percent
    pub volatility: Decimal,
    /// risk_score / 100, rounded to 4 dp
    pub probability_of_default: Decimal,
    /// Risk band
    pub level: RiskLevel,
    /// Human-readable band description
    pub message: String,
}
