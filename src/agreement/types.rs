//! Agreement types

use super::audit::AuditError;
use crate::config::LoanConfig;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rate ratchet errors
#[derive(Debug, Error)]
pub enum RatchetError {
    /// Carbon emissions cannot be negative
    #[error("Carbon emissions must be non-negative, got {0}")]
    NegativeEmissions(Decimal),
    /// Risk score outside the 0-100 scale
    #[error("Risk score must be within [0, 100], got {0}")]
    RiskScoreOutOfRange(Decimal),
    /// Transaction record could not be serialized
    #[error("Failed to serialize transaction record: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Audit chain append failed
    #[error("Audit log error: {0}")]
    Audit(#[from] AuditError),
}

/// Contract terms, fixed for the life of an agreement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Base interest rate in percent
    pub base_rate: Decimal,
    /// Margin over the base rate in percent
    pub margin: Decimal,
    /// Carbon emissions target (tons)
    pub esg_target: Decimal,
}

impl LoanTerms {
    pub fn new(base_rate: Decimal, margin: Decimal, esg_target: Decimal) -> Self {
        Self {
            base_rate,
            margin,
            esg_target,
        }
    }

    /// Rate before any ratchet adjustment
    pub fn starting_rate(&self) -> Decimal {
        self.base_rate + self.margin
    }
}

impl From<&LoanConfig> for LoanTerms {
    fn from(config: &LoanConfig) -> Self {
        Self::new(config.base_rate, config.margin, config.esg_target)
    }
}

/// Current-period financial metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub ebitda: Decimal,
    pub debt: Decimal,
    pub revenue: Decimal,
    #[serde(default)]
    pub cash_reserves: Decimal,
}

impl FinancialSnapshot {
    /// Same values with trailing zeros stripped, for hashing
    pub fn normalized(&self) -> Self {
        Self {
            ebitda: self.ebitda.normalize(),
            debt: self.debt.normalize(),
            revenue: self.revenue.normalize(),
            cash_reserves: self.cash_reserves.normalize(),
        }
    }
}

/// Current-period ESG metrics
///
/// A missing `carbon_emissions` deserializes to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsgSnapshot {
    #[serde(default)]
    pub carbon_emissions: Decimal,
    /// Carried for reporting; not used by the ratchet rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diversity_score: Option<Decimal>,
}

impl EsgSnapshot {
    pub fn new(carbon_emissions: Decimal) -> Self {
        Self {
            carbon_emissions,
            diversity_score: None,
        }
    }

    /// Same values with trailing zeros stripped, for hashing
    pub fn normalized(&self) -> Self {
        Self {
            carbon_emissions: self.carbon_emissions.normalize(),
            diversity_score: self.diversity_score.map(|d| d.normalize()),
        }
    }
}

/// A single rule-driven rate adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "points", rename_all = "snake_case")]
pub enum Adjustment {
    /// ESG target met
    SustainabilityDiscount(Decimal),
    /// ESG target missed
    SustainabilityPenalty(Decimal),
    /// Risk score above the high-risk threshold
    CovLiteBreach(Decimal),
}

impl Adjustment {
    /// Signed change to the rate in percentage points
    pub fn delta(&self) -> Decimal {
        match self {
            Adjustment::SustainabilityDiscount(points) => -*points,
            Adjustment::SustainabilityPenalty(points) => *points,
            Adjustment::CovLiteBreach(points) => *points,
        }
    }
}

/// Magnitude as shown in reasons: at least 2 dp, no extra trailing zeros.
///
/// Reasons are hashed, so `1`, `1.0` and `1.00` must render the same.
fn display_points(points: Decimal) -> Decimal {
    let mut points = points.normalize();
    if points.scale() < 2 {
        points.rescale(2);
    }
    points
}

impl std::fmt::Display for Adjustment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Adjustment::SustainabilityDiscount(points) => write!(
                f,
                "Sustainability Discount Applied: -{}% (ESG Target Met)",
                display_points(*points)
            ),
            Adjustment::SustainabilityPenalty(points) => write!(
                f,
                "Sustainability Penalty Applied: +{}% (ESG Target Missed)",
                display_points(*points)
            ),
            Adjustment::CovLiteBreach(points) => write!(
                f,
                "Cov-Lite Breach: +{}% (High Default Risk)",
                display_points(*points)
            ),
        }
    }
}

/// Outcome of one ratchet execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatchetResult {
    /// Adjusted rate, rounded to 2 dp
    pub new_rate: Decimal,
    /// Adjustment descriptions joined with "; "
    pub reason: String,
    /// Transaction timestamp
    pub date: DateTime<Utc>,
    /// Lowercase hex SHA-256 of the canonical transaction record
    pub audit_hash: String,
    /// Adjustments in the order they were applied
    pub adjustments: Vec<Adjustment>,
}
