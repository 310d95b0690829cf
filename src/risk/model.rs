//! Default-risk scoring
//!
//! Volatility tier, then cash-buffer relief, then the decline penalty.

use super::types::{RiskAssessment, RiskLevel};
use super::volatility::coefficient_of_variation;
use crate::config::RiskModelConfig;
use crate::telemetry::{set_gauge, GaugeMetric};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Credit risk model over an EBITDA history
#[derive(Debug, Clone, Default)]
pub struct RiskModel {
    config: RiskModelConfig,
}

impl RiskModel {
    /// Create a model with the given thresholds
    pub fn new(config: RiskModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskModelConfig {
        &self.config
    }

    /// Volatility of the history as a percentage (2 dp)
    pub fn calculate_volatility(&self, history: &[Decimal]) -> Decimal {
        coefficient_of_variation(history)
    }

    /// Score default risk for the current period.
    ///
    /// `history` is oldest first and is not expected to contain
    /// `current_value`; callers that append it get a zero trend.
    pub fn predict_default_risk(
        &self,
        history: &[Decimal],
        current_value: Decimal,
        cash_reserves: Decimal,
    ) -> RiskAssessment {
        let volatility = self.calculate_volatility(history);
        let mut risk = self.base_tier(volatility);

        if cash_reserves > Decimal::ZERO {
            let cash_ratio = cash_reserves
                .checked_div(current_value.max(Decimal::ONE))
                .and_then(|r| r.checked_mul(dec!(100)))
                .unwrap_or(Decimal::MAX);
            let relief = if cash_ratio > self.config.strong_cash_ratio_pct {
                self.config.strong_cash_relief
            } else if cash_ratio > self.config.partial_cash_ratio_pct {
                self.config.partial_cash_relief
            } else {
                Decimal::ZERO
            };
            risk = (risk - relief).max(Decimal::ZERO);
            tracing::debug!(%cash_ratio, %relief, "Cash buffer relief");
        }

        if let [_, .., last] = history {
            let trend = percent_change(*last, current_value);
            if trend < self.config.decline_threshold_pct {
                risk = (risk + self.config.decline_penalty).min(dec!(100));
                tracing::debug!(%trend, "EBITDA decline penalty applied");
            }
        }

        let risk_score = risk.clamp(Decimal::ZERO, dec!(100)).round_dp(2);
        let probability_of_default = (risk_score / dec!(100)).round_dp(4);
        let level = RiskLevel::from_score(risk_score, &self.config);

        tracing::debug!(
            %volatility,
            %risk_score,
            %probability_of_default,
            ?level,
            "Default risk predicted"
        );
        set_gauge(GaugeMetric::RiskScore, risk_score);
        set_gauge(GaugeMetric::Volatility, volatility);

        RiskAssessment {
            risk_score,
            volatility,
            probability_of_default,
            level,
            message: level.message().to_string(),
        }
    }

    fn base_tier(&self, volatility: Decimal) -> Decimal {
        let c = &self.config;
        if volatility > c.high_volatility_pct {
            c.high_tier_score
        } else if volatility > c.elevated_volatility_pct {
            c.elevated_tier_score
        } else if volatility > c.moderate_volatility_pct {
            c.moderate_tier_score
        } else {
            c.baseline_tier_score
        }
    }
}

/// Change from `last` to `current` as a percentage of `max(|last|, 1)`,
/// saturating at the Decimal bounds
fn percent_change(last: Decimal, current: Decimal) -> Decimal {
    let saturated = if current >= last {
        Decimal::MAX
    } else {
        Decimal::MIN
    };
    current
        .checked_sub(last)
        .and_then(|d| d.checked_div(last.abs().max(Decimal::ONE)))
        .and_then(|r| r.checked_mul(dec!(100)))
        .unwrap_or(saturated)
}
