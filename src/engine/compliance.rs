//! Covenant compliance checks

use crate::agreement::{EsgSnapshot, FinancialSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Limits a period is tested against
#[derive(Debug, Clone, Copy)]
pub struct CovenantLimits {
    pub max_leverage_ratio: Decimal,
    pub esg_target: Decimal,
    pub high_risk_threshold: Decimal,
}

/// Per-covenant outcome for one period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// debt / EBITDA, zero when EBITDA is not positive
    pub leverage_ratio: Decimal,
    pub leverage_within_limit: bool,
    pub esg_target_met: bool,
    pub risk_below_threshold: bool,
}

impl ComplianceReport {
    pub fn evaluate(
        financials: &FinancialSnapshot,
        esg: &EsgSnapshot,
        risk_score: Decimal,
        limits: &CovenantLimits,
    ) -> Self {
        let leverage_ratio = leverage_ratio(financials);
        Self {
            leverage_ratio,
            leverage_within_limit: leverage_ratio <= limits.max_leverage_ratio,
            esg_target_met: esg.carbon_emissions < limits.esg_target,
            risk_below_threshold: risk_score < limits.high_risk_threshold,
        }
    }

    pub fn is_compliant(&self) -> bool {
        self.leverage_within_limit && self.esg_target_met && self.risk_below_threshold
    }
}

/// debt / EBITDA; a non-positive EBITDA yields zero.
///
/// Saturates at the Decimal bounds when EBITDA is tiny.
pub fn leverage_ratio(financials: &FinancialSnapshot) -> Decimal {
    if financials.ebitda <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    financials
        .debt
        .checked_div(financials.ebitda)
        .unwrap_or(if financials.debt.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn limits() -> CovenantLimits {
        CovenantLimits {
            max_leverage_ratio: dec!(4.0),
            esg_target: dec!(200),
            high_risk_threshold: dec!(80),
        }
    }

    fn financials(ebitda: Decimal, debt: Decimal) -> FinancialSnapshot {
        FinancialSnapshot {
            ebitda,
            debt,
            revenue: dec!(1000),
            cash_reserves: dec!(0),
        }
    }

    #[test]
    fn test_compliant_period() {
        let report = ComplianceReport::evaluate(
            &financials(dec!(100), dec!(300)),
            &EsgSnapshot::new(dec!(150)),
            dec!(10),
            &limits(),
        );
        assert_eq!(report.leverage_ratio, dec!(3));
        assert!(report.is_compliant());
    }

    #[test]
    fn test_leverage_at_limit_is_compliant() {
        let report = ComplianceReport::evaluate(
            &financials(dec!(100), dec!(400)),
            &EsgSnapshot::new(dec!(150)),
            dec!(10),
            &limits(),
        );
        assert!(report.leverage_within_limit);
    }

    #[test]
    fn test_leverage_breach() {
        let report = ComplianceReport::evaluate(
            &financials(dec!(100), dec!(450)),
            &EsgSnapshot::new(dec!(150)),
            dec!(10),
            &limits(),
        );
        assert!(!report.leverage_within_limit);
        assert!(!report.is_compliant());
    }

    #[test]
    fn test_non_positive_ebitda_has_zero_leverage() {
        assert_eq!(leverage_ratio(&financials(dec!(0), dec!(500))), dec!(0));
        assert_eq!(leverage_ratio(&financials(dec!(-10), dec!(500))), dec!(0));
    }

    #[test]
    fn test_tiny_ebitda_saturates_leverage() {
        let report = ComplianceReport::evaluate(
            &financials(dec!(0.0000000000000000000000000001), dec!(120000000)),
            &EsgSnapshot::new(dec!(150)),
            dec!(10),
            &limits(),
        );
        assert_eq!(report.leverage_ratio, Decimal::MAX);
        assert!(!report.leverage_within_limit);

        let negative = leverage_ratio(&financials(dec!(0.0000000000000000000000000001), dec!(-9)));
        assert_eq!(negative, Decimal::MIN);
    }

    #[test]
    fn test_esg_and_risk_breaches() {
        let report = ComplianceReport::evaluate(
            &financials(dec!(100), dec!(100)),
            &EsgSnapshot::new(dec!(200)),
            dec!(80),
            &limits(),
        );
        assert!(report.leverage_within_limit);
        assert!(!report.esg_target_met);
        assert!(!report.risk_below_threshold);
        assert!(!report.is_compliant());
    }
}
