//! Covenant engine
//!
//! Threads the risk score from the risk model into the rate agreement,
//! and evaluates covenant compliance for the configured loan.

mod compliance;
mod types;

pub use compliance::{leverage_ratio, ComplianceReport, CovenantLimits};
pub use types::{EngineError, RateBreakdown, RateCalculation};

use crate::agreement::{
    AuditLog, EsgSnapshot, FileAuditLog, FinancialSnapshot, LoanTerms, RateAgreement,
    RatchetResult,
};
use crate::config::{Config, RatchetConfig, RiskModelConfig};
use crate::risk::{ensure_history, RiskAssessment, RiskModel};
use crate::telemetry::{increment_counter, set_gauge, CounterMetric, GaugeMetric};
use rust_decimal::Decimal;

/// Score a history with a validated minimum length
pub fn score_risk(
    config: &RiskModelConfig,
    history: &[Decimal],
    current: Decimal,
    cash_reserves: Decimal,
) -> Result<RiskAssessment, EngineError> {
    ensure_history(history)?;
    Ok(RiskModel::new(config.clone()).predict_default_risk(history, current, cash_reserves))
}

/// Run a single ratchet against a fresh agreement
pub fn ratchet(
    terms: LoanTerms,
    config: &RatchetConfig,
    financials: &FinancialSnapshot,
    esg: &EsgSnapshot,
    risk_score: Decimal,
) -> Result<RatchetResult, EngineError> {
    let agreement = RateAgreement::new(terms, config.clone());
    Ok(agreement.execute_ratchet(financials, esg, risk_score)?)
}

/// The configured loan: its risk model, agreement, and covenant limits
#[derive(Debug)]
pub struct CovenantEngine {
    config: Config,
    risk_model: RiskModel,
    agreement: RateAgreement,
}

impl CovenantEngine {
    /// Engine with an in-memory audit chain
    pub fn new(config: Config) -> Self {
        let agreement = RateAgreement::new(LoanTerms::from(&config.loan), config.ratchet.clone());
        Self::assemble(config, agreement)
    }

    /// Engine with a caller-supplied audit log
    pub fn with_audit_log(config: Config, audit_log: Box<dyn AuditLog>) -> Self {
        let agreement = RateAgreement::with_audit_log(
            LoanTerms::from(&config.loan),
            config.ratchet.clone(),
            audit_log,
        );
        Self::assemble(config, agreement)
    }

    /// Engine whose audit log follows `[audit].path`
    pub fn from_config(config: Config) -> Result<Self, EngineError> {
        match config.audit.path.clone() {
            Some(path) => {
                let log = FileAuditLog::open(path)?;
                Ok(Self::with_audit_log(config, Box::new(log)))
            }
            None => Ok(Self::new(config)),
        }
    }

    fn assemble(config: Config, agreement: RateAgreement) -> Self {
        let risk_model = RiskModel::new(config.risk.clone());
        Self {
            config,
            risk_model,
            agreement,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn agreement(&self) -> &RateAgreement {
        &self.agreement
    }

    /// Score an arbitrary history with this engine's thresholds
    pub fn score_risk(
        &self,
        history: &[Decimal],
        current: Decimal,
        cash_reserves: Decimal,
    ) -> Result<RiskAssessment, EngineError> {
        ensure_history(history)?;
        Ok(self
            .risk_model
            .predict_default_risk(history, current, cash_reserves))
    }

    /// Score the period against the baseline history, ratchet the rate,
    /// and check covenants.
    ///
    /// The current EBITDA is appended to the baseline before scoring.
    pub fn calculate_rate(
        &self,
        financials: &FinancialSnapshot,
        esg: &EsgSnapshot,
    ) -> Result<RateCalculation, EngineError> {
        let mut history = self.config.loan.historical_ebitda.clone();
        history.push(financials.ebitda);

        let risk = self.score_risk(&history, financials.ebitda, financials.cash_reserves)?;
        let ratchet = self
            .agreement
            .execute_ratchet(financials, esg, risk.risk_score)?;

        let limits = CovenantLimits {
            max_leverage_ratio: self.config.loan.max_leverage_ratio,
            esg_target: self.config.loan.esg_target,
            high_risk_threshold: self.config.ratchet.high_risk_threshold,
        };
        let compliance = ComplianceReport::evaluate(financials, esg, risk.risk_score, &limits);
        let is_compliant = compliance.is_compliant();

        let mut messages = Vec::with_capacity(3);
        if compliance.esg_target_met {
            messages.push("Rate Reduced: ESG Target Met");
        } else {
            messages.push("Rate Increased: ESG Target Missed");
        }
        if risk.risk_score > limits.high_risk_threshold {
            messages.push("High Default Risk Detected");
        }
        if !is_compliant {
            messages.push("Compliance Breach");
            increment_counter(CounterMetric::ComplianceBreaches);
            tracing::warn!(
                agreement_id = %self.agreement.id(),
                leverage_ratio = %compliance.leverage_ratio,
                esg_target_met = compliance.esg_target_met,
                risk_score = %risk.risk_score,
                "Covenant compliance breach"
            );
        }
        set_gauge(GaugeMetric::LeverageRatio, compliance.leverage_ratio);

        let terms = self.agreement.terms();
        Ok(RateCalculation {
            new_interest_rate: ratchet.new_rate,
            risk_score: risk.risk_score,
            is_compliant,
            audit_hash: ratchet.audit_hash,
            message: messages.join(". "),
            reason: ratchet.reason,
            compliance,
            breakdown: RateBreakdown {
                base_rate: terms.base_rate,
                margin: terms.margin,
                risk_score: risk.risk_score,
                volatility: risk.volatility,
                probability_of_default: risk.probability_of_default,
                leverage_ratio: compliance.leverage_ratio.round_dp(2),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskError;
    use rust_decimal_macros::dec;

    fn financials(ebitda: Decimal, debt: Decimal) -> FinancialSnapshot {
        FinancialSnapshot {
            ebitda,
            debt,
            revenue: dec!(250000000),
            cash_reserves: dec!(0),
        }
    }

    #[test]
    fn test_score_risk_rejects_short_history() {
        let err = score_risk(&RiskModelConfig::default(), &[dec!(100)], dec!(100), dec!(0))
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Risk(RiskError::InsufficientHistory {
                required: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_score_risk_accepts_two_points() {
        let result =
            score_risk(&RiskModelConfig::default(), &[dec!(100), dec!(200)], dec!(200), dec!(0))
                .unwrap();
        assert_eq!(result.risk_score, dec!(80));
    }

    #[test]
    fn test_score_risk_extreme_values_do_not_panic() {
        let config = RiskModelConfig::default();
        let flat = score_risk(&config, &[Decimal::MAX, Decimal::MAX], dec!(1), dec!(0)).unwrap();
        assert_eq!(flat.volatility, dec!(0));
        // decline from MAX to 1 adds the penalty
        assert_eq!(flat.risk_score, dec!(25));

        let rich = score_risk(
            &config,
            &[dec!(100), dec!(100)],
            dec!(1),
            dec!(1000000000000000000000000000),
        )
        .unwrap();
        // strong relief floors at 0, then the decline penalty
        assert_eq!(rich.risk_score, dec!(15));
    }

    #[test]
    fn test_calculate_rate_with_tiny_ebitda() {
        let engine = CovenantEngine::new(Config::default());
        let calc = engine
            .calculate_rate(
                &financials(dec!(0.0000000000000000000000000001), dec!(120000000)),
                &EsgSnapshot::new(dec!(150)),
            )
            .unwrap();
        assert_eq!(calc.compliance.leverage_ratio, Decimal::MAX);
        assert!(!calc.is_compliant);
    }

    #[test]
    fn test_ratchet_reference_example() {
        let result = ratchet(
            LoanTerms::new(dec!(4.5), dec!(2.0), dec!(200.0)),
            &RatchetConfig::default(),
            &financials(dec!(40000000), dec!(120000000)),
            &EsgSnapshot::new(dec!(150.0)),
            dec!(85),
        )
        .unwrap();
        assert_eq!(result.new_rate, dec!(7.35));
    }

    #[test]
    fn test_calculate_rate_healthy_period() {
        let engine = CovenantEngine::new(Config::default());
        let calc = engine
            .calculate_rate(
                &financials(dec!(40000000), dec!(120000000)),
                &EsgSnapshot::new(dec!(150)),
            )
            .unwrap();

        assert_eq!(calc.new_interest_rate, dec!(6.35));
        assert_eq!(calc.risk_score, dec!(10));
        assert_eq!(calc.breakdown.volatility, dec!(5.38));
        assert_eq!(calc.breakdown.leverage_ratio, dec!(3));
        assert!(calc.is_compliant);
        assert_eq!(calc.message, "Rate Reduced: ESG Target Met");
        assert_eq!(engine.agreement().get_audit_chain(), vec![calc.audit_hash]);
    }

    #[test]
    fn test_calculate_rate_breach() {
        let engine = CovenantEngine::new(Config::default());
        let calc = engine
            .calculate_rate(
                &financials(dec!(1000000), dec!(120000000)),
                &EsgSnapshot::new(dec!(250)),
            )
            .unwrap();

        // volatility 31.16% -> high tier, not above the cov-lite threshold
        assert_eq!(calc.risk_score, dec!(80));
        assert_eq!(calc.new_interest_rate, dec!(6.55));
        assert!(!calc.is_compliant);
        assert!(!calc.compliance.leverage_within_limit);
        assert_eq!(
            calc.message,
            "Rate Increased: ESG Target Missed. Compliance Breach"
        );
    }

    #[test]
    fn test_calculate_rate_high_default_risk() {
        let mut config = Config::default();
        config.risk.high_tier_score = dec!(90);
        let engine = CovenantEngine::new(config);
        let calc = engine
            .calculate_rate(
                &financials(dec!(1000000), dec!(1000000)),
                &EsgSnapshot::new(dec!(150)),
            )
            .unwrap();

        assert_eq!(calc.risk_score, dec!(90));
        assert_eq!(calc.new_interest_rate, dec!(7.35));
        assert_eq!(
            calc.message,
            "Rate Reduced: ESG Target Met. High Default Risk Detected. Compliance Breach"
        );
        assert!(calc.reason.contains("Cov-Lite Breach"));
    }

    #[test]
    fn test_calculate_rate_with_empty_baseline_is_rejected() {
        let mut config = Config::default();
        config.loan.historical_ebitda.clear();
        let engine = CovenantEngine::new(config);
        let err = engine
            .calculate_rate(
                &financials(dec!(40000000), dec!(1)),
                &EsgSnapshot::new(dec!(150)),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::Risk(_)));
        assert!(engine.agreement().get_audit_chain().is_empty());
    }

    #[test]
    fn test_each_calculation_extends_chain() {
        let engine = CovenantEngine::new(Config::default());
        for _ in 0..3 {
            engine
                .calculate_rate(
                    &financials(dec!(40000000), dec!(120000000)),
                    &EsgSnapshot::new(dec!(150)),
                )
                .unwrap();
        }
        assert_eq!(engine.agreement().get_audit_chain().len(), 3);
    }

    #[test]
    fn test_from_config_uses_file_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.audit.path = Some(dir.path().join("chain.log"));

        let engine = CovenantEngine::from_config(config.clone()).unwrap();
        engine
            .calculate_rate(
                &financials(dec!(40000000), dec!(120000000)),
                &EsgSnapshot::new(dec!(150)),
            )
            .unwrap();
        drop(engine);

        let reopened = CovenantEngine::from_config(config).unwrap();
        assert_eq!(reopened.agreement().get_audit_chain().len(), 1);
    }
}
