//! End-to-end scoring and ratchet flow

use chrono::{TimeZone, Utc};
use covenant_ratchet::agreement::{
    is_audit_hash, AuditLog, EsgSnapshot, FileAuditLog, FinancialSnapshot, LoanTerms, RateAgreement,
};
use covenant_ratchet::config::{Config, RatchetConfig, RiskModelConfig};
use covenant_ratchet::engine::{self, CovenantEngine, EngineError};
use covenant_ratchet::risk::{RiskLevel, RiskModel};
use rust_decimal_macros::dec;

fn reference_financials() -> FinancialSnapshot {
    FinancialSnapshot {
        ebitda: dec!(40000000),
        debt: dec!(120000000),
        revenue: dec!(250000000),
        cash_reserves: dec!(5000000),
    }
}

#[test]
fn test_caller_threads_score_into_agreement() {
    let config = Config::default();
    let model = RiskModel::new(config.risk.clone());
    let risk = model.predict_default_risk(
        &config.loan.historical_ebitda,
        dec!(40000000),
        dec!(0),
    );
    assert_eq!(risk.volatility, dec!(5.60));
    assert_eq!(risk.level, RiskLevel::Low);

    let agreement = RateAgreement::new(LoanTerms::from(&config.loan), config.ratchet.clone());
    let result = agreement
        .execute_ratchet(&reference_financials(), &EsgSnapshot::new(dec!(150)), risk.risk_score)
        .unwrap();

    assert_eq!(result.new_rate, dec!(6.35));
    assert!(is_audit_hash(&result.audit_hash));
    assert_eq!(agreement.get_audit_chain(), vec![result.audit_hash]);
}

#[test]
fn test_standalone_scoring_requires_two_points() {
    let err = engine::score_risk(&RiskModelConfig::default(), &[], dec!(1), dec!(0)).unwrap_err();
    assert!(matches!(err, EngineError::Risk(_)));
    assert_eq!(
        err.to_string(),
        "Need at least 2 historical EBITDA values, got 0"
    );
}

#[test]
fn test_decline_with_cash_buffer() {
    // 100 -> 70 is a 30% drop; cash covers 60% of current EBITDA
    let risk = engine::score_risk(
        &RiskModelConfig::default(),
        &[dec!(100), dec!(100)],
        dec!(70),
        dec!(42),
    )
    .unwrap();
    // base 10, strong relief to 0, decline +15
    assert_eq!(risk.risk_score, dec!(15));
    assert_eq!(risk.probability_of_default, dec!(0.15));
}

#[test]
fn test_reproducible_hash_across_agreements() {
    let terms = LoanTerms::new(dec!(4.5), dec!(2.0), dec!(200));
    let at = Utc.with_ymd_and_hms(2026, 6, 30, 23, 59, 59).unwrap();
    let esg = EsgSnapshot::new(dec!(150));

    let a = RateAgreement::new(terms, RatchetConfig::default())
        .execute_ratchet_at(&reference_financials(), &esg, dec!(85), at)
        .unwrap();
    let b = RateAgreement::new(terms, RatchetConfig::default())
        .execute_ratchet_at(&reference_financials(), &esg, dec!(85), at)
        .unwrap();

    assert_eq!(a, b);
    assert_eq!(a.new_rate, dec!(7.35));
}

#[test]
fn test_persistent_engine_chain() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit").join("chain.log");
    let mut config = Config::default();
    config.audit.path = Some(path.clone());

    let mut hashes = Vec::new();
    for carbon in [dec!(150), dec!(250)] {
        let engine = CovenantEngine::from_config(config.clone()).unwrap();
        let calc = engine
            .calculate_rate(&reference_financials(), &EsgSnapshot::new(carbon))
            .unwrap();
        hashes.push(calc.audit_hash);
    }

    let log = FileAuditLog::open(&path).unwrap();
    assert_eq!(log.entries(), hashes);
}
