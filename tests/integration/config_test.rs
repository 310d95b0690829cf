//! Configuration loading through the public API

use chrono::{TimeZone, Utc};
use covenant_ratchet::agreement::{EsgSnapshot, FinancialSnapshot, LoanTerms, RateAgreement};
use covenant_ratchet::config::Config;
use covenant_ratchet::engine::CovenantEngine;
use rust_decimal_macros::dec;

#[test]
fn test_regimes_side_by_side() {
    let strict: Config = toml::from_str(
        r#"
        [ratchet]
        sustainability_discount = 0.05
        sustainability_penalty = 0.25
        cov_lite_penalty = 2.0
        high_risk_threshold = 50
        "#,
    )
    .unwrap();
    let lenient = Config::default();
    assert!(strict.validate().is_ok());

    let strict_engine = CovenantEngine::new(strict);
    let lenient_engine = CovenantEngine::new(lenient);

    let history = [dec!(100), dec!(130), dec!(90)];
    let strict_risk = strict_engine.score_risk(&history, dec!(90), dec!(0)).unwrap();
    let lenient_risk = lenient_engine.score_risk(&history, dec!(90), dec!(0)).unwrap();
    assert_eq!(strict_risk, lenient_risk);
    // cv ~19.5% -> moderate tier
    assert_eq!(strict_risk.risk_score, dec!(25));

    let financials = FinancialSnapshot {
        ebitda: dec!(90),
        debt: dec!(180),
        revenue: dec!(900),
        cash_reserves: dec!(0),
    };
    let esg = EsgSnapshot::new(dec!(150));
    let strict_rate = strict_engine
        .agreement()
        .execute_ratchet(&financials, &esg, dec!(60))
        .unwrap();
    let lenient_rate = lenient_engine
        .agreement()
        .execute_ratchet(&financials, &esg, dec!(60))
        .unwrap();
    assert_eq!(strict_rate.new_rate, dec!(8.45));
    assert_eq!(lenient_rate.new_rate, dec!(6.35));
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        [risk]
        high_volatility_pct = 5
        "#,
    )
    .unwrap();

    assert!(Config::load(&path).is_err());
}

#[test]
fn test_example_file_and_defaults_hash_identically() {
    let from_file: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    let defaults = Config::default();
    let at = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
    let financials = FinancialSnapshot {
        ebitda: dec!(40000000),
        debt: dec!(120000000),
        revenue: dec!(250000000),
        cash_reserves: dec!(0),
    };

    let run = |config: &Config, carbon| {
        RateAgreement::new(LoanTerms::from(&config.loan), config.ratchet.clone())
            .execute_ratchet_at(&financials, &EsgSnapshot::new(carbon), dec!(85), at)
            .unwrap()
    };

    for carbon in [dec!(150), dec!(250)] {
        let a = run(&from_file, carbon);
        let b = run(&defaults, carbon);
        assert_eq!(a.reason, b.reason);
        assert_eq!(a.audit_hash, b.audit_hash);
    }
    assert!(run(&from_file, dec!(150)).reason.contains("Cov-Lite Breach: +1.00%"));
}
