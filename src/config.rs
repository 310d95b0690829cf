//! Configuration types for covenant-ratchet

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub loan: LoanConfig,
    #[serde(default)]
    pub risk: RiskModelConfig,
    #[serde(default)]
    pub ratchet: RatchetConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Contract terms and covenant limits for the configured loan
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoanConfig {
    /// Base interest rate in percent
    #[serde(default = "default_base_rate")]
    pub base_rate: Decimal,

    /// Contractual margin over the base rate in percent
    #[serde(default = "default_margin")]
    pub margin: Decimal,

    /// Carbon emissions target (tons); below target earns the discount
    #[serde(default = "default_esg_target")]
    pub esg_target: Decimal,

    /// Maximum debt / EBITDA before the financial covenant is breached
    #[serde(default = "default_max_leverage_ratio")]
    pub max_leverage_ratio: Decimal,

    /// Baseline EBITDA history, oldest first
    #[serde(default = "default_historical_ebitda")]
    pub historical_ebitda: Vec<Decimal>,
}

fn default_base_rate() -> Decimal {
    dec!(4.5)
}
fn default_margin() -> Decimal {
    dec!(2.0)
}
fn default_esg_target() -> Decimal {
    dec!(200.0)
}
fn default_max_leverage_ratio() -> Decimal {
    dec!(4.0)
}
fn default_historical_ebitda() -> Vec<Decimal> {
    vec![
        dec!(35000000),
        dec!(36000000),
        dec!(37000000),
        dec!(38000000),
        dec!(39000000),
        dec!(40000000),
        dec!(41000000),
        dec!(42000000),
        dec!(40500000),
        dec!(40000000),
        dec!(39500000),
    ]
}

impl Default for LoanConfig {
    fn default() -> Self {
        Self {
            base_rate: default_base_rate(),
            margin: default_margin(),
            esg_target: default_esg_target(),
            max_leverage_ratio: default_max_leverage_ratio(),
            historical_ebitda: default_historical_ebitda(),
        }
    }
}

/// Risk model thresholds
///
/// Volatility breakpoints are percentages. Scores are on the 0-100 scale.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RiskModelConfig {
    /// Volatility above this maps to the high tier
    #[serde(default = "default_high_volatility_pct")]
    pub high_volatility_pct: Decimal,
    /// Volatility above this maps to the elevated tier
    #[serde(default = "default_elevated_volatility_pct")]
    pub elevated_volatility_pct: Decimal,
    /// Volatility above this maps to the moderate tier
    #[serde(default = "default_moderate_volatility_pct")]
    pub moderate_volatility_pct: Decimal,

    #[serde(default = "default_high_tier_score")]
    pub high_tier_score: Decimal,
    #[serde(default = "default_elevated_tier_score")]
    pub elevated_tier_score: Decimal,
    #[serde(default = "default_moderate_tier_score")]
    pub moderate_tier_score: Decimal,
    #[serde(default = "default_baseline_tier_score")]
    pub baseline_tier_score: Decimal,

    /// Cash / current EBITDA (percent) above which the strong relief applies
    #[serde(default = "default_strong_cash_ratio_pct")]
    pub strong_cash_ratio_pct: Decimal,
    #[serde(default = "default_strong_cash_relief")]
    pub strong_cash_relief: Decimal,
    /// Cash / current EBITDA (percent) above which the partial relief applies
    #[serde(default = "default_partial_cash_ratio_pct")]
    pub partial_cash_ratio_pct: Decimal,
    #[serde(default = "default_partial_cash_relief")]
    pub partial_cash_relief: Decimal,

    /// Period-over-period change (percent) below which the decline penalty applies
    #[serde(default = "default_decline_threshold_pct")]
    pub decline_threshold_pct: Decimal,
    #[serde(default = "default_decline_penalty")]
    pub decline_penalty: Decimal,

    /// Message thresholds, independent of the tier breakpoints
    #[serde(default = "default_high_risk_threshold")]
    pub high_risk_threshold: Decimal,
    #[serde(default = "default_moderate_risk_threshold")]
    pub moderate_risk_threshold: Decimal,
    #[serde(default = "default_low_risk_threshold")]
    pub low_risk_threshold: Decimal,
}

fn default_high_volatility_pct() -> Decimal {
    dec!(30)
}
fn default_elevated_volatility_pct() -> Decimal {
    dec!(20)
}
fn default_moderate_volatility_pct() -> Decimal {
    dec!(10)
}
fn default_high_tier_score() -> Decimal {
    dec!(80)
}
fn default_elevated_tier_score() -> Decimal {
    dec!(50)
}
fn default_moderate_tier_score() -> Decimal {
    dec!(25)
}
fn default_baseline_tier_score() -> Decimal {
    dec!(10)
}
fn default_strong_cash_ratio_pct() -> Decimal {
    dec!(50)
}
fn default_strong_cash_relief() -> Decimal {
    dec!(20)
}
fn default_partial_cash_ratio_pct() -> Decimal {
    dec!(25)
}
fn default_partial_cash_relief() -> Decimal {
    dec!(10)
}
fn default_decline_threshold_pct() -> Decimal {
    dec!(-10)
}
fn default_decline_penalty() -> Decimal {
    dec!(15)
}
fn default_high_risk_threshold() -> Decimal {
    dec!(80)
}
fn default_moderate_risk_threshold() -> Decimal {
    dec!(50)
}
fn default_low_risk_threshold() -> Decimal {
    dec!(25)
}

impl Default for RiskModelConfig {
    fn default() -> Self {
        Self {
            high_volatility_pct: default_high_volatility_pct(),
            elevated_volatility_pct: default_elevated_volatility_pct(),
            moderate_volatility_pct: default_moderate_volatility_pct(),
            high_tier_score: default_high_tier_score(),
            elevated_tier_score: default_elevated_tier_score(),
            moderate_tier_score: default_moderate_tier_score(),
            baseline_tier_score: default_baseline_tier_score(),
            strong_cash_ratio_pct: default_strong_cash_ratio_pct(),
            strong_cash_relief: default_strong_cash_relief(),
            partial_cash_ratio_pct: default_partial_cash_ratio_pct(),
            partial_cash_relief: default_partial_cash_relief(),
            decline_threshold_pct: default_decline_threshold_pct(),
            decline_penalty: default_decline_penalty(),
            high_risk_threshold: default_high_risk_threshold(),
            moderate_risk_threshold: default_moderate_risk_threshold(),
            low_risk_threshold: default_low_risk_threshold(),
        }
    }
}

/// Rate adjustment magnitudes, in percentage points
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RatchetConfig {
    #[serde(default = "default_sustainability_discount")]
    pub sustainability_discount: Decimal,
    #[serde(default = "default_sustainability_penalty")]
    pub sustainability_penalty: Decimal,
    #[serde(default = "default_cov_lite_penalty")]
    pub cov_lite_penalty: Decimal,
    /// Risk score strictly above this triggers the cov-lite penalty
    #[serde(default = "default_high_risk_threshold")]
    pub high_risk_threshold: Decimal,
}

fn default_sustainability_discount() -> Decimal {
    dec!(0.15)
}
fn default_sustainability_penalty() -> Decimal {
    dec!(0.05)
}
fn default_cov_lite_penalty() -> Decimal {
    dec!(1.00)
}

impl Default for RatchetConfig {
    fn default() -> Self {
        Self {
            sustainability_discount: default_sustainability_discount(),
            sustainability_penalty: default_sustainability_penalty(),
            cov_lite_penalty: default_cov_lite_penalty(),
            high_risk_threshold: default_high_risk_threshold(),
        }
    }
}

/// Audit chain persistence
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuditConfig {
    /// Append-only hash file; in-memory chain when unset
    pub path: Option<PathBuf>,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check threshold ordering and ranges.
    /// Reports every problem at once rather than the first.
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut errors = Vec::new();
        let risk = &self.risk;

        if !(risk.high_volatility_pct > risk.elevated_volatility_pct
            && risk.elevated_volatility_pct > risk.moderate_volatility_pct)
        {
            errors.push("risk: volatility breakpoints must be strictly descending".to_string());
        }
        if risk.strong_cash_ratio_pct <= risk.partial_cash_ratio_pct {
            errors.push(
                "risk.strong_cash_ratio_pct: must exceed partial_cash_ratio_pct".to_string(),
            );
        }
        if !(risk.high_risk_threshold > risk.moderate_risk_threshold
            && risk.moderate_risk_threshold > risk.low_risk_threshold)
        {
            errors.push("risk: message thresholds must be strictly descending".to_string());
        }

        let scores = [
            ("risk.high_tier_score", risk.high_tier_score),
            ("risk.elevated_tier_score", risk.elevated_tier_score),
            ("risk.moderate_tier_score", risk.moderate_tier_score),
            ("risk.baseline_tier_score", risk.baseline_tier_score),
            ("risk.high_risk_threshold", risk.high_risk_threshold),
            ("risk.moderate_risk_threshold", risk.moderate_risk_threshold),
            ("risk.low_risk_threshold", risk.low_risk_threshold),
            ("ratchet.high_risk_threshold", self.ratchet.high_risk_threshold),
        ];
        for (name, value) in scores {
            if value < Decimal::ZERO || value > dec!(100) {
                errors.push(format!("{}: must be within [0, 100], got {}", name, value));
            }
        }

        let magnitudes = [
            ("risk.strong_cash_relief", risk.strong_cash_relief),
            ("risk.partial_cash_relief", risk.partial_cash_relief),
            ("risk.decline_penalty", risk.decline_penalty),
            ("ratchet.sustainability_discount", self.ratchet.sustainability_discount),
            ("ratchet.sustainability_penalty", self.ratchet.sustainability_penalty),
            ("ratchet.cov_lite_penalty", self.ratchet.cov_lite_penalty),
        ];
        for (name, value) in magnitudes {
            if value < Decimal::ZERO {
                errors.push(format!("{}: must be non-negative, got {}", name, value));
            }
        }

        if self.loan.max_leverage_ratio <= Decimal::ZERO {
            errors.push("loan.max_leverage_ratio: must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("invalid configuration:\n  {}", errors.join("\n  "))
        }
    }
}
