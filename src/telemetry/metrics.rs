//! Metrics
//!
//! Recorded through the `metrics` facade; no-ops until a recorder is installed.

use rust_decimal::Decimal;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Successful ratchet executions
    RatchetsExecuted,
    /// Rate calculations that breached a covenant
    ComplianceBreaches,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Most recent ratcheted interest rate
    InterestRate,
    /// Most recent risk score
    RiskScore,
    /// Most recent EBITDA volatility
    Volatility,
    /// Most recent debt / EBITDA
    LeverageRatio,
}

impl CounterMetric {
    pub fn name(&self) -> &'static str {
        match self {
            CounterMetric::RatchetsExecuted => "covenant_ratchets_total",
            CounterMetric::ComplianceBreaches => "covenant_compliance_breaches_total",
        }
    }
}

impl GaugeMetric {
    pub fn name(&self) -> &'static str {
        match self {
            GaugeMetric::InterestRate => "covenant_interest_rate_pct",
            GaugeMetric::RiskScore => "covenant_risk_score",
            GaugeMetric::Volatility => "covenant_ebitda_volatility_pct",
            GaugeMetric::LeverageRatio => "covenant_leverage_ratio",
        }
    }
}

/// Increment a counter by one
pub fn increment_counter(metric: CounterMetric) {
    ::metrics::counter!(metric.name()).increment(1);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: Decimal) {
    let value: f64 = value.try_into().unwrap_or(0.0);
    tracing::trace!(metric = metric.name(), value, "Setting gauge");
    ::metrics::gauge!(metric.name()).set(value);
}
