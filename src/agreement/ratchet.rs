//! Margin ratchet
//!
//! Applies the sustainability and cov-lite rules to the contractual rate
//! and anchors each decision in the audit chain.

use super::audit::{AuditLog, InMemoryAuditLog};
use super::hash::TransactionRecord;
use super::types::{Adjustment, EsgSnapshot, FinancialSnapshot, LoanTerms, RatchetError, RatchetResult};
use crate::config::RatchetConfig;
use crate::telemetry::{increment_counter, set_gauge, CounterMetric, GaugeMetric};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// A loan agreement that owns its audit chain
pub struct RateAgreement {
    id: Uuid,
    terms: LoanTerms,
    config: RatchetConfig,
    audit_log: Box<dyn AuditLog>,
}

impl RateAgreement {
    /// Create an agreement with an in-memory audit chain
    pub fn new(terms: LoanTerms, config: RatchetConfig) -> Self {
        Self::with_audit_log(terms, config, Box::new(InMemoryAuditLog::new()))
    }

    /// Create an agreement backed by the given audit log
    pub fn with_audit_log(
        terms: LoanTerms,
        config: RatchetConfig,
        audit_log: Box<dyn AuditLog>,
    ) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(
            agreement_id = %id,
            base_rate = %terms.base_rate,
            margin = %terms.margin,
            esg_target = %terms.esg_target,
            "Rate agreement created"
        );
        Self {
            id,
            terms,
            config,
            audit_log,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    /// Run the ratchet stamped with the current time
    pub fn execute_ratchet(
        &self,
        financials: &FinancialSnapshot,
        esg: &EsgSnapshot,
        risk_score: Decimal,
    ) -> Result<RatchetResult, RatchetError> {
        self.execute_ratchet_at(financials, esg, risk_score, Utc::now())
    }

    /// Run the ratchet stamped with `at`.
    ///
    /// Identical inputs at the same timestamp always produce the same hash.
    pub fn execute_ratchet_at(
        &self,
        financials: &FinancialSnapshot,
        esg: &EsgSnapshot,
        risk_score: Decimal,
        at: DateTime<Utc>,
    ) -> Result<RatchetResult, RatchetError> {
        if esg.carbon_emissions < Decimal::ZERO {
            return Err(RatchetError::NegativeEmissions(esg.carbon_emissions));
        }
        if risk_score < Decimal::ZERO || risk_score > dec!(100) {
            return Err(RatchetError::RiskScoreOutOfRange(risk_score));
        }

        let adjustments = self.adjustments(esg, risk_score);
        let new_rate = adjustments
            .iter()
            .fold(self.terms.starting_rate(), |rate, adj| rate + adj.delta())
            .round_dp(2);
        let reason = adjustments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");

        let record = TransactionRecord::new(new_rate, at, &reason, financials, esg, risk_score);
        let audit_hash = record.audit_hash()?;
        self.audit_log.append(&audit_hash)?;

        tracing::info!(
            agreement_id = %self.id,
            %new_rate,
            %risk_score,
            audit_hash = %audit_hash,
            chain_len = self.audit_log.len(),
            "Rate ratchet executed"
        );
        increment_counter(CounterMetric::RatchetsExecuted);
        set_gauge(GaugeMetric::InterestRate, new_rate);

        Ok(RatchetResult {
            new_rate,
            reason,
            date: at,
            audit_hash,
            adjustments,
        })
    }

    /// Snapshot of the audit chain, oldest first
    pub fn get_audit_chain(&self) -> Vec<String> {
        self.audit_log.entries()
    }

    fn adjustments(&self, esg: &EsgSnapshot, risk_score: Decimal) -> Vec<Adjustment> {
        let mut adjustments = Vec::with_capacity(2);

        if esg.carbon_emissions < self.terms.esg_target {
            adjustments.push(Adjustment::SustainabilityDiscount(
                self.config.sustainability_discount,
            ));
        } else {
            adjustments.push(Adjustment::SustainabilityPenalty(
                self.config.sustainability_penalty,
            ));
        }

        if risk_score > self.config.high_risk_threshold {
            adjustments.push(Adjustment::CovLiteBreach(self.config.cov_lite_penalty));
        }

        adjustments
    }
}

impl std::fmt::Debug for RateAgreement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateAgreement")
            .field("id", &self.id)
            .field("terms", &self.terms)
            .field("config", &self.config)
            .field("chain_len", &self.audit_log.len())
            .finish()
    }
}
