//! Canonical serialization and SHA-256 hashing of transaction records

use super::types::{EsgSnapshot, FinancialSnapshot};
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// The record whose hash anchors one rate decision
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord<'a> {
    pub new_rate: Decimal,
    pub date: String,
    pub reason: &'a str,
    pub financials: FinancialSnapshot,
    pub esg: EsgSnapshot,
    pub risk_score: Decimal,
}

impl<'a> TransactionRecord<'a> {
    /// Build a record with every decimal normalized so equal values
    /// serialize identically regardless of scale
    pub fn new(
        new_rate: Decimal,
        date: DateTime<Utc>,
        reason: &'a str,
        financials: &FinancialSnapshot,
        esg: &EsgSnapshot,
        risk_score: Decimal,
    ) -> Self {
        Self {
            new_rate: new_rate.normalize(),
            date: date.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            reason,
            financials: financials.normalized(),
            esg: esg.normalized(),
            risk_score: risk_score.normalize(),
        }
    }

    /// Lowercase hex SHA-256 of the canonical JSON form
    pub fn audit_hash(&self) -> Result<String, serde_json::Error> {
        let json = canonical_json(self)?;
        Ok(sha256_hex(json.as_bytes()))
    }
}

/// Compact JSON with object keys sorted at every depth
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let value = sort_keys(serde_json::to_value(value)?);
    serde_json::to_string(&value)
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, sort_keys(v))).collect();
            Value::Object(sorted.into_iter().collect::<Map<String, Value>>())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// True for a 64-char lowercase hex digest
pub fn is_audit_hash(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
