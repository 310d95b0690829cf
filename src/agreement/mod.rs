//! Loan agreement module
//!
//! Rate ratchet rules, transaction hashing, and the append-only audit chain

mod audit;
mod hash;
mod ratchet;
mod types;

pub use audit::{AuditError, AuditLog, FileAuditLog, InMemoryAuditLog};
pub use hash::{canonical_json, is_audit_hash, sha256_hex, TransactionRecord};
pub use ratchet::RateAgreement;
pub use types::{
    Adjustment, EsgSnapshot, FinancialSnapshot, LoanTerms, RatchetError, RatchetResult,
};
