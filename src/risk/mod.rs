//! Credit risk module
//!
//! Volatility of EBITDA, default-risk scoring, and risk bands

mod model;
mod types;
mod volatility;

pub use model::RiskModel;
pub use types::{RiskAssessment, RiskError, RiskLevel};
pub use volatility::coefficient_of_variation;

use rust_decimal::Decimal;

/// Minimum history length accepted by the validated entry points
pub const MIN_HISTORY_LEN: usize = 2;

/// Reject histories too short for a meaningful volatility
pub fn ensure_history(history: &[Decimal]) -> Result<(), RiskError> {
    if history.len() < MIN_HISTORY_LEN {
        return Err(RiskError::InsufficientHistory {
            required: MIN_HISTORY_LEN,
            actual: history.len(),
        });
    }
    Ok(())
}
