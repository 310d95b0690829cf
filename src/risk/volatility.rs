//! Volatility estimation
//!
//! Coefficient of variation of an EBITDA series

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Sample standard deviation over |mean|, as a percentage rounded to 2 dp.
///
/// Returns zero for fewer than two observations, a zero mean, or a
/// constant series.
pub fn coefficient_of_variation(history: &[Decimal]) -> Decimal {
    if history.len() < 2 {
        return Decimal::ZERO;
    }

    // Exact check so float noise can't produce a tiny non-zero value
    if history.iter().all(|v| *v == history[0]) {
        return Decimal::ZERO;
    }

    let values: Vec<f64> = history
        .iter()
        .map(|v| f64::try_from(*v).unwrap_or(0.0))
        .collect();
    let n = history.len() as f64;

    // Exact Decimal mean when the sum fits, f64 otherwise
    let mean_f = match history
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
    {
        Some(sum) => {
            let mean = sum / Decimal::from(history.len());
            if mean.is_zero() {
                return Decimal::ZERO;
            }
            f64::try_from(mean).unwrap_or(0.0)
        }
        None => values.iter().sum::<f64>() / n,
    };
    if mean_f == 0.0 {
        return Decimal::ZERO;
    }

    let sum_sq: f64 = values.iter().map(|x| (x - mean_f).powi(2)).sum();
    let std_dev = (sum_sq / (n - 1.0)).sqrt();

    let pct = std_dev / mean_f.abs() * 100.0;
    Decimal::try_from(pct)
        .map(|v| v.round_dp(2))
        .unwrap_or(Decimal::MAX)
        .max(dec!(0))
}
