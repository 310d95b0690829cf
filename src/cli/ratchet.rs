//! Ratchet command implementation

use super::{print_json, OutputFormat};
use crate::agreement::{EsgSnapshot, FinancialSnapshot, LoanTerms};
use crate::config::Config;
use crate::engine;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct RatchetArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub ebitda: Decimal,

    #[arg(long, allow_hyphen_values = true)]
    pub debt: Decimal,

    #[arg(long)]
    pub revenue: Decimal,

    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub cash: Decimal,

    /// Carbon emissions (tons); omitted means zero
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub carbon: Decimal,

    /// Risk score on the 0-100 scale
    #[arg(long)]
    pub risk_score: Decimal,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl RatchetArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let financials = FinancialSnapshot {
            ebitda: self.ebitda,
            debt: self.debt,
            revenue: self.revenue,
            cash_reserves: self.cash,
        };
        let esg = EsgSnapshot::new(self.carbon);

        let result = engine::ratchet(
            LoanTerms::from(&config.loan),
            &config.ratchet,
            &financials,
            &esg,
            self.risk_score,
        )?;

        match self.format {
            OutputFormat::Json => print_json(&result)?,
            OutputFormat::Table => {
                println!("Rate ratchet");
                println!("  New rate:   {}%", result.new_rate);
                println!("  Date:       {}", result.date.to_rfc3339());
                println!("  Audit hash: {}", result.audit_hash);
                for adjustment in &result.adjustments {
                    println!("  - {}", adjustment);
                }
            }
        }
        Ok(())
    }
}
