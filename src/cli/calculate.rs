//! Calculate command implementation

use super::{print_json, OutputFormat};
use crate::agreement::{EsgSnapshot, FinancialSnapshot};
use crate::config::Config;
use crate::engine::CovenantEngine;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct CalculateArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub ebitda: Decimal,

    #[arg(long, allow_hyphen_values = true)]
    pub debt: Decimal,

    #[arg(long)]
    pub revenue: Decimal,

    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub cash: Decimal,

    /// Carbon emissions (tons)
    #[arg(long, allow_hyphen_values = true)]
    pub carbon: Decimal,

    /// Diversity score, recorded but not used by the rules
    #[arg(long)]
    pub diversity: Option<Decimal>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl CalculateArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let engine = CovenantEngine::from_config(config.clone())?;
        let financials = FinancialSnapshot {
            ebitda: self.ebitda,
            debt: self.debt,
            revenue: self.revenue,
            cash_reserves: self.cash,
        };
        let esg = EsgSnapshot {
            carbon_emissions: self.carbon,
            diversity_score: self.diversity,
        };

        let calc = engine.calculate_rate(&financials, &esg)?;

        match self.format {
            OutputFormat::Json => print_json(&calc)?,
            OutputFormat::Table => {
                let b = &calc.breakdown;
                println!("Rate calculation");
                println!("  New interest rate:      {}%", calc.new_interest_rate);
                println!("  Base rate + margin:     {}% + {}%", b.base_rate, b.margin);
                println!("  Risk score:             {}", calc.risk_score);
                println!("  Volatility:             {}%", b.volatility);
                println!("  Probability of default: {}", b.probability_of_default);
                println!("  Leverage ratio:         {}x", b.leverage_ratio);
                println!("  Compliant:              {}", calc.is_compliant);
                println!("  Audit hash:             {}", calc.audit_hash);
                println!("  {}", calc.message);
            }
        }
        Ok(())
    }
}
