//! Score command implementation

use super::{print_json, OutputFormat};
use crate::config::Config;
use crate::engine::CovenantEngine;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Historical EBITDA values, oldest first (comma separated)
    #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
    pub history: Vec<Decimal>,

    /// Current-period EBITDA (defaults to the last history value)
    #[arg(long, allow_hyphen_values = true)]
    pub current: Option<Decimal>,

    /// Cash reserves
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub cash: Decimal,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl ScoreArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let engine = CovenantEngine::new(config.clone());
        let current = match self.current {
            Some(current) => current,
            None => *self
                .history
                .last()
                .ok_or_else(|| anyhow::anyhow!("--history must not be empty"))?,
        };

        tracing::info!(points = self.history.len(), %current, "Scoring default risk");
        let result = engine.score_risk(&self.history, current, self.cash)?;

        match self.format {
            OutputFormat::Json => print_json(&result)?,
            OutputFormat::Table => {
                println!("Risk assessment");
                println!("  Risk score:             {}", result.risk_score);
                println!("  Volatility:             {}%", result.volatility);
                println!("  Probability of default: {}", result.probability_of_default);
                println!("  {}", result.message);
            }
        }
        Ok(())
    }
}
