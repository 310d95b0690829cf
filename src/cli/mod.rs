//! CLI interface for covenant-ratchet
//!
//! Provides subcommands for:
//! - `score`: Score default risk from an EBITDA history
//! - `ratchet`: Apply the rate ratchet for a given risk score
//! - `calculate`: Full score, ratchet and covenant check for the configured loan
//! - `audit`: Show the persisted audit chain
//! - `config`: Show the effective configuration

mod calculate;
mod ratchet;
mod score;

pub use calculate::CalculateArgs;
pub use ratchet::RatchetArgs;
pub use score::ScoreArgs;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "covenant-ratchet")]
#[command(about = "Credit-risk scoring and sustainability-linked rate ratchet")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score default risk from an EBITDA history
    Score(ScoreArgs),
    /// Apply the rate ratchet for a given risk score
    Ratchet(RatchetArgs),
    /// Score, ratchet and check covenants for the configured loan
    Calculate(CalculateArgs),
    /// Show the persisted audit chain
    Audit,
    /// Show the effective configuration
    Config,
}

/// Output format for command results
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Print `value` as pretty JSON
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
