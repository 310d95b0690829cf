use clap::Parser;
use covenant_ratchet::agreement::{AuditLog, FileAuditLog};
use covenant_ratchet::cli::{Cli, Commands};
use covenant_ratchet::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).unwrap_or_default()
    });

    // Initialize telemetry
    covenant_ratchet::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Score(args) => args.execute(&config)?,
        Commands::Ratchet(args) => args.execute(&config)?,
        Commands::Calculate(args) => args.execute(&config)?,
        Commands::Audit => {
            let Some(path) = config.audit.path.as_ref() else {
                anyhow::bail!("No audit log configured; set [audit].path");
            };
            let log = FileAuditLog::open(path)?;
            println!("Audit chain ({} entries, {})", log.len(), path.display());
            for (i, hash) in log.entries().iter().enumerate() {
                println!("  {:>4}  {}", i + 1, hash);
            }
        }
        Commands::Config => {
            println!("Current configuration:");
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
