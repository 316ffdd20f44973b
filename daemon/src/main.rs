//! dvault: replay voting-vault scenarios and inspect the resulting state.

mod runner;
mod scenario;

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;
use dvault_crypto::{decode_address, encode_address, identity_from_label};
use dvault_utils::{format_until, LogFormat};
use dvault_vault::EngineConfig;

use crate::runner::Runner;
use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "dvault", about = "Token-weighted voting vault engine")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "DVAULT_LOG_LEVEL")]
    log_level: String,

    /// Log output format: "human" or "json".
    #[arg(long, default_value = "human", env = "DVAULT_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Replay a scenario file and print the final state as JSON.
    Run {
        /// Path to the scenario TOML file.
        #[arg(long)]
        scenario: PathBuf,

        /// Path to an engine configuration TOML file. Overrides the
        /// scenario's own `[config]` table.
        #[arg(long, env = "DVAULT_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Print the default engine configuration as TOML.
    DefaultConfig,
    /// Print the identity a label maps to in scenarios.
    Address {
        label: String,

        /// Treat the argument as a `dv_` address and print its raw hex form.
        #[arg(long)]
        decode: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dvault_utils::init_logging(cli.log_format, &cli.log_level);

    match cli.command {
        Command::Run { scenario, config } => {
            let parsed = Scenario::from_toml_file(&scenario)?;
            let config = match config {
                Some(path) => {
                    let cfg = EngineConfig::from_toml_file(&path)
                        .with_context(|| format!("loading config {}", path.display()))?;
                    tracing::info!("Loaded config from {}", path.display());
                    cfg
                }
                None => parsed.config.clone().unwrap_or_default(),
            };

            tracing::info!(
                scenario = %scenario.display(),
                steps = parsed.steps.len(),
                "replaying scenario"
            );
            let mut runner = Runner::new(config);
            let outcomes = runner.run(&parsed)?;
            for outcome in &outcomes {
                match &outcome.error {
                    None => println!(
                        "step {:>3} @{:<6} {:<18} {:<10} ok",
                        outcome.index, outcome.at, outcome.op, outcome.caller
                    ),
                    Some(kind) => println!(
                        "step {:>3} @{:<6} {:<18} {:<10} {kind} (expected)",
                        outcome.index, outcome.at, outcome.op, outcome.caller
                    ),
                }
            }
            let now = runner.now();
            for vault in runner.engine().vaults() {
                tracing::info!(
                    vault_id = vault.vault_id,
                    voting = %format_until(vault.deadline, now),
                    claims = %vault
                        .conversion_time
                        .map(|t| format_until(t, now))
                        .unwrap_or_else(|| "not scheduled".into()),
                    "vault status"
                );
            }
            let report = serde_json::to_string_pretty(&runner.report())?;
            println!("{report}");
        }
        Command::DefaultConfig => {
            print!("{}", EngineConfig::default().to_toml_string()?);
        }
        Command::Address { label, decode: false } => {
            println!("{}", encode_address(&identity_from_label(&label)));
        }
        Command::Address { label, decode: true } => {
            let address = decode_address(&label)
                .ok_or_else(|| anyhow!("'{label}' is not a valid dvault address"))?;
            println!("{address}");
        }
    }
    Ok(())
}
