//! KeyVault Emulator - interactive host for the in-memory secrets client
//!
//! Seeds a secret store from configuration and then reads one command per
//! line from stdin, printing results as JSON.

mod config;
mod shell;

use clap::Parser;
use keyvault_secrets::SecretStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::shell::{Outcome, Shell};

#[derive(Parser, Debug)]
#[command(name = "keyvault-emulator")]
#[command(about = "In-memory Key Vault secrets emulator", long_about = None)]
struct Args {
    /// Configuration file (defaults to ./keyvault-emulator.toml if present)
    #[arg(short, long, env = "KEYVAULT_EMULATOR_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "KEYVAULT_EMULATOR_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = config::Config::load(args.config.as_deref())?;
    let log_level = args.log_level.unwrap_or(config.log_level);

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("keyvault_emulator={log_level},keyvault_secrets={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting KeyVault emulator...");
    info!("  Seed secrets: {}", config.secrets.len());

    let store = Arc::new(SecretStore::from_seeds(config.secrets));
    let shell = Shell::new(store);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        match shell.run_line(&line).await {
            Outcome::Output(text) if text.is_empty() => {}
            Outcome::Output(text) => {
                stdout.write_all(text.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            Outcome::Quit => break,
        }
    }

    info!("Shutting down");
    Ok(())
}
