//! ddns-sync - keep DNS records pointed at your current public IP.

use anyhow::Context;
use clap::{Parser, Subcommand};
use ddns_sync::config::Config;
use ddns_sync::detector::IpDetector;
use ddns_sync::journal::DailyJournal;
use ddns_sync::providers::{CloudflareProvider, DnsProvider};
use ddns_sync::reconciler::{Daemon, PassOutcome, Reconciler};
use ddns_sync::state::SavedIpStore;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ddns-sync")]
#[command(about = "Dynamic DNS updater for Cloudflare-managed zones")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the saved-IP file and the daily logs
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write an example config file to get started
    Init,

    /// Run the reconciliation loop until interrupted
    Run,

    /// Run a single reconciliation pass and exit
    Once,

    /// Check the config and zone access, then exit
    Validate,
}

fn config_path(cli_path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli_path {
        return Ok(path);
    }
    Ok(Config::default_path()?)
}

fn data_dir(cli_dir: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(dir) = cli_dir {
        return Ok(dir);
    }

    dirs::data_dir()
        .map(|p| p.join("ddns-sync"))
        .context("Could not find data directory")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ddns_sync=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config_path = config_path(cli.config)?;
    let data_dir = data_dir(cli.data_dir)?;

    let reconciler = Reconciler::new(
        Box::new(IpDetector::new()),
        SavedIpStore::new(data_dir.join("saved-ip")),
        DailyJournal::new(data_dir.join("logs")),
    );

    match cli.command {
        Commands::Init => {
            if config_path.exists() {
                println!("Config already exists at {}", config_path.display());
                std::process::exit(1);
            }
            Config::example().save_to(&config_path)?;
            println!("Wrote example config to {}", config_path.display());
            println!("Edit it with your domain and credentials before running.");
        }
        Commands::Run => {
            tracing::info!(
                "Starting daemon (config: {}, data: {})",
                config_path.display(),
                data_dir.display()
            );
            let daemon = Daemon::new(reconciler, config_path);
            daemon.run().await?;
        }
        Commands::Once => {
            let config = Config::load_from(&config_path)?;
            let provider = CloudflareProvider::new(config.email.clone(), config.key.clone());

            match reconciler.run_pass(&config, &provider).await? {
                PassOutcome::Unchanged { ip } => {
                    println!("No change, current IP is {}", ip);
                }
                PassOutcome::Committed { ip, updated } => {
                    println!("Updated {} record(s) to {}", updated, ip);
                }
                PassOutcome::RetryPending { ip, updated, failed } => {
                    println!(
                        "Partial failure: {} updated, {} failed for {} (will retry next pass)",
                        updated, failed, ip
                    );
                    std::process::exit(1);
                }
            }
        }
        Commands::Validate => {
            let config = Config::load_from(&config_path)?;
            let provider = CloudflareProvider::new(config.email.clone(), config.key.clone());

            print!("Zone {}: ", config.domain);
            let zone = provider.resolve_zone(&config.domain).await?;
            println!("OK ({})", zone.id);

            print!("Primary record {}: ", config.domain);
            let records = provider.list_records(&zone.id).await?;
            match records.iter().find(|r| r.name == config.domain) {
                Some(record) => println!("OK (currently {})", record.content),
                None => {
                    println!("MISSING");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
