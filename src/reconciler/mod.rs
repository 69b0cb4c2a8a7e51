//! The reconciliation loop.
//!
//! One pass: read the config, fetch the current public IP, compare it to
//! the last committed IP, and if it changed, push the new value to every
//! record in the zone still carrying the old one. The saved IP advances
//! only when the whole batch succeeded, so a partial failure is retried
//! in full on the next tick.


use crate::config::Config;
use crate::detector::IpOracle;
use crate::error::{DdnsError, Result};
use crate::journal::DailyJournal;
use crate::providers::{CloudflareProvider, DnsProvider, DnsRecord};
use crate::state::SavedIpStore;
use std::future::Future;
use std::net::IpAddr;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

/// Interval used until a config file with one has been loaded.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(600_000);

/// How a completed pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// Current IP equals the saved IP; nothing was contacted.
    Unchanged { ip: IpAddr },

    /// Every targeted record now carries the new IP and it was persisted.
    Committed { ip: IpAddr, updated: usize },

    /// At least one record update failed; the saved IP was left stale so
    /// the next tick reattempts the full pass.
    RetryPending {
        ip: IpAddr,
        updated: usize,
        failed: usize,
    },
}

/// Executes reconciliation passes.
///
/// Holds the collaborators that outlive a single pass; the config and the
/// provider are constructed fresh for each pass and passed in, never kept
/// as ambient state.
pub struct Reconciler {
    oracle: Box<dyn IpOracle>,
    state: SavedIpStore,
    journal: DailyJournal,
}

impl Reconciler {
    /// Create a new reconciler.
    pub fn new(oracle: Box<dyn IpOracle>, state: SavedIpStore, journal: DailyJournal) -> Self {
        Self {
            oracle,
            state,
            journal,
        }
    }

    /// Run a single reconciliation pass.
    ///
    /// Returns the outcome for an expected ending; any `Err` aborts the
    /// pass with no partial state write and is retried whole on the next
    /// tick.
    pub async fn run_pass(
        &self,
        config: &Config,
        provider: &dyn DnsProvider,
    ) -> Result<PassOutcome> {
        let current_ip = self.oracle.current_ip().await?;
        self.journal
            .log_best_effort(&format!("Current IP: {}", current_ip));

        let saved_ip = self.state.load()?;
        if saved_ip == Some(current_ip) {
            self.journal.log_best_effort("Nothing to do");
            return Ok(PassOutcome::Unchanged { ip: current_ip });
        }

        if let Some(saved) = saved_ip {
            tracing::info!("IP changed: {} -> {}", saved, current_ip);
        } else {
            tracing::info!("No saved IP, forcing first-time sync to {}", current_ip);
        }

        let zone = provider.resolve_zone(&config.domain).await?;
        let records = provider.list_records(&zone.id).await?;
        let targets = select_targets(&records, &config.domain)?;

        let mut updated = 0;
        let mut failed = 0;

        for record in targets {
            self.journal.log_best_effort(&format!(
                "Updating record {} from {} to {}",
                record.name, record.content, current_ip
            ));

            match provider.update_record(&zone.id, record, current_ip).await {
                Ok(()) => updated += 1,
                Err(e) => {
                    failed += 1;
                    tracing::error!("Update failed for {}: {}", record.name, e);
                    self.journal
                        .log_best_effort(&format!("Update failed for {}: {}", record.name, e));
                }
            }
        }

        if failed > 0 {
            self.journal.log_best_effort(&format!(
                "{} of {} updates failed, will retry on the next pass",
                failed,
                updated + failed
            ));
            return Ok(PassOutcome::RetryPending {
                ip: current_ip,
                updated,
                failed,
            });
        }

        self.state.save(current_ip)?;
        self.journal
            .log_best_effort(&format!("Update completed, saved IP {}", current_ip));

        Ok(PassOutcome::Committed {
            ip: current_ip,
            updated,
        })
    }
}

/// Select the records to update.
///
/// The record named exactly like the domain is the primary; its current
/// content is the old IP. The batch is every record (primary included)
/// whose content equals that old IP, so apex and subdomains sharing the
/// stale address are rewritten together.
fn select_targets<'a>(records: &'a [DnsRecord], domain: &str) -> Result<Vec<&'a DnsRecord>> {
    let primary = records
        .iter()
        .find(|r| r.name == domain)
        .ok_or_else(|| DdnsError::PrimaryRecordMissing(domain.to_string()))?;

    let old_ip = primary.content.as_str();
    Ok(records.iter().filter(|r| r.content == old_ip).collect())
}

/// Fixed-interval scheduler around the reconciler.
///
/// Runs one pass to completion, sleeps for the configured interval, and
/// repeats. Passes never overlap. A pass error never kills the loop; it
/// is logged and the same full pass is reattempted on the next tick.
pub struct Daemon {
    reconciler: Reconciler,
    config_path: PathBuf,
    api_base_url: Option<String>,
}

impl Daemon {
    /// Create a daemon reading its config from the given path on every tick.
    pub fn new(reconciler: Reconciler, config_path: PathBuf) -> Self {
        Self {
            reconciler,
            config_path,
            api_base_url: None,
        }
    }

    /// Override the provider API base URL (for testing).
    pub fn with_api_base_url(mut self, base_url: String) -> Self {
        self.api_base_url = Some(base_url);
        self
    }

    /// Run until SIGINT.
    pub async fn run(&self) -> Result<()> {
        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        self.run_until(Box::pin(shutdown)).await
    }

    /// Run until the given shutdown signal resolves.
    ///
    /// The signal is only polled between passes, so a pass in flight runs
    /// to completion before the loop exits.
    pub async fn run_until(
        &self,
        mut shutdown: Pin<Box<dyn Future<Output = ()> + Send>>,
    ) -> Result<()> {
        let mut interval = DEFAULT_INTERVAL;

        loop {
            self.tick(&mut interval).await;

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received");
                    self.reconciler
                        .journal
                        .log_best_effort("Shutting down");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Execute one scheduled pass, absorbing every error.
    async fn tick(&self, interval: &mut Duration) {
        let journal = &self.reconciler.journal;
        journal.log_best_effort("Pass started");

        let config = match Config::load_from(&self.config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}", e);
                journal.log_best_effort(&format!("Skipping pass: {}", e));
                return;
            }
        };

        // The interval survives a later loss of the config file.
        *interval = config.interval();

        let provider = match &self.api_base_url {
            Some(base_url) => CloudflareProvider::with_base_url(
                config.email.clone(),
                config.key.clone(),
                base_url.clone(),
            ),
            None => CloudflareProvider::new(config.email.clone(), config.key.clone()),
        };

        match self.reconciler.run_pass(&config, &provider).await {
            Ok(outcome) => {
                tracing::debug!("Pass finished: {:?}", outcome);
            }
            Err(e) => {
                tracing::error!("Pass aborted: {}", e);
                journal.log_best_effort(&format!("Pass aborted: {}", e));
            }
        }
    }
}
