//! # ddns-sync
//!
//! A dynamic DNS updater. It periodically discovers the machine's public
//! IPv4 address and, whenever it changes, rewrites every DNS record in the
//! configured Cloudflare zone that still carries the stale address.
//!
//! ## How a pass works
//!
//! 1. Re-read the JSON config (domain, credentials, interval)
//! 2. Fetch the current public IP and validate it
//! 3. Compare against the last committed IP; equal means no-op
//! 4. Resolve the zone, list its records, and select every record whose
//!    content matches the primary record's old IP
//! 5. Update the batch sequentially; persist the new IP only if every
//!    update succeeded
//!
//! ## Usage
//!
//! ```bash
//! # Write an example config
//! ddns-sync init
//!
//! # Run the daemon loop
//! ddns-sync run
//!
//! # Single pass (cron-friendly)
//! ddns-sync once
//!
//! # Check config and zone access
//! ddns-sync validate
//! ```

pub mod config;
pub mod detector;
pub mod error;
pub mod journal;
pub mod providers;
pub mod reconciler;
pub mod state;

pub use config::Config;
pub use detector::{IpDetector, IpOracle};
pub use error::{DdnsError, Result};
pub use journal::DailyJournal;
pub use reconciler::{Daemon, PassOutcome, Reconciler};
pub use state::SavedIpStore;
