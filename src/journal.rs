//! Daily audit log.
//!
//! One file per local calendar day under the journal directory, named
//! `YYYY-MM-DD.txt`, each line `"<local timestamp> - <message>"`. This is
//! the user-facing record of what the updater did; `tracing` carries the
//! developer-facing telemetry separately.

use crate::error::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appender for the daily journal files.
#[derive(Debug, Clone)]
pub struct DailyJournal {
    dir: PathBuf,
}

impl DailyJournal {
    /// Create a journal writing into the given directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Append one timestamped line to today's file.
    pub fn log(&self, message: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let now = chrono::Local::now();
        let file_name = format!("{}.txt", now.format("%Y-%m-%d"));

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(file_name))?;

        writeln!(file, "{} - {}", now.format("%Y-%m-%d %H:%M:%S"), message)?;
        Ok(())
    }

    /// Like [`log`](Self::log), but failures are downgraded to a warning.
    ///
    /// The journal must never be the reason a pass aborts.
    pub fn log_best_effort(&self, message: &str) {
        if let Err(e) = self.log(message) {
            tracing::warn!("Failed to write journal entry: {}", e);
        }
    }
}
