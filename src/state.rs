//! Saved-IP persistence.
//!
//! The store holds exactly one value: the last IP that was fully applied
//! to every targeted record. It is written only after a pass commits, so
//! a partial update failure leaves the old value in place and the next
//! pass retries the whole batch.

use crate::error::Result;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// File-backed store for the last committed IP.
///
/// The on-disk format is a single plain-text line. Writes go through a
/// temp-file-then-rename so the file can never be observed half-written.
#[derive(Debug, Clone)]
pub struct SavedIpStore {
    path: PathBuf,
}

impl SavedIpStore {
    /// Create a store backed by the given file path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the last committed IP.
    ///
    /// A missing file means no prior IP. A file whose content does not
    /// parse as an IP address is treated the same way, which forces a
    /// full sync on the next pass instead of failing forever.
    pub fn load(&self) -> Result<Option<IpAddr>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let trimmed = content.trim();

        match trimmed.parse() {
            Ok(ip) => Ok(Some(ip)),
            Err(_) => {
                tracing::warn!(
                    "Saved-IP file {} contains {:?}, ignoring",
                    self.path.display(),
                    trimmed
                );
                Ok(None)
            }
        }
    }

    /// Persist a newly committed IP atomically.
    pub fn save(&self, ip: IpAddr) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, ip.to_string())?;
        std::fs::rename(&temp_path, &self.path)?;

        tracing::debug!("Saved IP {} to {}", ip, self.path.display());
        Ok(())
    }
}
