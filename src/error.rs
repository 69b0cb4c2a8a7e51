//! Error types for ddns-sync.

use thiserror::Error;

/// Result type alias for ddns-sync.
pub type Result<T> = std::result::Result<T, DdnsError>;

/// DDNS error types.
///
/// Every expected failure mode of a reconciliation pass has its own
/// variant so callers can tell "skip this pass" conditions apart from
/// genuine faults.
#[derive(Error, Debug)]
pub enum DdnsError {
    /// Configuration error (missing file, missing or empty field).
    #[error("Configuration error: {0}")]
    Config(String),

    /// IP detection error.
    #[error("IP detection failed: {0}")]
    IpDetection(String),

    /// Zone lookup returned no match or a failure envelope.
    #[error("Zone resolution failed: {0}")]
    ZoneResolution(String),

    /// Record listing returned a failure envelope or malformed body.
    #[error("Record listing failed: {0}")]
    RecordListing(String),

    /// No record in the zone is named exactly like the configured domain.
    #[error("Primary record {0} not found in zone")]
    PrimaryRecordMissing(String),

    /// A single record update was rejected by the provider.
    #[error("Record update failed ({record}): {message}")]
    RecordUpdate { record: String, message: String },

    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for DdnsError {
    fn from(e: reqwest::Error) -> Self {
        DdnsError::Network(e.to_string())
    }
}
