//! DNS provider implementations.

mod cloudflare;
#[cfg(test)]
mod tests;

pub use cloudflare::CloudflareProvider;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A DNS zone, resolved from a domain name once per pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Zone {
    /// Provider-assigned opaque zone id.
    pub id: String,
}

/// A DNS record within a zone.
///
/// Only the fields the reconciler inspects are named; everything else the
/// provider returned is kept verbatim in `extra` so an update can send the
/// full record body back with nothing but `content` changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned opaque record id.
    pub id: String,
    /// Record name (e.g. "vpn.example.com").
    pub name: String,
    /// Record content; for A records, the IPv4 address as a string.
    pub content: String,
    /// All remaining provider fields, preserved untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DnsRecord {
    /// Copy of this record with `content` replaced by the given IP.
    pub fn with_content(&self, ip: IpAddr) -> Self {
        let mut updated = self.clone();
        updated.content = ip.to_string();
        updated
    }
}

/// Trait for DNS providers.
///
/// One method per remote call the reconciler makes; decisions about what
/// to update and when belong to the reconciler, never to implementations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Resolve the zone whose name equals `domain`.
    async fn resolve_zone(&self, domain: &str) -> Result<Zone>;

    /// List all DNS records in a zone.
    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>>;

    /// Replace a record's content with the new IP, leaving every other
    /// field of the record unchanged.
    async fn update_record(&self, zone_id: &str, record: &DnsRecord, new_ip: IpAddr) -> Result<()>;
}
