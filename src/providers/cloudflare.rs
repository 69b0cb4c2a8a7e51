//! Cloudflare v4 API provider.

use super::{DnsProvider, DnsRecord, Zone};
use crate::error::{DdnsError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com";

/// Cloudflare DNS provider, authenticated with the legacy
/// email + global API key header pair.
pub struct CloudflareProvider {
    client: reqwest::Client,
    email: String,
    key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CloudflareResponse<T> {
    success: bool,
    result: Option<T>,
    #[serde(default)]
    errors: Vec<CloudflareError>,
}

#[derive(Debug, Deserialize)]
struct CloudflareError {
    message: String,
}

impl<T> CloudflareResponse<T> {
    fn first_error(&self) -> String {
        self.errors
            .first()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider.
    pub fn new(email: String, key: String) -> Self {
        Self::with_base_url(email, key, DEFAULT_BASE_URL.to_string())
    }

    /// Create with custom base URL (for testing).
    pub fn with_base_url(email: String, key: String, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            email,
            key,
            base_url,
        }
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("X-Auth-Email", &self.email)
            .header("X-Auth-Key", &self.key)
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    async fn resolve_zone(&self, domain: &str) -> Result<Zone> {
        let url = format!("{}/client/v4/zones", self.base_url);

        let response: CloudflareResponse<Vec<Zone>> = self
            .authed(self.client.get(&url).query(&[("name", domain)]))
            .send()
            .await?
            .json()
            .await?;

        if !response.success {
            return Err(DdnsError::ZoneResolution(response.first_error()));
        }

        response
            .result
            .and_then(|zones| zones.into_iter().next())
            .ok_or_else(|| DdnsError::ZoneResolution(format!("No zone matching {}", domain)))
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        let url = format!("{}/client/v4/zones/{}/dns_records", self.base_url, zone_id);

        let response: CloudflareResponse<Vec<DnsRecord>> =
            self.authed(self.client.get(&url)).send().await?.json().await?;

        if !response.success {
            return Err(DdnsError::RecordListing(response.first_error()));
        }

        Ok(response.result.unwrap_or_default())
    }

    async fn update_record(&self, zone_id: &str, record: &DnsRecord, new_ip: IpAddr) -> Result<()> {
        let url = format!(
            "{}/client/v4/zones/{}/dns_records/{}",
            self.base_url, zone_id, record.id
        );

        // Full record body, content swapped, everything else as returned
        // by the listing call.
        let body = record.with_content(new_ip);

        let response = self.authed(self.client.put(&url)).json(&body).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::OK {
            tracing::debug!("Updated record {} to {}", record.name, new_ip);
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        Err(DdnsError::RecordUpdate {
            record: record.name.clone(),
            message: format!("HTTP {}: {}", status, detail),
        })
    }
}
