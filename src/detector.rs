//! Public IP detection.

use crate::error::{DdnsError, Result};
use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;

/// Source of the caller's current public IP address.
///
/// The reconciler only depends on this seam, so tests can drive a pass
/// without any network access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IpOracle: Send + Sync {
    /// Return the current public IPv4 address.
    async fn current_ip(&self) -> Result<IpAddr>;
}

/// IP detector with multiple fallback services.
pub struct IpDetector {
    client: reqwest::Client,
    services: Vec<String>,
}

impl IpDetector {
    /// Create a new IP detector with default services.
    pub fn new() -> Self {
        Self::with_services(vec![
            "https://api.ipify.org".to_string(),
            "https://icanhazip.com".to_string(),
            "https://ifconfig.me/ip".to_string(),
            "https://ipecho.net/plain".to_string(),
        ])
    }

    /// Create a new IP detector with custom services.
    pub fn with_services(services: Vec<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, services }
    }

    /// Detect the public IPv4 address, trying each service in order.
    pub async fn detect_ipv4(&self) -> Result<IpAddr> {
        for service in &self.services {
            match self.try_service(service).await {
                Ok(ip) => {
                    if ip.is_ipv4() {
                        tracing::debug!("Detected IPv4 {} from {}", ip, service);
                        return Ok(ip);
                    }
                    tracing::warn!("Service {} returned non-IPv4 address {}", service, ip);
                }
                Err(e) => {
                    tracing::warn!("Service {} failed: {}", service, e);
                }
            }
        }

        Err(DdnsError::IpDetection(
            "All IP detection services failed".to_string(),
        ))
    }

    /// Try a single IP detection service.
    ///
    /// An empty body or anything that does not parse as an IP address is
    /// an error; the discovered value must never reach the provider
    /// unvalidated.
    async fn try_service(&self, url: &str) -> Result<IpAddr> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(DdnsError::IpDetection(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let text = response.text().await?;
        let ip_str = text.trim();

        ip_str
            .parse()
            .map_err(|_| DdnsError::IpDetection(format!("Invalid IP response: {:?}", ip_str)))
    }
}

#[async_trait]
impl IpOracle for IpDetector {
    async fn current_ip(&self) -> Result<IpAddr> {
        self.detect_ipv4().await
    }
}

impl Default for IpDetector {
    fn default() -> Self {
        Self::new()
    }
}
