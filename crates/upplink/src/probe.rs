use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use crate::error::MonitorError;
use crate::validation::validate_probe_endpoint;

/// Captive-portal style endpoint that answers 204 with no body
pub const DEFAULT_ENDPOINT: &str = "https://clients3.google.com/generate_204";

/// Hard request timeout. Kept below any sane polling interval so a hung
/// probe cannot starve the next cycle.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(6);

/// Prober trait for reachability checks
///
/// A probe is advisory: implementations report `false` for any failure and
/// never surface transport errors to the caller. Probers must be safe to
/// call repeatedly, though the monitor loop only ever calls them serially.
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    /// Perform one bounded-timeout reachability check
    async fn probe(&self) -> bool;
}

/// HTTP reachability prober
///
/// Holds a single long-lived client so repeated probes reuse the connection
/// pool instead of paying connection setup per cycle.
pub struct HttpProber {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpProber {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, MonitorError> {
        validate_probe_endpoint(endpoint)
            .to_result()
            .map_err(|e| MonitorError::InvalidEndpoint(e.to_string()))?;
        let endpoint = Url::parse(endpoint)
            .map_err(|e| MonitorError::InvalidEndpoint(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MonitorError::ClientSetup(e.to_string()))?;

        Ok(Self { client, endpoint })
    }

    /// Prober against the default generate_204 endpoint
    pub fn with_defaults() -> Result<Self, MonitorError> {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_PROBE_TIMEOUT)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Prober for HttpProber {
    async fn probe(&self) -> bool {
        match self.client.get(self.endpoint.clone()).send().await {
            Ok(response) => {
                let status = response.status();
                // 2xx or an explicit 204 counts as reachable
                status.is_success() || status == StatusCode::NO_CONTENT
            }
            Err(e) => {
                // DNS, connect, TLS, timeout: all collapse to unreachable
                debug!(endpoint = %self.endpoint, error = %e, "probe failed");
                false
            }
        }
    }
}
