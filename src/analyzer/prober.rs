//! Link reachability probing
//!
//! The link counter only sees the [`LinkProber`] trait, so tests can inject
//! fakes and the HTTP transport stays swappable.

use async_trait::async_trait;
use reqwest::header::RANGE;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Checks whether one absolute URL currently answers successfully
///
/// Implementations must never fail: any transport problem is reported as
/// `false` (inaccessible).
#[async_trait]
pub trait LinkProber: Send + Sync {
    async fn is_accessible(&self, url: &str) -> bool;
}

/// Probes links over HTTP
///
/// Sends a HEAD request first. When the server refuses HEAD (405 or 501) or
/// the request fails outright, falls back to a GET asking for a single byte.
/// Any 2xx or 3xx final status counts as accessible.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    timeout: Duration,
}

impl HttpProber {
    /// Creates a prober sharing an existing client
    ///
    /// `timeout` bounds each individual request.
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl LinkProber for HttpProber {
    async fn is_accessible(&self, url: &str) -> bool {
        match self.client.head(url).timeout(self.timeout).send().await {
            Ok(response) => {
                let status = response.status();
                if is_reachable_status(status) {
                    return true;
                }
                if status != StatusCode::METHOD_NOT_ALLOWED && status != StatusCode::NOT_IMPLEMENTED
                {
                    tracing::debug!(url, status = status.as_u16(), "probe.head.failed");
                    return false;
                }
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "probe.head.error");
            }
        }

        match self
            .client
            .get(url)
            .header(RANGE, "bytes=0-0")
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                if !is_reachable_status(status) {
                    tracing::debug!(url, status = status.as_u16(), "probe.get.failed");
                }
                is_reachable_status(status)
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "probe.get.error");
                false
            }
        }
    }
}

fn is_reachable_status(status: StatusCode) -> bool {
    status.is_success() || status.is_redirection()
}
