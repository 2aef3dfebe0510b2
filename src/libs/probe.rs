//! Reachability probe for update sources.
//!
//! Before the update flow commits to anything, it asks one question: is the
//! update source currently usable? The answer is always a plain boolean:
//! every timeout, transport error, or unexpected status resolves to `false`,
//! and the failure reason goes to the tracing log rather than to the caller.
//!
//! HTTP sources are probed with a HEAD request first, the cheapest check
//! available. Servers that reject HEAD specifically (405 Method Not Allowed)
//! get a second chance with a zero-byte ranged GET. Filesystem sources
//! (network shares) use a bounded-time existence-and-open check instead,
//! racing the blocking filesystem call against a timer.

use reqwest::header::RANGE;
use reqwest::{Client, StatusCode};
use std::path::Path;
use std::time::Duration;

/// Probes whether an update source is currently reachable.
#[derive(Debug, Clone)]
pub struct Probe {
    client: Client,
}

impl Probe {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }

    /// Checks an HTTP(S) endpoint without performing a full transfer.
    ///
    /// Returns `true` for any successful status on HEAD, and for a
    /// successful or partial-content status on the ranged GET fallback when
    /// the server answered the HEAD with 405. Everything else, including
    /// timeouts and transport errors, is `false`.
    pub async fn http_reachable(&self, url: &str, timeout: Duration) -> bool {
        match self.client.head(url).timeout(timeout).send().await {
            Ok(response) if response.status() == StatusCode::METHOD_NOT_ALLOWED => self.ranged_get_reachable(url, timeout).await,
            Ok(response) => {
                let reachable = response.status().is_success();
                if !reachable {
                    tracing::debug!(url, status = %response.status(), "update source HEAD probe rejected");
                }
                reachable
            }
            Err(error) => {
                tracing::debug!(url, %error, "update source HEAD probe failed");
                false
            }
        }
    }

    /// Fallback for servers that reject HEAD: request zero bytes via a
    /// ranged GET and accept both plain success and 206 Partial Content.
    async fn ranged_get_reachable(&self, url: &str, timeout: Duration) -> bool {
        match self.client.get(url).header(RANGE, "bytes=0-0").timeout(timeout).send().await {
            Ok(response) => {
                let status = response.status();
                let reachable = status.is_success() || status == StatusCode::PARTIAL_CONTENT;
                if !reachable {
                    tracing::debug!(url, %status, "update source ranged GET probe rejected");
                }
                reachable
            }
            Err(error) => {
                tracing::debug!(url, %error, "update source ranged GET probe failed");
                false
            }
        }
    }

    /// Checks a filesystem-path-style update source (e.g. a network share)
    /// with a bounded-time existence-and-open check.
    ///
    /// The blocking open runs on a worker thread and races the timeout;
    /// "did not finish in time" counts as unreachable, never as "unknown".
    pub async fn path_reachable(path: &Path, timeout: Duration) -> bool {
        let target = path.to_path_buf();
        let check = tokio::task::spawn_blocking(move || std::fs::File::open(&target).is_ok());

        match tokio::time::timeout(timeout, check).await {
            Ok(Ok(reachable)) => {
                if !reachable {
                    tracing::debug!(path = %path.display(), "update source path probe failed to open");
                }
                reachable
            }
            Ok(Err(error)) => {
                tracing::debug!(path = %path.display(), %error, "update source path probe panicked");
                false
            }
            Err(_) => {
                tracing::debug!(path = %path.display(), "update source path probe timed out");
                false
            }
        }
    }
}

impl Default for Probe {
    fn default() -> Self {
        Self::new()
    }
}
