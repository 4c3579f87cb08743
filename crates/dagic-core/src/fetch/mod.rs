//! HTTP download of ontology files.
//!
//! A plain GET with a configurable timeout and user agent. HTTP 429
//! responses are retried after a fixed delay, up to a configured limit.

mod error;

pub use error::FetchError;

use std::path::Path;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use tracing::{debug, info, warn};

use crate::config::FetchConfig;

/// HTTP client for graph downloads.
pub struct Fetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl Fetcher {
    /// Creates a fetcher from configuration.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Creates a fetcher around a prepared client. Only the retry settings
    /// are taken from `config`.
    pub fn with_client(client: Client, config: &FetchConfig) -> Self {
        Self {
            client,
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    /// Downloads `url` and returns the response body.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            debug!(url = %url, attempt = attempts, "GET");
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempts > self.max_retries {
                    return Err(FetchError::RateLimited { attempts });
                }
                warn!(
                    url = %url,
                    attempt = attempts,
                    delay_ms = self.retry_delay.as_millis() as u64,
                    "Rate limited; retrying"
                );
                tokio::time::sleep(self.retry_delay).await;
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.bytes().await?;
            info!(url = %url, bytes = body.len(), "Fetched");
            return Ok(body.to_vec());
        }
    }

    /// Downloads `url` into `path`, returning the byte count.
    pub async fn fetch_to_file(&self, url: &str, path: impl AsRef<Path>) -> Result<usize, FetchError> {
        let path = path.as_ref();
        let body = self.fetch(url).await?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| FetchError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }
        tokio::fs::write(path, &body).await.map_err(|e| FetchError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(body.len())
    }
}
