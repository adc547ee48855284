//! HTTP client for published record sheets.
//!
//! Each discipline's sheet is published as a CSV export at its own URL.
//! Requests carry a cache-busting query parameter so intermediaries never
//! hand back a stale export.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tracing::{debug, warn};

use super::FetchError;
use crate::config::SourceUrls;
use crate::models::Discipline;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Where raw sheet documents come from.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the full CSV text for a discipline.
    async fn fetch_document(&self, discipline: Discipline) -> Result<String, FetchError>;
}

/// Downloads sheet exports over HTTP.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct SheetClient {
    client: Client,
    sources: SourceUrls,
}

impl SheetClient {
    pub fn new(sources: SourceUrls) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, sources })
    }

    /// Append a `v=<millis>` parameter so every request bypasses caches.
    fn cache_busted(url: &str, millis: i64) -> String {
        let separator = if url.contains('?') { '&' } else { '?' };
        format!("{}{}v={}", url, separator, millis)
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, FetchError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(FetchError::from_status(status, &body))
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let fresh_url = Self::cache_busted(url, Utc::now().timestamp_millis());
            let response = self.client.get(&fresh_url).send().await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok(response.text().await?),
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(FetchError::RateLimited);
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }
}

#[async_trait]
impl DocumentSource for SheetClient {
    async fn fetch_document(&self, discipline: Discipline) -> Result<String, FetchError> {
        let url = self
            .sources
            .url_for(discipline)
            .ok_or(FetchError::NotConfigured(discipline))?;

        let text = self.get_text(url).await?;
        debug!(discipline = %discipline, bytes = text.len(), "Fetched sheet");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_busted_url() {
        assert_eq!(
            SheetClient::cache_busted("https://example.com/pub?gid=0&output=csv", 42),
            "https://example.com/pub?gid=0&output=csv&v=42"
        );
        assert_eq!(
            SheetClient::cache_busted("https://example.com/records.csv", 7),
            "https://example.com/records.csv?v=7"
        );
    }

    #[tokio::test]
    async fn test_unconfigured_discipline_fails_without_network() {
        let client = SheetClient::new(SourceUrls::default()).unwrap();
        let err = client.fetch_document(Discipline::Training).await.unwrap_err();
        assert!(matches!(err, FetchError::NotConfigured(Discipline::Training)));
    }
}
