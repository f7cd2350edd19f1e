//! HTTP client that fetches product pages.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client as HttpClient;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use super::page::parse_page;
use crate::domain::{Observation, ProductUrl};
use crate::error::{ConfigError, Result, SourceError};
use crate::port::StockSource;

/// Connection settings for [`HttpStockSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSourceConfig {
    /// Host the delivery-area cookie is set for.
    pub allowed_host: String,
    pub user_agent: String,
    /// Delivery pincode; the shop hides availability without one.
    pub pincode: String,
    pub request_timeout: Duration,
    pub retry_max_attempts: u32,
    pub retry_backoff: Duration,
}

/// [`StockSource`] that downloads the product page and reads it.
pub struct HttpStockSource {
    http: HttpClient,
    timeout_secs: u64,
    retry_max_attempts: u32,
    retry_backoff: Duration,
}

impl HttpStockSource {
    /// Build the client with the pincode cookie and browser-like headers.
    ///
    /// # Errors
    ///
    /// Returns a config error when the host or user agent cannot be used.
    pub fn new(config: &HttpSourceConfig) -> Result<Self> {
        let shop = Url::parse(&format!("https://{}/", config.allowed_host)).map_err(|e| {
            ConfigError::InvalidValue {
                field: "source.allowed_host",
                reason: e.to_string(),
            }
        })?;
        let jar = Jar::default();
        jar.add_cookie_str(&format!("pincode={}", config.pincode), &shop);

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-IN,en;q=0.9"));

        let http = HttpClient::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .cookie_provider(Arc::new(jar))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                field: "source.user_agent",
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            timeout_secs: config.request_timeout.as_secs(),
            retry_max_attempts: config.retry_max_attempts.max(1),
            retry_backoff: config.retry_backoff,
        })
    }

    async fn fetch(&self, url: &ProductUrl) -> std::result::Result<String, SourceError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.fetch_once(url).await {
                Err(err) if attempt < self.retry_max_attempts && should_retry(&err) => {
                    warn!(
                        url = %url,
                        attempt,
                        max_attempts = self.retry_max_attempts,
                        error = %err,
                        "Page fetch failed, retrying"
                    );
                    if !self.retry_backoff.is_zero() {
                        sleep(self.retry_backoff).await;
                    }
                }
                other => return other,
            }
        }
    }

    async fn fetch_once(&self, url: &ProductUrl) -> std::result::Result<String, SourceError> {
        let response = self
            .http
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, err: reqwest::Error) -> SourceError {
        if err.is_timeout() {
            SourceError::Timeout {
                secs: self.timeout_secs,
            }
        } else {
            SourceError::Transport(err)
        }
    }
}

fn should_retry(err: &SourceError) -> bool {
    match err {
        SourceError::Timeout { .. } => true,
        SourceError::Transport(e) => e.is_connect(),
        _ => false,
    }
}

#[async_trait]
impl StockSource for HttpStockSource {
    async fn query(&self, url: &ProductUrl) -> std::result::Result<Observation, SourceError> {
        debug!(url = %url, "Fetching product page");
        let body = self.fetch(url).await?;
        let observation = parse_page(&body);
        debug!(
            url = %url,
            name = %observation.name,
            status = %observation.status,
            "Product page read"
        );
        Ok(observation)
    }
}
