//! Shop and page-fetch configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::adapter::outbound::scraper::HttpSourceConfig;
use crate::domain::UrlRules;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// `[source]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// The only host product links may point at.
    pub allowed_host: String,
    /// Path fragment every product page contains.
    pub product_path: String,
    pub user_agent: String,
    /// Delivery pincode sent as a cookie.
    pub pincode: String,
    /// Attempts per page on connect errors and timeouts.
    pub retry_attempts: u32,
    pub retry_backoff_millis: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            allowed_host: "shop.amul.com".into(),
            product_path: "/product/".into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            pincode: "110001".into(),
            retry_attempts: 2,
            retry_backoff_millis: 1000,
        }
    }
}

impl SourceConfig {
    #[must_use]
    pub fn rules(&self) -> UrlRules {
        UrlRules::new(&self.allowed_host, &self.product_path)
    }

    #[must_use]
    pub fn http_config(&self, request_timeout: Duration) -> HttpSourceConfig {
        HttpSourceConfig {
            allowed_host: self.allowed_host.clone(),
            user_agent: self.user_agent.clone(),
            pincode: self.pincode.clone(),
            request_timeout,
            retry_max_attempts: self.retry_attempts,
            retry_backoff: Duration::from_millis(self.retry_backoff_millis),
        }
    }
}
