//! Dashboard server configuration.

use std::net::SocketAddr;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// `[web]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub enabled: bool,
    /// Listen address, `host:port`.
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: "0.0.0.0:3000".into(),
        }
    }
}

impl WebConfig {
    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unparsable address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::InvalidValue {
                field: "web.bind",
                reason: e.to_string(),
            }
            .into()
        })
    }
}
