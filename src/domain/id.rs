//! Identifier types for products and subscribers.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::error::DomainError;

/// Rules a URL must satisfy to be accepted as a tracked product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRules {
    allowed_host: String,
    product_path: String,
}

impl UrlRules {
    /// Create rules for a shop host and the path fragment of its product pages.
    pub fn new(allowed_host: impl Into<String>, product_path: impl Into<String>) -> Self {
        Self {
            allowed_host: allowed_host.into().to_ascii_lowercase(),
            product_path: product_path.into(),
        }
    }

    #[must_use]
    pub fn allowed_host(&self) -> &str {
        &self.allowed_host
    }

    #[must_use]
    pub fn product_path(&self) -> &str {
        &self.product_path
    }
}

/// Normalized product page URL, the unique key of a tracked product.
///
/// Normalization drops the query string and fragment, trims a trailing
/// slash and folds a `www.` prefix onto the configured host, so two links
/// to the same page map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductUrl(String);

impl ProductUrl {
    /// Validate and normalize a user-supplied URL.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] when the input is not an http(s) URL, points
    /// at another host, or is not a product page.
    pub fn parse(input: &str, rules: &UrlRules) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidProductUrl {
            input: input.to_string(),
        };

        let mut url = Url::parse(input.trim()).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid());
        }

        let host = url.host_str().ok_or_else(invalid)?.to_ascii_lowercase();
        let bare_host = host.strip_prefix("www.").unwrap_or(&host);
        if host != rules.allowed_host && bare_host != rules.allowed_host {
            return Err(DomainError::UnsupportedHost {
                host,
                expected: rules.allowed_host.clone(),
            });
        }
        if host != rules.allowed_host {
            url.set_host(Some(&rules.allowed_host))
                .map_err(|_| invalid())?;
        }

        if !url.path().contains(&rules.product_path) {
            return Err(DomainError::NotAProductPage {
                path: url.path().to_string(),
            });
        }

        url.set_query(None);
        url.set_fragment(None);
        let trimmed = url.path().trim_end_matches('/').to_string();
        if !trimmed.is_empty() {
            url.set_path(&trimmed);
        }

        Ok(Self(url.to_string()))
    }

    /// Wrap a URL that was validated before it was stored.
    pub fn from_stored(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Subscriber identifier.
///
/// For the Telegram front end this is the chat id the user talks to the
/// bot from, so a direct notification goes back to the same chat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user id, rejecting blank input.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyUserId`] for empty or whitespace-only ids.
    pub fn try_new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyUserId);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(chat_id: i64) -> Self {
        Self(chat_id.to_string())
    }
}
