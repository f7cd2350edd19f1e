//! Domain validation errors for core domain types.
//!
//! These errors are returned by `parse`/`try_new` constructors when an input
//! violates a domain rule, before anything touches the store or the network.
//!
//! # Examples
//!
//! ```
//! use stockwatch::domain::error::DomainError;
//! use stockwatch::domain::id::{ProductUrl, UrlRules};
//!
//! let rules = UrlRules::new("shop.amul.com", "/product/");
//! let result = ProductUrl::parse("https://example.com/product/whey", &rules);
//!
//! assert!(matches!(result, Err(DomainError::UnsupportedHost { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The input could not be parsed as an absolute http(s) URL.
    #[error("not a valid URL: {input}")]
    InvalidProductUrl {
        /// The rejected input.
        input: String,
    },

    /// The URL points at a host other than the tracked shop.
    #[error("unsupported host `{host}` (expected {expected})")]
    UnsupportedHost {
        /// Host found in the URL.
        host: String,
        /// Host the tracker is configured for.
        expected: String,
    },

    /// The URL is on the right host but is not a product page.
    #[error("URL is not a product page: {path}")]
    NotAProductPage {
        /// Path found in the URL.
        path: String,
    },

    /// User identifiers must be non-empty.
    #[error("user id cannot be empty")]
    EmptyUserId,

    /// A stored status value that is not one of the known variants.
    #[error("unknown stock status `{0}`")]
    UnknownStatus(String),
}
