//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the infrastructure the checker depends on: the
//! product pages, the product store, and the notification backend.

pub mod notifier;
pub mod source;
pub mod store;
