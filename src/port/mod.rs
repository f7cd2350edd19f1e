//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (product pages, databases, chat services).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Source  │            │   Store     │              │ Notifier  │
//! │ Adapter │            │   Adapter   │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`StockSource`] - Product page availability queries
//! - [`ProductStore`] - Persistence for products and subscriptions
//! - [`Notifier`] - Status change notifications (Telegram, logging)
//! - [`CheckControl`] - On-demand check cycles for front ends

pub mod inbound;
pub mod outbound;

pub use inbound::checker::{CheckControl, CheckRequest};
pub use outbound::notifier::{DeliveryOutcome, LogNotifier, Notifier, StatusChange};
pub use outbound::source::StockSource;
pub use outbound::store::ProductStore;
