#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Credential store for the FridgeManager identity service.
//!
//! The store owns account records: usernames, password hashes, account status and
//! role sets. Access goes through the [`AccountRepository`] trait; [`MemoryStore`]
//! is the process-local implementation used by the server.
//!
//! [`AccountRepository`]: crate::query::AccountRepository

// Tracing target constants for consistent logging.

/// Tracing target for client-related operations.
///
/// Use this target for logging store initialization and lifecycle events.
pub const TRACING_TARGET_CLIENT: &str = "fridge_store::client";

/// Tracing target for store query operations.
///
/// Use this target for logging reads, writes and constraint violations.
pub const TRACING_TARGET_QUERY: &str = "fridge_store::queries";

mod client;
mod error;
pub mod model;
pub mod query;
pub mod types;

pub use crate::client::MemoryStore;
pub use crate::error::{StoreError, StoreResult};
