//! tallygate core: request/response model, counter records, and the shared error type.
//!
//! This crate defines the event and store contracts shared by the gateway,
//! handlers, and tests. It carries no transport or runtime dependencies so it
//! can be reused by any host that feeds events into the gateway.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `GatewayError`/`Result` so a malformed
//! event never takes down the hosting runtime.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;

/// Shared result type.
pub use error::{GatewayError, Result};
