//! Route table module exports.
//!
//! Re-exports the table and the handler trait so handler crates can depend on
//! this module directly.

pub mod table;

pub use table::{RequestHandler, RouteEntry, RouteTable};
