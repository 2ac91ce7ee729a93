//! Data model shared by the gateway and its collaborators.
//!
//! - `event`: the inbound request, decoded once from the host's JSON event.
//! - `response`: the `{statusCode, headers, body}` shape every path returns.
//! - `counter`: per-(source IP, path) hit counters and the store query contract.

pub mod counter;
pub mod event;
pub mod response;

pub use counter::{CounterField, CounterKey, CounterQuery, CounterRecord, COUNTER_PROJECTION};
pub use event::InboundRequest;
pub use response::Response;
