//! Lightweight in-process metrics.
//!
//! Counters and a latency histogram stored as atomics behind `DashMap`,
//! rendered in Prometheus text format by the host's metrics route.

pub mod metrics;
