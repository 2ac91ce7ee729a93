//! Per-(source IP, path) hit counters.
//!
//! The source IP is base64-encoded before it is used as a key so that
//! address characters (`:` in IPv6, for one) never collide with store key
//! syntax. This is an encoding, not an obfuscation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Composite store key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CounterKey {
    /// Base64 of the textual source IP.
    pub source_ip: String,
    pub path: String,
}

impl CounterKey {
    /// Derive the key from the raw source IP and the request path.
    pub fn new(source_ip: &str, path: &str) -> Self {
        Self {
            source_ip: STANDARD.encode(source_ip.as_bytes()),
            path: path.to_string(),
        }
    }
}

/// Persisted counter. At most one per (`source_ip`, `path`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterRecord {
    /// Encoded source IP (key field).
    pub source_ip: String,
    /// Request path (key field).
    pub path: String,
    /// Method of the request that created the record.
    pub method: String,
    pub count: u64,
}

impl CounterRecord {
    /// Record for a key seen for the first time. `count` starts at zero and
    /// is incremented by the caller in the same operation.
    pub fn initial(key: &CounterKey, method: &str) -> Self {
        Self {
            source_ip: key.source_ip.clone(),
            path: key.path.clone(),
            method: method.to_string(),
            count: 0,
        }
    }

    pub fn key(&self) -> CounterKey {
        CounterKey {
            source_ip: self.source_ip.clone(),
            path: self.path.clone(),
        }
    }

    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
    }
}

/// Attribute names a query may project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterField {
    Count,
    Method,
    Path,
    SourceIp,
}

impl CounterField {
    pub fn as_str(self) -> &'static str {
        match self {
            CounterField::Count => "count",
            CounterField::Method => "method",
            CounterField::Path => "path",
            CounterField::SourceIp => "sourceIp",
        }
    }
}

/// Projection used by the metadata recorder.
pub const COUNTER_PROJECTION: [CounterField; 4] = [
    CounterField::Count,
    CounterField::Method,
    CounterField::Path,
    CounterField::SourceIp,
];

/// Key-equality query: `sourceIp = :ip AND path = :path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterQuery {
    pub table: String,
    pub key: CounterKey,
    pub projection: Vec<CounterField>,
}

impl CounterQuery {
    pub fn new(table: impl Into<String>, key: CounterKey) -> Self {
        Self {
            table: table.into(),
            key,
            projection: COUNTER_PROJECTION.to_vec(),
        }
    }

    /// Projection rendered as a comma-separated attribute list.
    pub fn projection_expression(&self) -> String {
        self.projection
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}
