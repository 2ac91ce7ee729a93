//! Outbound response, identical in shape for handlers and fallbacks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const CONTENT_TYPE: &str = "Content-Type";

/// `{statusCode, headers, body}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: String,
}

impl Response {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            headers: BTreeMap::new(),
            body: String::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// `text/plain` response.
    pub fn text(status_code: u16, body: impl Into<String>) -> Self {
        Self::new(status_code)
            .with_header(CONTENT_TYPE, "text/plain")
            .with_body(body)
    }

    /// `text/html` response.
    pub fn html(status_code: u16, body: impl Into<String>) -> Self {
        Self::new(status_code)
            .with_header(CONTENT_TYPE, "text/html")
            .with_body(body)
    }

    /// `application/json` response.
    pub fn json(status_code: u16, body: &serde_json::Value) -> Self {
        Self::new(status_code)
            .with_header(CONTENT_TYPE, "application/json")
            .with_body(body.to_string())
    }
}
