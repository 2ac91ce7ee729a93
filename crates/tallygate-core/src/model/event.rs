//! Inbound request decoded from an HTTP (v2 payload) function event.
//!
//! Only `rawPath` and `requestContext.http.{method,path,sourceIp}` are
//! required. Everything else the platform sends is optional or ignored.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{GatewayError, Result};

/// Immutable request description, produced once per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "HttpEvent")]
pub struct InboundRequest {
    method: String,
    path: String,
    source_ip: String,
    raw_path: String,
    raw_query_string: String,
    headers: BTreeMap<String, String>,
    body: Option<String>,
    is_base64_encoded: bool,
}

impl InboundRequest {
    /// Build a request from the three fields the gateway routes and counts on.
    /// `raw_path` defaults to `path`.
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        source_ip: impl Into<String>,
    ) -> Self {
        let path = path.into();
        Self {
            method: method.into(),
            raw_path: path.clone(),
            path,
            source_ip: source_ip.into(),
            raw_query_string: String::new(),
            headers: BTreeMap::new(),
            body: None,
            is_base64_encoded: false,
        }
    }

    /// Decode a JSON event document.
    pub fn from_event_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| GatewayError::BadRequest(format!("invalid event: {e}")))
    }

    /// Decode an already-parsed JSON event.
    pub fn from_event_value(v: serde_json::Value) -> Result<Self> {
        serde_json::from_value(v)
            .map_err(|e| GatewayError::BadRequest(format!("invalid event: {e}")))
    }

    pub fn with_raw_path(mut self, raw_path: impl Into<String>) -> Self {
        self.raw_path = raw_path.into();
        self
    }

    pub fn with_query(mut self, raw_query_string: impl Into<String>) -> Self {
        self.raw_query_string = raw_query_string.into();
        self
    }

    /// Header names are stored lowercased, as the platform delivers them.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>, is_base64_encoded: bool) -> Self {
        self.body = Some(body.into());
        self.is_base64_encoded = is_base64_encoded;
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }
    pub fn path(&self) -> &str {
        &self.path
    }
    pub fn source_ip(&self) -> &str {
        &self.source_ip
    }
    /// Raw path as received; used for logging only.
    pub fn raw_path(&self) -> &str {
        &self.raw_path
    }
    pub fn raw_query_string(&self) -> &str {
        &self.raw_query_string
    }
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
    pub fn is_base64_encoded(&self) -> bool {
        self.is_base64_encoded
    }
}

// --------------------
// Wire shape
// --------------------
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HttpEvent {
    raw_path: String,
    #[serde(default)]
    raw_query_string: String,
    #[serde(default)]
    headers: BTreeMap<String, String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    is_base64_encoded: bool,
    request_context: RequestContext,
}

#[derive(Debug, Deserialize)]
struct RequestContext {
    http: HttpContext,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HttpContext {
    method: String,
    path: String,
    source_ip: String,
}

impl From<HttpEvent> for InboundRequest {
    fn from(ev: HttpEvent) -> Self {
        let headers = ev
            .headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        Self {
            method: ev.request_context.http.method,
            path: ev.request_context.http.path,
            source_ip: ev.request_context.http.source_ip,
            raw_path: ev.raw_path,
            raw_query_string: ev.raw_query_string,
            headers,
            body: ev.body,
            is_base64_encoded: ev.is_base64_encoded,
        }
    }
}
