use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use tallygate_core::error::{GatewayError, Result};
use tallygate_core::model::{InboundRequest, Response};

/// A route action: given the inbound request, produce a response.
///
/// Errors are not translated here; the gateway boundary turns them into 500s.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Name used in logs and config (`routes[].handler`).
    fn name(&self) -> &str;
    async fn handle(&self, req: &InboundRequest) -> Result<Response>;
}

/// One registered path.
#[derive(Clone)]
pub struct RouteEntry {
    pub path: String,
    pub action: Arc<dyn RequestHandler>,
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("path", &self.path)
            .field("action", &self.action.name())
            .finish()
    }
}

/// Exact-match path table. Built once at startup, read-only afterwards.
///
/// Only the path selects a route; the method is left to the handler.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: HashMap<String, RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register `handler` for `path`. A path may be registered once.
    pub fn register(&mut self, path: impl Into<String>, handler: Arc<dyn RequestHandler>) -> Result<()> {
        let path = path.into();
        if self.entries.contains_key(&path) {
            return Err(GatewayError::Config(format!("route already registered: {path}")));
        }
        self.entries.insert(
            path.clone(),
            RouteEntry {
                path,
                action: handler,
            },
        );
        Ok(())
    }

    /// Chaining form of [`register`](Self::register).
    pub fn with_route(mut self, path: impl Into<String>, handler: Arc<dyn RequestHandler>) -> Result<Self> {
        self.register(path, handler)?;
        Ok(self)
    }

    pub fn lookup(&self, req: &InboundRequest) -> Option<&RouteEntry> {
        self.entries.get(req.path())
    }

    pub fn registered_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
