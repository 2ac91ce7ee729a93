//! Not-found page source.

use std::path::PathBuf;

use async_trait::async_trait;

use tallygate_core::error::{GatewayError, Result};

/// Supplies the HTML body of a 404. Loaded per request; a failed load is a
/// gateway fault (500), not a 404.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn load(&self) -> Result<String>;
}

/// Reads the page from disk on every call, so edits show up without a restart.
pub struct FilePage {
    path: PathBuf,
}

impl FilePage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PageSource for FilePage {
    async fn load(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            GatewayError::Page(format!("{e}, open '{}'", self.path.display()))
        })
    }
}

/// Fixed page text.
pub struct StaticPage(String);

impl StaticPage {
    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }
}

#[async_trait]
impl PageSource for StaticPage {
    async fn load(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
