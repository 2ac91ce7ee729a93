use std::collections::HashSet;

use serde::Deserialize;
use tallygate_core::error::{GatewayError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub metadata: MetadataSection,

    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GatewayError::UnsupportedVersion);
        }

        self.gateway.validate()?;

        let mut seen = HashSet::new();
        for r in &self.routes {
            r.validate()?;
            if !seen.insert(r.path.as_str()) {
                return Err(GatewayError::Config(format!(
                    "duplicate route path: {}",
                    r.path
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// HTML served with every 404.
    #[serde(default = "default_not_found_page")]
    pub not_found_page: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            not_found_page: default_not_found_page(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if self.listen.trim().is_empty() {
            return Err(GatewayError::Config("gateway.listen must not be empty".into()));
        }
        if self.not_found_page.trim().is_empty() {
            return Err(GatewayError::Config(
                "gateway.not_found_page must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_not_found_page() -> String {
    "404.html".into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    #[default]
    Memory,
    File,
    Dynamo,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetadataSection {
    /// Counter table. Unset or empty disables metadata recording.
    #[serde(default)]
    pub table_name: Option<String>,

    #[serde(default)]
    pub store: StoreKind,

    /// Directory of the file store.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for MetadataSection {
    fn default() -> Self {
        Self {
            table_name: None,
            store: StoreKind::default(),
            data_dir: default_data_dir(),
        }
    }
}

impl MetadataSection {
    /// Configured table, treating empty as absent.
    pub fn table(&self) -> Option<&str> {
        self.table_name.as_deref().filter(|t| !t.is_empty())
    }
}

fn default_data_dir() -> String {
    "data".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    /// Exact, case-sensitive request path.
    pub path: String,
    /// Built-in handler name (e.g. "ping").
    pub handler: String,
}

impl RouteConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            return Err(GatewayError::Config(format!(
                "route path must start with '/': {}",
                self.path
            )));
        }
        if self.handler.trim().is_empty() {
            return Err(GatewayError::Config(format!(
                "route {} has an empty handler name",
                self.path
            )));
        }
        Ok(())
    }
}
