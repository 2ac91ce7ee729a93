//! Gateway config loader (strict parsing + environment override).

pub mod schema;

use std::fs;

use tallygate_core::error::{GatewayError, Result};

pub use schema::{GatewayConfig, GatewaySection, MetadataSection, RouteConfig, StoreKind};

/// Environment variable naming the counter table. Overrides `metadata.table_name`.
pub const TABLE_NAME_ENV: &str = "DYNAMO_METADATA_TABLE_NAME";

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| GatewayError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| GatewayError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Apply process environment overrides.
pub fn apply_env(cfg: &mut GatewayConfig) {
    apply_table_name(cfg, std::env::var(TABLE_NAME_ENV).ok());
}

/// Apply a table name override. An empty value clears the table, which
/// disables metadata recording.
pub fn apply_table_name(cfg: &mut GatewayConfig, value: Option<String>) {
    if let Some(v) = value {
        cfg.metadata.table_name = Some(v);
    }
}
