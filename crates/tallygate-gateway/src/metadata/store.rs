//! Counter store client.
//!
//! The recorder only needs two calls: a key-equality query with a projection
//! and a full-item put. Neither is conditional; a put replaces whatever is
//! stored under the same (sourceIp, path) key.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;

use tallygate_core::error::{GatewayError, Result};
use tallygate_core::model::{CounterKey, CounterQuery, CounterRecord};

#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Point lookup. `Ok(None)` when no record exists for the key.
    async fn query(&self, q: &CounterQuery) -> Result<Option<CounterRecord>>;
    /// Full replace of the record under its key.
    async fn put_item(&self, table: &str, record: &CounterRecord) -> Result<()>;
}

// --------------------
// In-memory
// --------------------

/// Process-local store. Survives across invocations of a warm process only.
#[derive(Default)]
pub struct InMemoryCounterStore {
    items: DashMap<(String, CounterKey), CounterRecord>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Direct read, bypassing the query contract.
    pub fn get(&self, table: &str, key: &CounterKey) -> Option<CounterRecord> {
        self.items
            .get(&(table.to_string(), key.clone()))
            .map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn query(&self, q: &CounterQuery) -> Result<Option<CounterRecord>> {
        Ok(self.get(&q.table, &q.key))
    }

    async fn put_item(&self, table: &str, record: &CounterRecord) -> Result<()> {
        self.items
            .insert((table.to_string(), record.key()), record.clone());
        Ok(())
    }
}

// --------------------
// File-backed
// --------------------

/// One JSON document per table under `dir` (`<dir>/<table>.json`).
///
/// Every operation reads the whole table; puts rewrite it through a temp file
/// and rename. The mutex serializes rewrites inside this process only.
pub struct FileCounterStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCounterStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn table_path(&self, table: &str) -> Result<PathBuf> {
        let valid = !table.is_empty()
            && table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !table.starts_with('.');
        if !valid {
            return Err(GatewayError::Store(format!("invalid table name: {table}")));
        }
        Ok(self.dir.join(format!("{table}.json")))
    }

    async fn load(&self, path: &Path) -> Result<Vec<CounterRecord>> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(GatewayError::Store(format!(
                    "read {} failed: {e}",
                    path.display()
                )))
            }
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|e| {
            GatewayError::Store(format!("malformed table {}: {e}", path.display()))
        })
    }
}

#[async_trait]
impl CounterStore for FileCounterStore {
    async fn query(&self, q: &CounterQuery) -> Result<Option<CounterRecord>> {
        let path = self.table_path(&q.table)?;
        let rows = self.load(&path).await?;
        Ok(rows.into_iter().find(|r| r.key() == q.key))
    }

    async fn put_item(&self, table: &str, record: &CounterRecord) -> Result<()> {
        let path = self.table_path(table)?;
        let _guard = self.write_lock.lock().await;

        let mut rows = self.load(&path).await?;
        let key = record.key();
        match rows.iter_mut().find(|r| r.key() == key) {
            Some(existing) => *existing = record.clone(),
            None => rows.push(record.clone()),
        }

        let body = serde_json::to_string_pretty(&rows)
            .map_err(|e| GatewayError::Store(format!("encode table failed: {e}")))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| GatewayError::Store(format!("create {} failed: {e}", self.dir.display())))?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| GatewayError::Store(format!("write {} failed: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| GatewayError::Store(format!("replace {} failed: {e}", path.display())))?;
        Ok(())
    }
}
