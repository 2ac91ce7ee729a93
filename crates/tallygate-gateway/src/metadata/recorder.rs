//! Metadata recorder.
//!
//! The counter update is a plain read, increment, then put. There is no
//! conditional write, so two concurrent requests for the same key can both
//! read `n` and both write `n + 1`. Counts are telemetry and that loss is
//! accepted.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tokio::task::JoinHandle;

use tallygate_core::error::Result;
use tallygate_core::model::{CounterKey, CounterQuery, CounterRecord, InboundRequest};

use crate::gateway::panic_message;
use crate::metadata::store::CounterStore;
use crate::obs::metrics::GatewayMetrics;

#[derive(Clone)]
pub struct MetadataRecorder {
    table: Option<String>,
    store: Arc<dyn CounterStore>,
    metrics: Option<Arc<GatewayMetrics>>,
}

impl MetadataRecorder {
    /// `table` empty or `None` disables recording.
    pub fn new(table: Option<String>, store: Arc<dyn CounterStore>) -> Self {
        Self {
            table: table.filter(|t| !t.is_empty()),
            store,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<GatewayMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.table.is_some()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Run one counter update and report the outcome.
    /// Returns `Ok(None)` without touching the store when recording is disabled.
    pub async fn record_now(
        &self,
        source_ip: &str,
        method: &str,
        path: &str,
    ) -> Result<Option<CounterRecord>> {
        let Some(table) = self.table.as_deref() else {
            return Ok(None);
        };

        let key = CounterKey::new(source_ip, path);
        let query = CounterQuery::new(table, key.clone());

        let mut row = match self.store.query(&query).await? {
            Some(existing) => existing,
            None => CounterRecord::initial(&key, method),
        };
        row.increment();

        self.store.put_item(table, &row).await?;
        Ok(Some(row))
    }

    /// Never fails: errors and panics from the store are logged and dropped.
    pub async fn record(&self, source_ip: &str, method: &str, path: &str) {
        if !self.is_enabled() {
            tracing::warn!(
                env = crate::config::TABLE_NAME_ENV,
                "counter table not configured, not recording request metadata"
            );
            self.observe("disabled");
            return;
        }

        let outcome = AssertUnwindSafe(self.record_now(source_ip, method, path))
            .catch_unwind()
            .await;
        match outcome {
            Ok(Ok(Some(row))) => {
                tracing::debug!(path = %row.path, count = row.count, "request metadata recorded");
                self.observe("ok");
            }
            Ok(Ok(None)) => self.observe("disabled"),
            Ok(Err(e)) => {
                tracing::error!(
                    error = %e,
                    error.kind = e.kind().as_str(),
                    %source_ip,
                    %path,
                    "request metadata upload failed"
                );
                self.observe("error");
            }
            Err(panic) => {
                let msg = panic_message(panic.as_ref());
                tracing::error!(panic = %msg, %source_ip, %path, "request metadata upload panicked");
                self.observe("error");
            }
        }
    }

    /// Fire-and-forget: launch [`record`](Self::record) as a detached task.
    ///
    /// The returned handle exists for tests; the gateway drops it. Outside a
    /// tokio runtime nothing is launched and `None` is returned.
    pub fn spawn(&self, req: &InboundRequest) -> Option<JoinHandle<()>> {
        let Ok(rt) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("no async runtime, request metadata not recorded");
            return None;
        };
        let this = self.clone();
        let source_ip = req.source_ip().to_string();
        let method = req.method().to_string();
        let path = req.path().to_string();
        Some(rt.spawn(async move {
            this.record(&source_ip, &method, &path).await;
        }))
    }

    fn observe(&self, outcome: &str) {
        if let Some(m) = &self.metrics {
            m.recorder.inc(&[("outcome", outcome)]);
        }
    }
}
