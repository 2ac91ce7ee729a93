//! Fakes shared by the gateway integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use tallygate_core::error::{GatewayError, Result};
use tallygate_core::model::{CounterKey, CounterQuery, CounterRecord, InboundRequest, Response};
use tallygate_gateway::metadata::{CounterStore, InMemoryCounterStore, MetadataRecorder};
use tallygate_gateway::pages::StaticPage;
use tallygate_gateway::routes::{RequestHandler, RouteTable};
use tallygate_gateway::Gateway;

pub const NOT_FOUND_HTML: &str = "<html><body>not here</body></html>";

/// Store call log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Query { table: String, key: CounterKey, projection: String },
    Put { table: String, record: CounterRecord },
}

/// In-memory store that logs every call and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    inner: InMemoryCounterStore,
    calls: Mutex<Vec<Call>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn puts(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Put { .. }))
            .count()
    }

    pub fn count_for(&self, table: &str, source_ip: &str, path: &str) -> Option<u64> {
        self.inner
            .get(table, &CounterKey::new(source_ip, path))
            .map(|r| r.count)
    }

    /// Backing store, for seeding without logging a call.
    pub fn inner(&self) -> &InMemoryCounterStore {
        &self.inner
    }
}

#[async_trait]
impl CounterStore for RecordingStore {
    async fn query(&self, q: &CounterQuery) -> Result<Option<CounterRecord>> {
        self.calls.lock().unwrap().push(Call::Query {
            table: q.table.clone(),
            key: q.key.clone(),
            projection: q.projection_expression(),
        });
        if self.fail_reads {
            return Err(GatewayError::Store("connection refused".into()));
        }
        self.inner.query(q).await
    }

    async fn put_item(&self, table: &str, record: &CounterRecord) -> Result<()> {
        self.calls.lock().unwrap().push(Call::Put {
            table: table.to_string(),
            record: record.clone(),
        });
        if self.fail_writes {
            return Err(GatewayError::Store("throughput exceeded".into()));
        }
        self.inner.put_item(table, record).await
    }
}

/// Store whose calls never complete.
pub struct HangingStore;

#[async_trait]
impl CounterStore for HangingStore {
    async fn query(&self, _q: &CounterQuery) -> Result<Option<CounterRecord>> {
        std::future::pending().await
    }

    async fn put_item(&self, _table: &str, _record: &CounterRecord) -> Result<()> {
        std::future::pending().await
    }
}

/// Store that panics on every call.
pub struct PanickingStore;

#[async_trait]
impl CounterStore for PanickingStore {
    async fn query(&self, _q: &CounterQuery) -> Result<Option<CounterRecord>> {
        panic!("store client poisoned")
    }

    async fn put_item(&self, _table: &str, _record: &CounterRecord) -> Result<()> {
        panic!("store client poisoned")
    }
}

/// Handler failing with an arbitrary error.
pub struct ErrHandler(pub fn() -> GatewayError);

#[async_trait]
impl RequestHandler for ErrHandler {
    fn name(&self) -> &str {
        "err"
    }

    async fn handle(&self, _req: &InboundRequest) -> Result<Response> {
        Err((self.0)())
    }
}

/// Handler returning a fixed response.
pub struct FixedHandler {
    pub name: &'static str,
    pub response: Response,
}

#[async_trait]
impl RequestHandler for FixedHandler {
    fn name(&self) -> &str {
        self.name
    }

    async fn handle(&self, _req: &InboundRequest) -> Result<Response> {
        Ok(self.response.clone())
    }
}

/// Handler that always fails with the given message.
pub struct FailingHandler(pub &'static str);

#[async_trait]
impl RequestHandler for FailingHandler {
    fn name(&self) -> &str {
        "failing"
    }

    async fn handle(&self, _req: &InboundRequest) -> Result<Response> {
        Err(GatewayError::handler(self.0))
    }
}

/// Handler that panics.
pub struct PanickingHandler;

#[async_trait]
impl RequestHandler for PanickingHandler {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn handle(&self, _req: &InboundRequest) -> Result<Response> {
        panic!("handler exploded")
    }
}

pub fn pong() -> Response {
    Response::new(200).with_body("pong")
}

pub fn ping_routes() -> RouteTable {
    RouteTable::new()
        .with_route(
            "/ping",
            Arc::new(FixedHandler {
                name: "ping",
                response: pong(),
            }),
        )
        .unwrap()
}

pub fn gateway(routes: RouteTable, table: Option<&str>, store: Arc<dyn CounterStore>) -> Gateway {
    let recorder = MetadataRecorder::new(table.map(str::to_string), store);
    Gateway::new(routes, recorder, Arc::new(StaticPage::new(NOT_FOUND_HTML)))
}

/// Poll `cond` while background tasks make progress.
pub async fn eventually(cond: impl Fn() -> bool) -> bool {
    for _ in 0..200 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}

/// Give detached tasks a chance to run.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
