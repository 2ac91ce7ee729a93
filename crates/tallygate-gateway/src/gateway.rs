//! Request gateway.
//!
//! One call per inbound event:
//! 1. launch the metadata recorder (detached, never joined)
//! 2. look the path up in the route table
//! 3. run the matched handler, or answer 404 with the not-found page
//!
//! Everything runs under one boundary. Any error or panic below it becomes a
//! `500 text/plain` whose body is the fault's message, without the kind
//! prefix used in logs. `handle` itself never fails.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;

use tallygate_core::error::Result;
use tallygate_core::model::{InboundRequest, Response};

use crate::metadata::MetadataRecorder;
use crate::obs::metrics::GatewayMetrics;
use crate::pages::PageSource;
use crate::routes::RouteTable;

pub struct Gateway {
    routes: RouteTable,
    recorder: MetadataRecorder,
    not_found: Arc<dyn PageSource>,
    metrics: Arc<GatewayMetrics>,
}

impl Gateway {
    /// The gateway takes exclusive ownership of the route table.
    pub fn new(
        routes: RouteTable,
        recorder: MetadataRecorder,
        not_found: Arc<dyn PageSource>,
    ) -> Self {
        Self {
            routes,
            recorder,
            not_found,
            metrics: Arc::new(GatewayMetrics::default()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<GatewayMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn recorder(&self) -> &MetadataRecorder {
        &self.recorder
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Handle one request. Always returns a well-formed response.
    pub async fn handle(&self, req: &InboundRequest) -> Response {
        let started = Instant::now();
        let outcome = AssertUnwindSafe(self.dispatch(req)).catch_unwind().await;
        let resp = self.settle(outcome);
        self.metrics
            .handle_duration
            .observe(&[], started.elapsed());
        resp
    }

    /// Decode a raw JSON event and handle it. A malformed event is a fault
    /// like any other and is answered with a 500.
    pub async fn handle_event(&self, event: serde_json::Value) -> Response {
        match InboundRequest::from_event_value(event) {
            Ok(req) => self.handle(&req).await,
            Err(e) => {
                tracing::error!(error = %e, error.kind = e.kind().as_str(), "unhandled exception");
                self.metrics.requests.inc(&[("outcome", "error")]);
                server_error(e.message())
            }
        }
    }

    async fn dispatch(&self, req: &InboundRequest) -> Result<(Response, &'static str)> {
        // detached: the response never waits on telemetry
        let _ = self.recorder.spawn(req);

        tracing::info!(source_ip = %req.source_ip(), "request received");

        if let Some(entry) = self.routes.lookup(req) {
            tracing::info!(
                handler = entry.action.name(),
                raw_path = %req.raw_path(),
                "using handler"
            );
            let resp = entry.action.handle(req).await?;
            return Ok((resp, "routed"));
        }

        let body = self.not_found.load().await?;
        Ok((Response::html(404, body), "not_found"))
    }

    fn settle(
        &self,
        outcome: std::result::Result<Result<(Response, &'static str)>, Box<dyn Any + Send>>,
    ) -> Response {
        match outcome {
            Ok(Ok((resp, label))) => {
                self.metrics.requests.inc(&[("outcome", label)]);
                resp
            }
            Ok(Err(e)) => {
                tracing::error!(
                    error = ?e,
                    error.kind = e.kind().as_str(),
                    "unhandled exception"
                );
                self.metrics.requests.inc(&[("outcome", "error")]);
                server_error(e.message())
            }
            Err(panic) => {
                let msg = panic_message(panic.as_ref());
                tracing::error!(panic = %msg, "unhandled panic");
                self.metrics.requests.inc(&[("outcome", "error")]);
                server_error(msg)
            }
        }
    }
}

fn server_error(msg: String) -> Response {
    Response::text(500, msg)
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panicked".to_string()
    }
}
