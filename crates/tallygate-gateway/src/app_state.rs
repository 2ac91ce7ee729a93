//! Shared application state for the tallygate host.
//!
//! Builds the route table, counter store, and recorder from config once at
//! startup. Startup errors are returned, not panicked.

use std::sync::Arc;

use tallygate_core::error::{GatewayError, Result};

use crate::config::{GatewayConfig, StoreKind};
use crate::gateway::Gateway;
use crate::metadata::{
    CounterStore, DynamoCounterStore, FileCounterStore, InMemoryCounterStore, MetadataRecorder,
};
use crate::obs::metrics::GatewayMetrics;
use crate::pages::FilePage;
use crate::routes::RouteTable;
use crate::services;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    gateway: Gateway,
    metrics: Arc<GatewayMetrics>,
}

impl AppState {
    /// Build application state with the store selected by `metadata.store`.
    /// The DynamoDB client is configured from the AWS environment.
    pub async fn new(cfg: GatewayConfig) -> Result<Self> {
        let store: Arc<dyn CounterStore> = match cfg.metadata.store {
            StoreKind::Memory => Arc::new(InMemoryCounterStore::new()),
            StoreKind::File => Arc::new(FileCounterStore::new(&cfg.metadata.data_dir)),
            StoreKind::Dynamo => Arc::new(DynamoCounterStore::from_env().await),
        };
        Self::with_store(cfg, store)
    }

    /// Build application state around an existing store.
    pub fn with_store(cfg: GatewayConfig, store: Arc<dyn CounterStore>) -> Result<Self> {
        // 1) Route table from config, built-in handlers only
        let mut routes = RouteTable::new();
        for r in &cfg.routes {
            let handler = services::builtin(&r.handler).ok_or_else(|| {
                GatewayError::Config(format!(
                    "route {} refers to unknown handler '{}' (known: {})",
                    r.path,
                    r.handler,
                    services::BUILTIN_HANDLERS.join(", ")
                ))
            })?;
            routes.register(r.path.clone(), handler)?;
        }
        if routes.is_empty() {
            tracing::warn!("no routes configured, every request will be answered with 404");
        }

        // 2) Recorder
        let metrics = Arc::new(GatewayMetrics::new());
        let table = cfg.metadata.table().map(str::to_string);
        if table.is_none() {
            tracing::warn!(
                env = crate::config::TABLE_NAME_ENV,
                "counter table not configured, request metadata recording disabled"
            );
        }
        let recorder = MetadataRecorder::new(table, store).with_metrics(Arc::clone(&metrics));

        // 3) Gateway
        let not_found = Arc::new(FilePage::new(&cfg.gateway.not_found_page));
        let gateway = Gateway::new(routes, recorder, not_found).with_metrics(Arc::clone(&metrics));

        tracing::info!(
            routes = ?gateway.routes().registered_paths(),
            table = ?gateway.recorder().table(),
            "gateway ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                gateway,
                metrics,
            }),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn gateway(&self) -> &Gateway {
        &self.inner.gateway
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.inner.metrics)
    }
}
