//! tallygate gateway binary.
//!
//! - Loads `tallygate.yaml` (path overridable with `TALLYGATE_CONFIG`)
//! - Applies `DYNAMO_METADATA_TABLE_NAME`
//! - Inside a function runtime (`AWS_LAMBDA_RUNTIME_API` set): serves
//!   invocations from the runtime API
//! - Otherwise: serves the local HTTP host on `gateway.listen`

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use tallygate_core::error::{GatewayError, Result};
use tallygate_gateway::transport::lambda;
use tallygate_gateway::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, error.kind = e.kind().as_str(), "tallygate-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("TALLYGATE_CONFIG").unwrap_or_else(|_| "tallygate.yaml".into());
    let mut cfg = config::load_from_file(&path)?;
    config::apply_env(&mut cfg);

    if lambda::in_function_runtime() {
        let state = app_state::AppState::new(cfg).await?;
        tracing::info!("tallygate-gateway starting in function runtime");
        return lambda::run(state).await;
    }

    let listen: SocketAddr = cfg
        .gateway
        .listen
        .parse()
        .map_err(|e| GatewayError::Config(format!("gateway.listen must be a valid SocketAddr: {e}")))?;

    let state = app_state::AppState::new(cfg).await?;
    let app = router::build_router(state);

    tracing::info!(%listen, "tallygate-gateway starting local http host");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| GatewayError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|e| GatewayError::Internal(format!("server failed: {e}")))
}
