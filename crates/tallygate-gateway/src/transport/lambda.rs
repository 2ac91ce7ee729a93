//! Serverless host.
//!
//! Under a function runtime the bootstrap polls the runtime API for the next
//! event, hands the payload to the gateway, and posts the serialized
//! `{statusCode, headers, body}` back. The gateway never returns an error, so
//! every invocation completes with a response.
//!
//! Background recorder work still in flight when the response is posted may
//! be frozen or dropped with the execution environment.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

use tallygate_core::error::{GatewayError, Result};
use tallygate_core::model::Response;

use crate::app_state::AppState;

/// Set by the platform inside a function execution environment.
pub const RUNTIME_API_ENV: &str = "AWS_LAMBDA_RUNTIME_API";

pub fn in_function_runtime() -> bool {
    std::env::var_os(RUNTIME_API_ENV).is_some()
}

/// Handle one invocation payload.
pub async fn handle_payload(app: &AppState, payload: Value) -> Response {
    app.gateway().handle_event(payload).await
}

/// Serve invocations until the runtime shuts the process down.
pub async fn run(app: AppState) -> Result<()> {
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let app = app.clone();
        async move { Ok::<Response, Error>(handle_payload(&app, event.payload).await) }
    }))
    .await
    .map_err(|e| GatewayError::Internal(format!("function runtime failed: {e}")))
}
