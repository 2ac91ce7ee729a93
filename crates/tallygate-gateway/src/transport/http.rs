//! Local HTTP host (development).
//!
//! Two ways in:
//! - emulator-style invocation: the request body *is* the JSON event and the
//!   reply body is the JSON `{statusCode, headers, body}`, as when invoking a
//!   function through a local runtime emulator
//! - direct proxy: any other request is turned into an event on the fly and
//!   the gateway's response is written back as plain HTTP

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{header::CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response as HttpResponse},
    Json,
};
use serde_json::json;

use tallygate_core::error::ErrorKind;
use tallygate_core::model::{InboundRequest, Response};

use crate::app_state::AppState;

/// Path a local runtime emulator accepts invocations on.
pub const INVOKE_PATH: &str = "/2015-03-31/functions/function/invocations";
/// Reserved path for Prometheus metrics.
pub const METRICS_PATH: &str = "/_gateway/metrics";

// --------------------
// Entry points
// --------------------
pub async fn invoke(State(app): State<AppState>, body: String) -> HttpResponse {
    let event: serde_json::Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "invocation body is not JSON");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "errorType": ErrorKind::BadRequest.as_str(),
                    "errorMessage": format!("invalid event json: {e}"),
                })),
            )
                .into_response();
        }
    };

    let resp = app.gateway().handle_event(event).await;
    Json(resp).into_response()
}

pub async fn proxy(
    State(app): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> HttpResponse {
    let req = to_inbound(peer, &method, &uri, &headers, body);
    let resp = app.gateway().handle(&req).await;
    to_http(resp)
}

pub async fn metrics(State(app): State<AppState>) -> HttpResponse {
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        app.metrics().render(),
    )
        .into_response()
}

// --------------------
// Conversions
// --------------------

/// Build an inbound request from a proxied HTTP request. The peer address is
/// the source IP; headers that are not valid UTF-8 are dropped.
pub fn to_inbound(
    peer: SocketAddr,
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: String,
) -> InboundRequest {
    let mut req = InboundRequest::new(method.as_str(), uri.path(), peer.ip().to_string())
        .with_query(uri.query().unwrap_or_default());
    for (name, value) in headers {
        if let Ok(v) = value.to_str() {
            req = req.with_header(name.as_str(), v);
        }
    }
    if !body.is_empty() {
        req = req.with_body(body, false);
    }
    req
}

/// Write a gateway response as HTTP. An out-of-range status becomes 500 and
/// headers that are not valid HTTP are skipped.
pub fn to_http(resp: Response) -> HttpResponse {
    let status = StatusCode::from_u16(resp.status_code).unwrap_or_else(|_| {
        tracing::warn!(status = resp.status_code, "invalid status code from gateway");
        StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut out = (status, resp.body).into_response();
    for (name, value) in resp.headers {
        match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
            (Ok(n), Ok(v)) => {
                out.headers_mut().insert(n, v);
            }
            _ => tracing::warn!(header = %name, "dropping invalid response header"),
        }
    }
    out
}
