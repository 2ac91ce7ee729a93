use async_trait::async_trait;
use serde_json::json;

use tallygate_core::error::Result;
use tallygate_core::model::{InboundRequest, Response};

use crate::routes::RequestHandler;

/// Reflects the request back as JSON. Useful to check what the host delivered.
#[derive(Default)]
pub struct EchoHandler;

impl EchoHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RequestHandler for EchoHandler {
    fn name(&self) -> &str {
        "echo"
    }

    async fn handle(&self, req: &InboundRequest) -> Result<Response> {
        Ok(Response::json(
            200,
            &json!({
                "method": req.method(),
                "path": req.path(),
                "sourceIp": req.source_ip(),
                "rawQueryString": req.raw_query_string(),
                "body": req.body(),
                "isBase64Encoded": req.is_base64_encoded(),
            }),
        ))
    }
}
