use async_trait::async_trait;

use tallygate_core::error::Result;
use tallygate_core::model::{InboundRequest, Response};

use crate::routes::RequestHandler;

/// Liveness probe: always `200 pong`.
#[derive(Default)]
pub struct PingHandler;

impl PingHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RequestHandler for PingHandler {
    fn name(&self) -> &str {
        "ping"
    }

    async fn handle(&self, _req: &InboundRequest) -> Result<Response> {
        Ok(Response::text(200, "pong"))
    }
}
