//! Built-in route handlers.
//!
//! Routes in the config name one of these by `handler`.

pub mod echo;
pub mod ping;

use std::sync::Arc;

use crate::routes::RequestHandler;

pub use echo::EchoHandler;
pub use ping::PingHandler;

/// Names accepted in `routes[].handler`.
pub const BUILTIN_HANDLERS: [&str; 2] = ["ping", "echo"];

/// Instantiate a built-in handler by name.
pub fn builtin(name: &str) -> Option<Arc<dyn RequestHandler>> {
    match name {
        "ping" => Some(Arc::new(PingHandler::new())),
        "echo" => Some(Arc::new(EchoHandler::new())),
        _ => None,
    }
}
