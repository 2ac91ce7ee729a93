//! Shared error type across tallygate crates.

use thiserror::Error;

/// Stable error classification, used in logs and by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed event or input.
    BadRequest,
    /// Invalid or inconsistent configuration.
    Config,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Counter store read/write failure.
    Store,
    /// A route handler failed.
    Handler,
    /// The not-found page could not be loaded.
    Page,
    /// Anything else, including caught panics.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs and JSON error bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Config => "CONFIG",
            ErrorKind::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorKind::Store => "STORE",
            ErrorKind::Handler => "HANDLER",
            ErrorKind::Page => "PAGE",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Unified error type used by core and gateway.
///
/// `Display` carries a kind prefix for logs. User-facing text (the gateway's
/// 500 body) comes from [`GatewayError::message`], which has no prefix.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("store: {0}")]
    Store(String),
    #[error("{0}")]
    Handler(String),
    #[error("{0}")]
    Page(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Shorthand for handler implementations.
    pub fn handler(msg: impl Into<String>) -> Self {
        GatewayError::Handler(msg.into())
    }

    /// The fault's own message, without the kind prefix `Display` adds.
    pub fn message(&self) -> String {
        match self {
            GatewayError::BadRequest(m)
            | GatewayError::Config(m)
            | GatewayError::Store(m)
            | GatewayError::Handler(m)
            | GatewayError::Page(m)
            | GatewayError::Internal(m) => m.clone(),
            GatewayError::UnsupportedVersion => self.to_string(),
        }
    }

    /// Map the error to its stable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::BadRequest(_) => ErrorKind::BadRequest,
            GatewayError::Config(_) => ErrorKind::Config,
            GatewayError::UnsupportedVersion => ErrorKind::UnsupportedVersion,
            GatewayError::Store(_) => ErrorKind::Store,
            GatewayError::Handler(_) => ErrorKind::Handler,
            GatewayError::Page(_) => ErrorKind::Page,
            GatewayError::Internal(_) => ErrorKind::Internal,
        }
    }
}
