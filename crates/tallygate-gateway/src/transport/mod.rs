//! Host transports.
//!
//! - `lambda`: the function runtime (production)
//! - `http`: a local HTTP host for development, converting plain HTTP into
//!   inbound events and the gateway's responses back into HTTP

pub mod http;
pub mod lambda;
