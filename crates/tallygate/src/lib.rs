//! Top-level facade crate for tallygate.
//!
//! Re-exports the core model and the gateway library so users can depend on a single crate.

pub mod core {
    pub use tallygate_core::*;
}

pub mod gateway {
    pub use tallygate_gateway::*;
}
