//! tallygate gateway library entry.
//!
//! This crate wires the route table, metadata recorder, counter stores, and
//! built-in handlers into a gateway, and hosts it over HTTP. It is intended to
//! be consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod gateway;
pub mod metadata;
pub mod obs;
pub mod pages;
pub mod router;
pub mod routes;
pub mod services;
pub mod transport;

pub use gateway::Gateway;
