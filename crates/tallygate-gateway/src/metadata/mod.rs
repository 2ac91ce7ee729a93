//! Best-effort per-(source IP, path) usage counters.
//!
//! `store` is the key-value contract with its local backends, `dynamo` the
//! DynamoDB backend; `recorder` runs the read-increment-write against either
//! and never lets a failure escape.

pub mod dynamo;
pub mod recorder;
pub mod store;

pub use dynamo::DynamoCounterStore;
pub use recorder::MetadataRecorder;
pub use store::{CounterStore, FileCounterStore, InMemoryCounterStore};
