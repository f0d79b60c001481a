//! AWS-oriented adapters and handlers for ride dispatch.
//!
//! This crate owns runtime integration details (the Lambda handler, API
//! Gateway envelope, DynamoDB storage adapter, configuration and logging) on
//! top of the pure domain primitives in `ride_dispatch_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod logging;
