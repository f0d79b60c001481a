//! Shared ride dispatch domain primitives.
//!
//! This crate owns the request/response contracts, ride identifier generation
//! and vehicle selection. It intentionally excludes AWS SDK and Lambda runtime
//! concerns; those live in `ride_dispatch_lambda`.

pub mod contract;
pub mod fleet;
pub mod identifiers;
