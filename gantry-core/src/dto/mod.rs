//! Data Transfer Objects for the public API
//!
//! Wire-level request payloads. Successful responses serialize the domain
//! types directly.

pub mod pipeline;
