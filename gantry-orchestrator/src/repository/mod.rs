//! Repository Module
//!
//! Store implementations behind the port traits. `postgres` is the
//! production backend; `memory` backs the test suites and enforces the
//! same scmUri uniqueness constraint.

pub mod memory;
pub mod postgres;
