//! Core domain types
//!
//! This module contains the core domain structures used across Gantry
//! services. These types represent the fundamental business entities and
//! are shared between the orchestrator (for persistence) and its adapters.

pub mod pipeline;
pub mod scm;
pub mod user;
