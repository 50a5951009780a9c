//! Gantry Core
//!
//! Core types and abstractions for the Gantry CI/CD platform.
//!
//! This crate contains:
//! - Domain types: core business entities (Pipeline, User, ScmUri)
//! - DTOs: request payloads for the public API
//! - Checkout URL normalization
//! - Port traits: the seams the orchestrator is wired through

pub mod checkout;
pub mod domain;
pub mod dto;
pub mod ports;
