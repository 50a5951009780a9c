//! Service Module
//!
//! Business logic layer for the orchestrator, wired to stores and
//! providers exclusively through the port traits.

pub mod pipeline;

// Re-export for convenience
pub use pipeline as pipeline_service;

use std::sync::Arc;

use gantry_core::ports::{CredentialVault, PipelineStore, PipelineSyncer, ScmProvider, UserStore};

/// Injected collaborators for the pipeline workflows.
///
/// Cheap to clone; doubles as the axum router state so every request task
/// gets its own handle set.
#[derive(Clone)]
pub struct Services {
    pub users: Arc<dyn UserStore>,
    pub vault: Arc<dyn CredentialVault>,
    pub scm: Arc<dyn ScmProvider>,
    pub pipelines: Arc<dyn PipelineStore>,
    pub syncer: Arc<dyn PipelineSyncer>,
}
