//! Port traits for the orchestrator's external collaborators
//!
//! The creation workflow only sees these interfaces; concrete adapters
//! (Postgres stores, the SCM sidecar client, the secret vault) live in the
//! service binary and are injected at startup.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::checkout::CheckoutUrl;
use crate::domain::pipeline::{JobDefinition, Pipeline, PipelineConfig};
use crate::domain::scm::ScmUri;
use crate::domain::user::{Permissions, SealedCredential, UnsealedToken, User};

/// Errors surfaced by pipeline and user stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A pipeline for the same scmUri already exists. `create` fails with
    /// this instead of inserting a second row.
    #[error("pipeline already exists: {existing_id}")]
    AlreadyExists { existing_id: Uuid },

    #[error("store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// A stored credential could not be unsealed.
#[derive(Debug, Error)]
#[error("credential could not be unsealed: {0}")]
pub struct VaultError(pub String);

/// Errors from the source-control provider.
#[derive(Debug, Error)]
pub enum ScmError {
    /// The provider rejected the request (unknown repo, bad credential, ...).
    #[error("scm provider error (status {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("scm transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ScmError {
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }
}

/// Post-create job synchronization failed.
#[derive(Debug, Error)]
#[error("job synchronization failed: {0}")]
pub struct SyncError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

/// Lookup of platform users.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, username: &str) -> Result<Option<User>, StoreError>;
}

/// Turns a sealed credential into a short-lived plaintext token.
#[async_trait]
pub trait CredentialVault: Send + Sync {
    async fn unseal(&self, sealed: &SealedCredential) -> Result<UnsealedToken, VaultError>;
}

/// The source-control provider abstraction.
#[async_trait]
pub trait ScmProvider: Send + Sync {
    /// Resolve a normalized checkout URL to the provider's canonical id.
    async fn parse_url(
        &self,
        checkout_url: &CheckoutUrl,
        token: &UnsealedToken,
    ) -> Result<ScmUri, ScmError>;

    /// Capability flags of the token's owner on the repository.
    async fn permissions(
        &self,
        scm_uri: &ScmUri,
        token: &UnsealedToken,
    ) -> Result<Permissions, ScmError>;

    /// Job definitions declared in the repository's pipeline configuration.
    async fn job_definitions(
        &self,
        scm_uri: &ScmUri,
        token: &UnsealedToken,
    ) -> Result<Vec<JobDefinition>, ScmError>;
}

/// Persistence of pipelines and their derived jobs.
#[async_trait]
pub trait PipelineStore: Send + Sync {
    async fn get_by_scm_uri(&self, scm_uri: &ScmUri) -> Result<Option<Pipeline>, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Pipeline>, StoreError>;

    /// Persist a new pipeline.
    ///
    /// Implementations must enforce uniqueness on scmUri atomically:
    /// concurrent creates for the same repository resolve to one stored
    /// row, the rest observing [`StoreError::AlreadyExists`].
    async fn create(&self, config: PipelineConfig) -> Result<Pipeline, StoreError>;

    /// Replace the pipeline's derived job set.
    async fn save_jobs(
        &self,
        pipeline_id: Uuid,
        jobs: Vec<JobDefinition>,
    ) -> Result<(), StoreError>;
}

/// Post-create synchronization: derives and persists job definitions from
/// the repository's configuration.
#[async_trait]
pub trait PipelineSyncer: Send + Sync {
    async fn sync(&self, pipeline: &Pipeline, token: &UnsealedToken) -> Result<(), SyncError>;
}
