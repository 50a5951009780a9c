//! Pipeline Service
//!
//! The pipeline-creation workflow: normalize the checkout URL, resolve the
//! requesting user and their credential, resolve the repository with the
//! SCM provider, verify admin permission, guard against duplicates, create
//! the pipeline and run the post-create job sync. Stages run strictly in
//! that order and the first failure aborts the rest.

use thiserror::Error;
use uuid::Uuid;

use gantry_core::checkout::{CheckoutUrl, InvalidLocator};
use gantry_core::domain::pipeline::{Pipeline, PipelineConfig};
use gantry_core::domain::scm::ScmUri;
use gantry_core::ports::{ScmError, StoreError, SyncError, VaultError};

use crate::service::Services;

/// Service error type
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    InvalidLocator(#[from] InvalidLocator),

    #[error("user {username} not found")]
    UserNotFound { username: String },

    #[error("credential for {username} could not be unsealed")]
    CredentialUnavailable {
        username: String,
        #[source]
        source: VaultError,
    },

    #[error("scm provider request failed")]
    ScmResolution(#[source] ScmError),

    #[error("user {username} is not an admin of {scm_uri}")]
    Unauthorized { username: String, scm_uri: ScmUri },

    #[error("pipeline already exists: {existing_id}")]
    Conflict { existing_id: Uuid },

    #[error("pipeline creation failed")]
    Creation(#[source] StoreError),

    #[error("pipeline {pipeline_id} created but job sync failed")]
    Sync {
        pipeline_id: Uuid,
        #[source]
        source: SyncError,
    },

    #[error("pipeline {0} not found")]
    NotFound(Uuid),

    #[error("store lookup failed")]
    Store(#[source] StoreError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Run the full creation workflow for `username` and a raw checkout URL.
///
/// Authorization always completes before the uniqueness check, and the
/// uniqueness check before creation. Two racing requests can both pass the
/// read-side guard; the store's uniqueness constraint on scmUri then picks
/// the winner and the loser surfaces the same conflict outcome.
pub async fn create_pipeline(
    services: &Services,
    username: &str,
    raw_checkout_url: &str,
) -> Result<Pipeline> {
    let checkout_url = CheckoutUrl::normalize(raw_checkout_url)?;

    // fetch the user
    let user = services
        .users
        .get(username)
        .await
        .map_err(PipelineError::Store)?
        .ok_or_else(|| PipelineError::UserNotFound {
            username: username.to_string(),
        })?;

    let token = services
        .vault
        .unseal(&user.sealed_credential)
        .await
        .map_err(|source| PipelineError::CredentialUnavailable {
            username: username.to_string(),
            source,
        })?;

    let scm_uri = services
        .scm
        .parse_url(&checkout_url, &token)
        .await
        .map_err(PipelineError::ScmResolution)?;

    // the requester must administer the repo before anything is written
    let permissions = services
        .scm
        .permissions(&scm_uri, &token)
        .await
        .map_err(PipelineError::ScmResolution)?;

    if !permissions.admin {
        return Err(PipelineError::Unauthorized {
            username: username.to_string(),
            scm_uri,
        });
    }

    // read-side duplicate guard
    if let Some(existing) = services
        .pipelines
        .get_by_scm_uri(&scm_uri)
        .await
        .map_err(PipelineError::Store)?
    {
        return Err(PipelineError::Conflict {
            existing_id: existing.id,
        });
    }

    let config = PipelineConfig::new(scm_uri, username);
    let pipeline = services
        .pipelines
        .create(config)
        .await
        .map_err(|e| match e {
            StoreError::AlreadyExists { existing_id } => PipelineError::Conflict { existing_id },
            other => PipelineError::Creation(other),
        })?;

    tracing::info!("Pipeline created: {} ({})", pipeline.scm_uri, pipeline.id);

    // Jobs are derived from the repo's pipeline configuration; the pipeline
    // only counts as fully created once this pass finishes. On failure the
    // record stays in place (no rollback) and the request fails.
    if let Err(source) = services.syncer.sync(&pipeline, &token).await {
        tracing::error!("Pipeline {} created but sync failed: {}", pipeline.id, source);
        return Err(PipelineError::Sync {
            pipeline_id: pipeline.id,
            source,
        });
    }

    Ok(pipeline)
}

/// Get a pipeline by ID
pub async fn get_pipeline(services: &Services, id: Uuid) -> Result<Pipeline> {
    services
        .pipelines
        .get_by_id(id)
        .await
        .map_err(PipelineError::Store)?
        .ok_or(PipelineError::NotFound(id))
}
