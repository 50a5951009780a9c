//! Test fixtures shared across the orchestrator test modules.

use std::sync::Arc;

use async_trait::async_trait;

use gantry_core::checkout::CheckoutUrl;
use gantry_core::domain::pipeline::{JobDefinition, Pipeline};
use gantry_core::domain::scm::ScmUri;
use gantry_core::domain::user::{Permissions, SealedCredential, UnsealedToken, User};
use gantry_core::ports::{PipelineSyncer, ScmError, ScmProvider, SyncError};

use crate::repository::memory::{MemoryPipelineStore, MemoryUserStore};
use crate::service::Services;
use crate::sync::JobSync;
use crate::vault::StaticVault;

/// SCM provider double: echoes the normalized checkout URL as the scmUri
/// and answers permission lookups with a fixed flag set.
pub struct FakeScm {
    pub permissions: Permissions,
    pub jobs: Vec<JobDefinition>,
}

impl FakeScm {
    pub fn admin() -> Self {
        Self {
            permissions: Permissions {
                admin: true,
                push: true,
                pull: true,
            },
            jobs: vec![JobDefinition {
                name: "main".to_string(),
                image: Some("node:20".to_string()),
                steps: vec!["npm install".to_string(), "npm test".to_string()],
            }],
        }
    }

    pub fn read_only() -> Self {
        Self {
            permissions: Permissions {
                admin: false,
                push: false,
                pull: true,
            },
            jobs: vec![],
        }
    }
}

#[async_trait]
impl ScmProvider for FakeScm {
    async fn parse_url(
        &self,
        checkout_url: &CheckoutUrl,
        _token: &UnsealedToken,
    ) -> Result<ScmUri, ScmError> {
        Ok(ScmUri::new(checkout_url.as_str()))
    }

    async fn permissions(
        &self,
        _scm_uri: &ScmUri,
        _token: &UnsealedToken,
    ) -> Result<Permissions, ScmError> {
        Ok(self.permissions)
    }

    async fn job_definitions(
        &self,
        _scm_uri: &ScmUri,
        _token: &UnsealedToken,
    ) -> Result<Vec<JobDefinition>, ScmError> {
        Ok(self.jobs.clone())
    }
}

/// Syncer double that always fails.
pub struct FailingSyncer;

#[async_trait]
impl PipelineSyncer for FailingSyncer {
    async fn sync(&self, _pipeline: &Pipeline, _token: &UnsealedToken) -> Result<(), SyncError> {
        Err(SyncError("scm configuration unreadable".into()))
    }
}

/// Services wired against in-memory state, with `username` seeded in the
/// user store and unsealable through the vault. Also returns the concrete
/// pipeline store so tests can inspect persisted state.
pub async fn services_with_user(
    username: &str,
    scm: Arc<dyn ScmProvider>,
) -> (Services, Arc<MemoryPipelineStore>) {
    let users = MemoryUserStore::new();
    let sealed = SealedCredential::new(format!("sealed-{username}"));
    users
        .insert(User {
            username: username.to_string(),
            sealed_credential: sealed.clone(),
        })
        .await;

    let vault = StaticVault::new().with_token(&sealed, format!("token-{username}"));
    let pipelines = Arc::new(MemoryPipelineStore::new());
    let syncer = Arc::new(JobSync::new(scm.clone(), pipelines.clone()));

    let services = Services {
        users: Arc::new(users),
        vault: Arc::new(vault),
        scm,
        pipelines: pipelines.clone(),
        syncer,
    };

    (services, pipelines)
}
