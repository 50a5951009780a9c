//! Post-create job synchronization
//!
//! Derives the pipeline's initial job set from the repository's pipeline
//! configuration and persists it. The creation workflow awaits this before
//! responding; a pipeline only counts as fully created once synced.

use std::sync::Arc;

use async_trait::async_trait;

use gantry_core::domain::pipeline::Pipeline;
use gantry_core::domain::user::UnsealedToken;
use gantry_core::ports::{PipelineStore, PipelineSyncer, ScmProvider, SyncError};

pub struct JobSync {
    scm: Arc<dyn ScmProvider>,
    pipelines: Arc<dyn PipelineStore>,
}

impl JobSync {
    pub fn new(scm: Arc<dyn ScmProvider>, pipelines: Arc<dyn PipelineStore>) -> Self {
        Self { scm, pipelines }
    }
}

#[async_trait]
impl PipelineSyncer for JobSync {
    async fn sync(&self, pipeline: &Pipeline, token: &UnsealedToken) -> Result<(), SyncError> {
        let jobs = self
            .scm
            .job_definitions(&pipeline.scm_uri, token)
            .await
            .map_err(|e| SyncError(Box::new(e)))?;

        tracing::debug!("Syncing {} jobs for pipeline {}", jobs.len(), pipeline.id);

        self.pipelines
            .save_jobs(pipeline.id, jobs)
            .await
            .map_err(|e| SyncError(Box::new(e)))?;

        Ok(())
    }
}
