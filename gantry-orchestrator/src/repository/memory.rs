//! In-memory stores
//!
//! Map-backed implementations of the store ports. The service and API test
//! suites run against these; `create` checks and inserts under a single
//! lock acquisition, so the scmUri uniqueness constraint holds even for
//! racing requests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use gantry_core::domain::pipeline::{JobDefinition, Pipeline, PipelineConfig};
use gantry_core::domain::scm::ScmUri;
use gantry_core::domain::user::User;
use gantry_core::ports::{PipelineStore, StoreError, UserStore};

#[derive(Default)]
pub struct MemoryPipelineStore {
    inner: Mutex<State>,
}

#[derive(Default)]
struct State {
    pipelines: HashMap<Uuid, Pipeline>,
    by_scm_uri: HashMap<ScmUri, Uuid>,
    jobs: HashMap<Uuid, Vec<JobDefinition>>,
}

impl MemoryPipelineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jobs persisted for a pipeline, if a sync pass completed.
    pub async fn jobs_for(&self, pipeline_id: Uuid) -> Option<Vec<JobDefinition>> {
        self.inner.lock().await.jobs.get(&pipeline_id).cloned()
    }
}

#[async_trait]
impl PipelineStore for MemoryPipelineStore {
    async fn get_by_scm_uri(&self, scm_uri: &ScmUri) -> Result<Option<Pipeline>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .by_scm_uri
            .get(scm_uri)
            .and_then(|id| inner.pipelines.get(id))
            .cloned())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Pipeline>, StoreError> {
        Ok(self.inner.lock().await.pipelines.get(&id).cloned())
    }

    async fn create(&self, config: PipelineConfig) -> Result<Pipeline, StoreError> {
        let mut inner = self.inner.lock().await;

        if let Some(existing_id) = inner.by_scm_uri.get(&config.scm_uri) {
            return Err(StoreError::AlreadyExists {
                existing_id: *existing_id,
            });
        }

        let now = Utc::now();
        let pipeline = Pipeline {
            id: Uuid::new_v4(),
            scm_uri: config.scm_uri.clone(),
            admins: config.admins,
            created_at: now,
            updated_at: now,
        };

        inner.by_scm_uri.insert(config.scm_uri, pipeline.id);
        inner.pipelines.insert(pipeline.id, pipeline.clone());

        Ok(pipeline)
    }

    async fn save_jobs(
        &self,
        pipeline_id: Uuid,
        jobs: Vec<JobDefinition>,
    ) -> Result<(), StoreError> {
        self.inner.lock().await.jobs.insert(pipeline_id, jobs);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: User) {
        self.users
            .lock()
            .await
            .insert(user.username.clone(), user);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().await.get(username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_by_scm_uri() {
        let store = MemoryPipelineStore::new();
        let scm_uri = ScmUri::new("example.com:42:master");

        let created = store
            .create(PipelineConfig::new(scm_uri.clone(), "alice"))
            .await
            .unwrap();

        let fetched = store.get_by_scm_uri(&scm_uri).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.admins.get("alice"), Some(&true));

        let by_id = store.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.scm_uri, scm_uri);
    }

    #[tokio::test]
    async fn test_create_enforces_scm_uri_uniqueness() {
        let store = MemoryPipelineStore::new();
        let scm_uri = ScmUri::new("example.com:42:master");

        let first = store
            .create(PipelineConfig::new(scm_uri.clone(), "alice"))
            .await
            .unwrap();

        let second = store.create(PipelineConfig::new(scm_uri, "bob")).await;
        match second {
            Err(StoreError::AlreadyExists { existing_id }) => assert_eq!(existing_id, first.id),
            other => panic!("expected AlreadyExists, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_save_jobs_replaces_previous_set() {
        let store = MemoryPipelineStore::new();
        let pipeline = store
            .create(PipelineConfig::new(ScmUri::new("example.com:7:master"), "alice"))
            .await
            .unwrap();

        let job = |name: &str| JobDefinition {
            name: name.to_string(),
            image: None,
            steps: vec![],
        };

        store
            .save_jobs(pipeline.id, vec![job("main"), job("deploy")])
            .await
            .unwrap();
        store.save_jobs(pipeline.id, vec![job("main")]).await.unwrap();

        let jobs = store.jobs_for(pipeline.id).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].name, "main");
    }
}
