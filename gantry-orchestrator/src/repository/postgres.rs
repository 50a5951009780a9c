//! Postgres stores
//!
//! sqlx-backed implementations of the store ports. The `pipelines` table
//! carries a unique index on `scm_uri`; a constraint violation on insert
//! is reported as [`StoreError::AlreadyExists`] so racing creates collapse
//! into the same conflict outcome as the read-side guard.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use gantry_core::domain::pipeline::{JobDefinition, Pipeline, PipelineConfig};
use gantry_core::domain::scm::ScmUri;
use gantry_core::domain::user::{SealedCredential, User};
use gantry_core::ports::{PipelineStore, StoreError, UserStore};

pub struct PgPipelineStore {
    pool: PgPool,
}

impl PgPipelineStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PipelineStore for PgPipelineStore {
    async fn get_by_scm_uri(&self, scm_uri: &ScmUri) -> Result<Option<Pipeline>, StoreError> {
        let row = sqlx::query_as::<_, PipelineRow>(
            r#"
            SELECT id, scm_uri, admins, created_at, updated_at
            FROM pipelines
            WHERE scm_uri = $1
            "#,
        )
        .bind(scm_uri.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(row.map(Into::into))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Pipeline>, StoreError> {
        let row = sqlx::query_as::<_, PipelineRow>(
            r#"
            SELECT id, scm_uri, admins, created_at, updated_at
            FROM pipelines
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, config: PipelineConfig) -> Result<Pipeline, StoreError> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();
        let admins = serde_json::to_value(&config.admins).map_err(StoreError::backend)?;

        let result = sqlx::query(
            r#"
            INSERT INTO pipelines (id, scm_uri, admins, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(config.scm_uri.as_str())
        .bind(&admins)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(Pipeline {
                id,
                scm_uri: config.scm_uri,
                admins: config.admins,
                created_at: now,
                updated_at: now,
            }),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                // Another request won the race; report the winner's id
                match self.get_by_scm_uri(&config.scm_uri).await? {
                    Some(existing) => Err(StoreError::AlreadyExists {
                        existing_id: existing.id,
                    }),
                    None => Err(StoreError::Backend(
                        format!("pipeline for {} vanished after unique violation", config.scm_uri)
                            .into(),
                    )),
                }
            }
            Err(err) => Err(StoreError::backend(err)),
        }
    }

    async fn save_jobs(
        &self,
        pipeline_id: Uuid,
        jobs: Vec<JobDefinition>,
    ) -> Result<(), StoreError> {
        // Sync owns the derived job set; replace it wholesale
        let mut tx = self.pool.begin().await.map_err(StoreError::backend)?;

        sqlx::query("DELETE FROM jobs WHERE pipeline_id = $1")
            .bind(pipeline_id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::backend)?;

        for job in &jobs {
            sqlx::query(
                r#"
                INSERT INTO jobs (id, pipeline_id, name, image, steps)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(pipeline_id)
            .bind(&job.name)
            .bind(&job.image)
            .bind(&job.steps)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::backend)?;
        }

        tx.commit().await.map_err(StoreError::backend)?;
        Ok(())
    }
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT username, sealed_credential FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(row.map(|r| User {
            username: r.username,
            sealed_credential: SealedCredential::new(r.sealed_credential),
        }))
    }
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct PipelineRow {
    id: Uuid,
    scm_uri: String,
    admins: serde_json::Value,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<PipelineRow> for Pipeline {
    fn from(row: PipelineRow) -> Self {
        let admins = serde_json::from_value(row.admins).unwrap_or_default();

        Pipeline {
            id: row.id,
            scm_uri: ScmUri::new(row.scm_uri),
            admins,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    username: String,
    sealed_credential: String,
}
