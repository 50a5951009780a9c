//! Pipeline domain types

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::scm::ScmUri;

/// A pipeline bound to a single source-control repository.
///
/// Created once per `scm_uri` by the creation workflow and never
/// duplicated; its jobs are derived state, populated by the post-create
/// synchronization pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    pub id: Uuid,
    pub scm_uri: ScmUri,
    /// Usernames permitted to administer the pipeline. Ordered mapping so
    /// serialization is stable regardless of insertion order.
    pub admins: BTreeMap<String, bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Construction input consumed once by `PipelineStore::create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    pub scm_uri: ScmUri,
    pub admins: BTreeMap<String, bool>,
}

impl PipelineConfig {
    /// Config whose admin set contains exactly the creating user.
    pub fn new(scm_uri: ScmUri, creator: impl Into<String>) -> Self {
        Self {
            scm_uri,
            admins: BTreeMap::from([(creator.into(), true)]),
        }
    }
}

/// A job derived from the repository's pipeline configuration during sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDefinition {
    pub name: String,
    pub image: Option<String>,
    pub steps: Vec<String>,
}
