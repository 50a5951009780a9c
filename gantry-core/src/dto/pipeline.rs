//! Pipeline DTOs

use serde::{Deserialize, Serialize};

/// Request to create a new pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePipelineRequest {
    /// Raw checkout locator, e.g. `git@github.com:org/repo.git#main`.
    pub checkout_url: String,
}
