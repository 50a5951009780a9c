//! SCM provider client
//!
//! reqwest adapter for the platform's SCM sidecar service, which fronts the
//! actual source-control provider: checkout-URL resolution, permission
//! lookup and pipeline-configuration reads. The user's unsealed token is
//! forwarded as a bearer credential on every call.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use gantry_core::checkout::CheckoutUrl;
use gantry_core::domain::pipeline::JobDefinition;
use gantry_core::domain::scm::ScmUri;
use gantry_core::domain::user::{Permissions, UnsealedToken};
use gantry_core::ports::{ScmError, ScmProvider};

/// HTTP client for the SCM sidecar API
#[derive(Debug, Clone)]
pub struct HttpScmProvider {
    base_url: String,
    client: Client,
}

impl HttpScmProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check the status code and deserialize the JSON body
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ScmError> {
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ScmError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(ScmError::transport)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParseUrlResponse {
    scm_uri: String,
}

#[async_trait]
impl ScmProvider for HttpScmProvider {
    async fn parse_url(
        &self,
        checkout_url: &CheckoutUrl,
        token: &UnsealedToken,
    ) -> Result<ScmUri, ScmError> {
        let url = format!("{}/v1/repositories/parse-url", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token.expose())
            .json(&serde_json::json!({ "checkoutUrl": checkout_url.as_str() }))
            .send()
            .await
            .map_err(ScmError::transport)?;

        let parsed: ParseUrlResponse = self.handle_response(response).await?;
        Ok(ScmUri::new(parsed.scm_uri))
    }

    async fn permissions(
        &self,
        scm_uri: &ScmUri,
        token: &UnsealedToken,
    ) -> Result<Permissions, ScmError> {
        let url = format!("{}/v1/repositories/permissions", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("scmUri", scm_uri.as_str())])
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(ScmError::transport)?;

        self.handle_response(response).await
    }

    async fn job_definitions(
        &self,
        scm_uri: &ScmUri,
        token: &UnsealedToken,
    ) -> Result<Vec<JobDefinition>, ScmError> {
        let url = format!("{}/v1/repositories/jobs", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("scmUri", scm_uri.as_str())])
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(ScmError::transport)?;

        self.handle_response(response).await
    }
}
