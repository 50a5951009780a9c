//! Credential vault
//!
//! Users carry their SCM credential sealed (encrypted at rest by the
//! platform's secret service). The vault port turns a sealed credential
//! into a short-lived plaintext token: [`HttpVault`] delegates to the
//! secret service, [`StaticVault`] is a map-backed stand-in for tests and
//! local runs.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use gantry_core::domain::user::{SealedCredential, UnsealedToken};
use gantry_core::ports::{CredentialVault, VaultError};

/// HTTP client for the secret service's unseal endpoint
#[derive(Debug, Clone)]
pub struct HttpVault {
    base_url: String,
    client: Client,
}

impl HttpVault {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct UnsealResponse {
    token: String,
}

#[async_trait]
impl CredentialVault for HttpVault {
    async fn unseal(&self, sealed: &SealedCredential) -> Result<UnsealedToken, VaultError> {
        let url = format!("{}/v1/unseal", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "sealed": sealed.as_str() }))
            .send()
            .await
            .map_err(|e| VaultError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VaultError(format!("secret service returned {}", status)));
        }

        let body: UnsealResponse = response
            .json()
            .await
            .map_err(|e| VaultError(e.to_string()))?;

        Ok(UnsealedToken::new(body.token))
    }
}

/// Map-backed vault for tests and local development.
#[derive(Default)]
pub struct StaticVault {
    tokens: HashMap<String, String>,
}

impl StaticVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, sealed: &SealedCredential, token: impl Into<String>) -> Self {
        self.tokens.insert(sealed.as_str().to_string(), token.into());
        self
    }
}

#[async_trait]
impl CredentialVault for StaticVault {
    async fn unseal(&self, sealed: &SealedCredential) -> Result<UnsealedToken, VaultError> {
        self.tokens
            .get(sealed.as_str())
            .map(|token| UnsealedToken::new(token.clone()))
            .ok_or_else(|| VaultError("no token for sealed credential".to_string()))
    }
}
