//! Caller identity extraction
//!
//! Authentication itself (token and session strategies) happens at the
//! edge gateway, which forwards the authenticated username in a trusted
//! header. Handlers that need an identity take the [`Authenticated`]
//! extractor; requests without the header are rejected before any
//! workflow runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::api::error::ApiError;

pub const USERNAME_HEADER: &str = "x-gantry-username";

/// Authenticated username propagated by the edge gateway.
#[derive(Debug, Clone)]
pub struct Authenticated(pub String);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let username = parts
            .headers
            .get(USERNAME_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                ApiError::Unauthenticated("Missing authenticated username".to_string())
            })?;

        Ok(Self(username.to_string()))
    }
}
